//! Scene graph, skinning and bounding volumes.
//!
//! Nodes live in a [`SlotMap`](slotmap::SlotMap) arena owned by
//! [`SceneGraph`]; every cross-reference (parent, children, skin joints,
//! animation targets) is a [`NodeHandle`] into that arena.

pub mod bounds;
pub mod description;
pub mod graph;
pub mod mesh;
pub mod node;
pub mod skin;
pub mod transform;
pub mod transform_system;

slotmap::new_key_type! {
    /// Handle of a node in a [`SceneGraph`].
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct SkinKey;
}

pub use bounds::{BoundingVolumeAggregator, NodeVolumes};
pub use description::{NodeDescription, SceneDescription, SceneHandles, SkinDescription};
pub use graph::{NodeLookup, SceneGraph};
pub use mesh::Mesh;
pub use node::Node;
pub use skin::{JointPalette, Skin, SkinningContext};
pub use transform::Transform;
pub use transform_system::DepthFirst;
