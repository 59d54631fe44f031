use glam::Affine3A;
use osteon_core::NodeId;

use crate::transform::Transform;
use crate::{MeshKey, NodeHandle, SkinKey};

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a forest through parent-child relationships held as arena
/// handles:
/// - `parent`: handle of the parent node (`None` for roots), non-owning
/// - `children`: child handles in insertion order; the node owns this subtree
///
/// Relationships are edited through [`SceneGraph`](crate::SceneGraph) so both
/// ends stay in sync.
///
/// # Transform
///
/// [`Transform`] stores the local TRS plus cached local/world matrices.
/// `world_valid` is set by the hierarchy update and cleared whenever the
/// node is (re)inserted or reparented.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    pub mesh: Option<MeshKey>,
    pub skin: Option<SkinKey>,

    pub(crate) world_valid: bool,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            skin: None,
            world_valid: false,
        }
    }

    #[must_use]
    pub fn with_name(id: impl Into<NodeId>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::new(id)
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last hierarchy update, without validity check.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
