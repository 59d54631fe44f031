//! Scene construction input.
//!
//! A loader hands the core a flat [`SceneDescription`]: nodes with parent
//! indices, meshes, and skins whose joints are node indices. [`build`]
//! validates all of it up front, so inconsistent data fails at load time
//! rather than mid-frame, and returns the graph together with the
//! index → handle mapping needed to resolve animation targets.
//!
//! [`build`]: SceneDescription::build

use glam::{Affine3A, Mat4, Quat, Vec3};
use osteon_core::{NodeId, OsteonError, Result};
use rustc_hash::FxHashSet;

use crate::graph::SceneGraph;
use crate::mesh::Mesh;
use crate::node::Node;
use crate::skin::Skin;
use crate::transform::Transform;
use crate::{MeshKey, NodeHandle, SkinKey};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeDescription {
    pub id: NodeId,
    pub name: String,
    /// Index of the parent in [`SceneDescription::nodes`].
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Raw local matrix; when present it is decomposed and replaces TRS.
    pub matrix: Option<Mat4>,
    /// Index into [`SceneDescription::meshes`].
    pub mesh: Option<usize>,
    /// Index into [`SceneDescription::skins`].
    pub skin: Option<usize>,
}

impl Default for NodeDescription {
    fn default() -> Self {
        Self {
            id: NodeId(0),
            name: String::new(),
            parent: None,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: None,
            mesh: None,
            skin: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkinDescription {
    pub name: String,
    pub skeleton_root: Option<usize>,
    /// Node indices, one per joint.
    pub joints: Vec<usize>,
    /// One per joint; `None` binds every joint with identity.
    pub inverse_bind_matrices: Option<Vec<Mat4>>,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneDescription {
    pub nodes: Vec<NodeDescription>,
    pub meshes: Vec<Mesh>,
    pub skins: Vec<SkinDescription>,
}

/// Handles of everything [`SceneDescription::build`] inserted, by
/// description index.
#[derive(Debug, Clone, Default)]
pub struct SceneHandles {
    pub nodes: Vec<NodeHandle>,
    pub meshes: Vec<MeshKey>,
    pub skins: Vec<SkinKey>,
}

impl SceneHandles {
    pub fn node(&self, index: usize) -> Result<NodeHandle> {
        self.nodes
            .get(index)
            .copied()
            .ok_or_else(|| OsteonError::index_out_of_bounds("node", index))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl SceneDescription {
    /// Validates the description and builds the scene graph.
    ///
    /// Children keep description order under their parent; parentless nodes
    /// become roots in description order.
    pub fn build(&self) -> Result<(SceneGraph, SceneHandles)> {
        self.validate()?;

        let mut graph = SceneGraph::new();
        let mut handles = SceneHandles::default();

        for mesh in &self.meshes {
            handles.meshes.push(graph.add_mesh(mesh.clone()));
        }

        for desc in &self.nodes {
            let mut node = Node::with_name(desc.id, &desc.name);
            node.transform = Transform::from_trs(desc.translation, desc.rotation, desc.scale);
            if let Some(matrix) = desc.matrix {
                node.transform.apply_local_matrix_from_mat4(matrix);
            }
            node.mesh = desc.mesh.map(|i| handles.meshes[i]);
            handles.nodes.push(graph.nodes.insert(node));
        }

        for (index, desc) in self.nodes.iter().enumerate() {
            let handle = handles.nodes[index];
            match desc.parent {
                Some(parent_index) => {
                    let parent = handles.nodes[parent_index];
                    graph.nodes[parent].children.push(handle);
                    graph.nodes[handle].parent = Some(parent);
                }
                None => graph.roots.push(handle),
            }
        }

        for desc in &self.skins {
            let joints = desc.joints.iter().map(|&i| handles.nodes[i]).collect();
            let skeleton_root = desc.skeleton_root.map(|i| handles.nodes[i]);
            let skin = match &desc.inverse_bind_matrices {
                Some(ibms) => Skin::new(
                    &desc.name,
                    skeleton_root,
                    joints,
                    ibms.iter().map(|m| Affine3A::from_mat4(*m)).collect(),
                )?,
                None => Skin::with_identity_bind(&desc.name, skeleton_root, joints),
            };
            handles.skins.push(graph.add_skin(skin));
        }

        for (index, desc) in self.nodes.iter().enumerate() {
            if let Some(skin_index) = desc.skin {
                graph.nodes[handles.nodes[index]].skin = Some(handles.skins[skin_index]);
            }
        }

        log::debug!(
            "Built scene: {} nodes ({} roots), {} meshes, {} skins",
            graph.len(),
            graph.roots.len(),
            handles.meshes.len(),
            handles.skins.len()
        );

        Ok((graph, handles))
    }

    fn validate(&self) -> Result<()> {
        let node_count = self.nodes.len();
        let check = |context: &str, index: usize, len: usize| -> Result<()> {
            if index < len {
                Ok(())
            } else {
                Err(OsteonError::index_out_of_bounds(context, index))
            }
        };

        let mut ids = FxHashSet::default();
        for desc in &self.nodes {
            if !ids.insert(desc.id) {
                return Err(OsteonError::DuplicateNodeId(desc.id));
            }
            if let Some(parent) = desc.parent {
                check(&format!("parent of node {}", desc.id), parent, node_count)?;
            }
            if let Some(mesh) = desc.mesh {
                check(&format!("mesh of node {}", desc.id), mesh, self.meshes.len())?;
            }
            if let Some(skin) = desc.skin {
                check(&format!("skin of node {}", desc.id), skin, self.skins.len())?;
            }
        }

        // Walk every parent chain once; reaching a node still on the current
        // path means the chain loops.
        let mut marks = vec![Mark::Unvisited; node_count];
        for start in 0..node_count {
            let mut path = Vec::new();
            let mut current = Some(start);
            while let Some(index) = current {
                match marks[index] {
                    Mark::Done => break,
                    Mark::InProgress => {
                        return Err(OsteonError::CyclicHierarchy(self.nodes[index].id));
                    }
                    Mark::Unvisited => {
                        marks[index] = Mark::InProgress;
                        path.push(index);
                        current = self.nodes[index].parent;
                    }
                }
            }
            for index in path {
                marks[index] = Mark::Done;
            }
        }

        for skin in &self.skins {
            for &joint in &skin.joints {
                check(&format!("joint of skin '{}'", skin.name), joint, node_count)?;
            }
            if let Some(root) = skin.skeleton_root {
                check(&format!("skeleton root of skin '{}'", skin.name), root, node_count)?;
            }
            if let Some(ibms) = &skin.inverse_bind_matrices
                && ibms.len() != skin.joints.len()
            {
                return Err(OsteonError::SkinJointMismatch {
                    skin: skin.name.clone(),
                    joints: skin.joints.len(),
                    inverse_bind_matrices: ibms.len(),
                });
            }
        }

        Ok(())
    }
}
