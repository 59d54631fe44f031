use glam::{Affine3A, Mat4};
use osteon_core::{OsteonError, Result};
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::graph::SceneGraph;
use crate::node::Node;
use crate::{NodeHandle, SkinKey};

/// Joint binding for a skinned mesh.
///
/// `joints[i]` pairs with `inverse_bind_matrices[i]`; the output of
/// [`Skin::compute_joint_matrices`] is indexed the same way. Joint and
/// skeleton-root handles are non-owning references into the scene arena.
#[derive(Debug, Clone)]
pub struct Skin {
    pub name: String,
    pub skeleton_root: Option<NodeHandle>,

    joints: Vec<NodeHandle>,
    // Mesh space -> joint rest-pose local space. Static after load.
    inverse_bind_matrices: Vec<Affine3A>,
}

impl Skin {
    /// Fails when the joint and inverse-bind lists differ in length.
    pub fn new(
        name: &str,
        skeleton_root: Option<NodeHandle>,
        joints: Vec<NodeHandle>,
        inverse_bind_matrices: Vec<Affine3A>,
    ) -> Result<Self> {
        if joints.len() != inverse_bind_matrices.len() {
            return Err(OsteonError::SkinJointMismatch {
                skin: name.to_string(),
                joints: joints.len(),
                inverse_bind_matrices: inverse_bind_matrices.len(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            skeleton_root,
            joints,
            inverse_bind_matrices,
        })
    }

    /// Skin without inverse-bind data: every joint binds with identity.
    #[must_use]
    pub fn with_identity_bind(
        name: &str,
        skeleton_root: Option<NodeHandle>,
        joints: Vec<NodeHandle>,
    ) -> Self {
        let inverse_bind_matrices = vec![Affine3A::IDENTITY; joints.len()];
        Self {
            name: name.to_string(),
            skeleton_root,
            joints,
            inverse_bind_matrices,
        }
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[NodeHandle] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Affine3A] {
        &self.inverse_bind_matrices
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Computes `mesh_world_inv * joint.world * inverse_bind[i]` for every joint.
    ///
    /// `out` is overwritten with exactly `joint_count()` matrices. If any joint
    /// handle does not resolve, `out` is left untouched and an error returned.
    pub fn compute_joint_matrices(
        &self,
        nodes: &SlotMap<NodeHandle, Node>,
        mesh_world_inv: Affine3A,
        out: &mut Vec<Mat4>,
    ) -> Result<()> {
        if let Some(index) = self.joints.iter().position(|&j| !nodes.contains_key(j)) {
            return Err(OsteonError::node_not_found(format!(
                "joint {index} of skin '{}'",
                self.name
            )));
        }

        out.clear();
        out.extend(
            self.joints
                .iter()
                .zip(&self.inverse_bind_matrices)
                .map(|(&joint, ibm)| {
                    let joint_world = nodes[joint].transform.world_matrix;
                    Mat4::from(mesh_world_inv * joint_world * *ibm)
                }),
        );

        Ok(())
    }
}

/// Joint matrices of one skinned mesh node, ready for upload.
#[derive(Debug, Clone)]
pub struct JointPalette {
    skin: SkinKey,
    matrices: Vec<Mat4>,
}

impl JointPalette {
    #[inline]
    #[must_use]
    pub fn skin(&self) -> SkinKey {
        self.skin
    }

    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Column-major `f32` bytes of the palette.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }
}

/// Per-mesh joint palettes, owned by whoever drives the tick.
///
/// Holds all skinning state so nothing about skins lives in process-wide
/// globals; dropping the context drops every palette.
#[derive(Debug, Default)]
pub struct SkinningContext {
    palettes: SparseSecondaryMap<NodeHandle, JointPalette>,
}

impl SkinningContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the palette of every node carrying both a mesh and a skin.
    ///
    /// Must run after [`SceneGraph::update`]. Palettes of meshes whose joints
    /// do not resolve keep their previous contents. Palettes of removed nodes
    /// are dropped. Returns the number of palettes recomputed.
    pub fn update(&mut self, graph: &SceneGraph) -> usize {
        self.palettes
            .retain(|handle, _| graph.node(handle).is_some_and(|n| n.skin.is_some()));

        let skinned: Vec<NodeHandle> = graph
            .depth_first()
            .filter(|(_, node)| node.mesh.is_some() && node.skin.is_some())
            .map(|(handle, _)| handle)
            .collect();

        let mut updated = 0;
        for handle in skinned {
            match self.update_mesh(graph, handle) {
                Ok(_) => updated += 1,
                Err(err) => log::warn!("Skipping joint palette update: {err}"),
            }
        }

        log::trace!("Updated {updated} joint palettes");
        updated
    }

    /// Recomputes the palette of a single skinned node, returning its length.
    pub fn update_mesh(&mut self, graph: &SceneGraph, mesh_node: NodeHandle) -> Result<usize> {
        let node = graph
            .node(mesh_node)
            .ok_or_else(|| OsteonError::node_not_found("skinned mesh node"))?;
        let skin_key = node.skin.ok_or(OsteonError::SkinNotFound(node.id()))?;
        let skin = graph
            .skin(skin_key)
            .ok_or(OsteonError::SkinNotFound(node.id()))?;

        let mesh_world_inv = node.transform.world_matrix.inverse();

        if let Some(palette) = self.palettes.get_mut(mesh_node) {
            skin.compute_joint_matrices(graph.nodes(), mesh_world_inv, &mut palette.matrices)?;
            palette.skin = skin_key;
            return Ok(palette.matrices.len());
        }

        let mut matrices = Vec::with_capacity(skin.joint_count());
        skin.compute_joint_matrices(graph.nodes(), mesh_world_inv, &mut matrices)?;
        let count = matrices.len();
        self.palettes.insert(
            mesh_node,
            JointPalette {
                skin: skin_key,
                matrices,
            },
        );
        Ok(count)
    }

    #[must_use]
    pub fn palette(&self, mesh_node: NodeHandle) -> Option<&JointPalette> {
        self.palettes.get(mesh_node)
    }

    #[must_use]
    pub fn joint_matrices(&self, mesh_node: NodeHandle) -> Option<&[Mat4]> {
        self.palettes.get(mesh_node).map(JointPalette::matrices)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &JointPalette)> {
        self.palettes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn clear(&mut self) {
        self.palettes.clear();
    }
}
