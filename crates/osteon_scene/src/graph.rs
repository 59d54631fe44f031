use glam::Affine3A;
use osteon_core::{NodeId, OsteonError, Result};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::mesh::Mesh;
use crate::node::Node;
use crate::skin::Skin;
use crate::transform::compose_local;
use crate::transform_system::{self, DepthFirst};
use crate::{MeshKey, NodeHandle, SkinKey};

/// Scene graph
///
/// Owns the node forest in a slot-map arena together with the meshes and
/// skins nodes refer to. Parent/child links are arena handles, so removing a
/// node never leaves a dangling pointer: a stale handle simply stops
/// resolving.
///
/// Structure is built once (see [`SceneDescription`](crate::SceneDescription))
/// and afterwards only local transforms (written by animation) and world
/// matrices (written by [`SceneGraph::update`]) change.
#[derive(Debug, Default)]
pub struct SceneGraph {
    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    pub(crate) roots: Vec<NodeHandle>,

    pub(crate) meshes: SlotMap<MeshKey, Mesh>,
    pub(crate) skins: SlotMap<SkinKey, Skin>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Inserts `node` as a new root. The caller keeps node ids unique.
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        node.world_valid = false;
        let handle = self.nodes.insert(node);
        self.roots.push(handle);
        handle
    }

    /// Inserts `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, mut node: Node) -> Result<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return Err(OsteonError::node_not_found("parent for new child"));
        }

        node.parent = Some(parent);
        node.children.clear();
        node.world_valid = false;
        let handle = self.nodes.insert(node);
        self.nodes[parent].children.push(handle);
        Ok(handle)
    }

    /// Moves `child` (with its subtree) under `parent`, appended last.
    ///
    /// Rejects attaching a node to itself or to one of its descendants.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        let child_id = self
            .nodes
            .get(child)
            .ok_or_else(|| OsteonError::node_not_found("child to attach"))?
            .id;
        if !self.nodes.contains_key(parent) {
            return Err(OsteonError::node_not_found("parent to attach to"));
        }
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach node {child_id}: would create a cycle");
            return Err(OsteonError::CyclicHierarchy(child_id));
        }

        self.unlink(child);
        self.nodes[parent].children.push(child);

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.world_valid = false;
        node.transform.mark_dirty();
        Ok(())
    }

    /// Turns `child` into a root, keeping its subtree.
    pub fn detach(&mut self, child: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(OsteonError::node_not_found("node to detach"));
        }
        if self.nodes[child].parent.is_none() {
            return Ok(());
        }

        self.unlink(child);
        self.roots.push(child);

        let node = &mut self.nodes[child];
        node.parent = None;
        node.world_valid = false;
        node.transform.mark_dirty();
        Ok(())
    }

    /// Removes `handle` and its whole subtree. Returns the number of nodes removed.
    ///
    /// Skins that referenced removed nodes keep their (now stale) handles and
    /// report not-found when evaluated.
    pub fn remove_node(&mut self, handle: NodeHandle) -> usize {
        if !self.nodes.contains_key(handle) {
            return 0;
        }

        self.unlink(handle);

        let mut removed = 0;
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Detaches `handle` from its parent's child list, or from the root list.
    fn unlink(&mut self, handle: NodeHandle) {
        let parent = self.nodes.get(handle).and_then(|n| n.parent);
        let siblings = match parent {
            Some(p) => self.nodes.get_mut(p).map(|n| &mut n.children),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings
            && let Some(pos) = siblings.iter().position(|&x| x == handle)
        {
            siblings.remove(pos);
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    // ========================================================================
    // Access & Traversal
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// Mutable node access, for writing local TRS.
    #[inline]
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &SlotMap<NodeHandle, Node> {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, pre-order walk of the whole forest in insertion order.
    #[must_use]
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst::new(&self.nodes, &self.roots)
    }

    /// Depth-first walk of the subtree rooted at `handle`.
    #[must_use]
    pub fn subtree(&self, handle: NodeHandle) -> DepthFirst<'_> {
        DepthFirst::new(&self.nodes, std::slice::from_ref(&handle))
    }

    /// Finds a node by identifier with a depth-first search.
    ///
    /// Cost grows with the number of nodes visited before the match. For
    /// repeated lookups build a [`NodeLookup`] once with
    /// [`SceneGraph::build_lookup`].
    #[must_use]
    pub fn find_node(&self, id: NodeId) -> Option<NodeHandle> {
        self.depth_first()
            .find(|(_, node)| node.id == id)
            .map(|(handle, _)| handle)
    }

    /// First node named `name` in depth-first order.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.depth_first()
            .find(|(_, node)| node.name == name)
            .map(|(handle, _)| handle)
    }

    /// Builds an id → handle index. Invalidated by structural edits.
    #[must_use]
    pub fn build_lookup(&self) -> NodeLookup {
        let mut map = FxHashMap::default();
        map.reserve(self.nodes.len());
        for (handle, node) in self.depth_first() {
            map.entry(node.id).or_insert(handle);
        }
        NodeLookup { map }
    }

    // ========================================================================
    // Matrix Update
    // ========================================================================

    /// Recomputes local and world matrices for the whole forest.
    ///
    /// Depth-first, pre-order, children in insertion order. Returns the
    /// number of nodes visited.
    pub fn update(&mut self) -> usize {
        let visited = transform_system::update_hierarchy(&mut self.nodes, &self.roots);
        log::trace!("Scene graph update visited {visited} nodes");
        visited
    }

    /// Recomputes the subtree under `handle` from its parent's cached world.
    pub fn update_subtree(&mut self, handle: NodeHandle) -> usize {
        transform_system::update_subtree(&mut self.nodes, handle)
    }

    /// Whether the cached world matrix of `handle` reflects the current TRS
    /// of the node and all its ancestors.
    #[must_use]
    pub fn is_world_valid(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                return false;
            };
            if !node.world_valid || node.transform.is_dirty() {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Cached world matrix, or `None` if the node is missing or stale.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<&Affine3A> {
        if !self.is_world_valid(handle) {
            return None;
        }
        self.nodes.get(handle).map(|n| &n.transform.world_matrix)
    }

    /// World matrix computed from current TRS values up the parent chain,
    /// independent of the cache.
    #[must_use]
    pub fn compute_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let t = &node.transform;
        let mut world = compose_local(t.translation, t.rotation, t.scale);
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            let t = &node.transform;
            world = compose_local(t.translation, t.rotation, t.scale) * world;
        }
        Some(world)
    }

    // ========================================================================
    // Meshes & Skins
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    #[must_use]
    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshKey, &Mesh)> {
        self.meshes.iter()
    }

    pub fn add_skin(&mut self, skin: Skin) -> SkinKey {
        self.skins.insert(skin)
    }

    #[must_use]
    pub fn skin(&self, key: SkinKey) -> Option<&Skin> {
        self.skins.get(key)
    }

    pub fn skins(&self) -> impl Iterator<Item = (SkinKey, &Skin)> {
        self.skins.iter()
    }
}

/// Identifier index built once after construction.
#[derive(Debug, Clone, Default)]
pub struct NodeLookup {
    map: FxHashMap<NodeId, NodeHandle>,
}

impl NodeLookup {
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeHandle> {
        self.map.get(&id).copied()
    }

    pub fn require(&self, id: NodeId) -> Result<NodeHandle> {
        self.get(id).ok_or(OsteonError::NodeIdNotFound(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
