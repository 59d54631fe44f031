//! Transform System
//!
//! Propagates local transforms into world matrices, decoupled from
//! [`SceneGraph`](crate::SceneGraph) so it only borrows the node arena and
//! the root list.
//!
//! Traversal is depth-first, pre-order, children in insertion order. Every
//! routine that visits the forest (update, lookup, bounds) uses this order.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::node::Node;

/// Updates the world matrix of every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion so deep skeletons cannot
/// overflow the call stack. A node's world matrix is only recomputed when
/// its local matrix changed, its parent's world matrix changed, or it was
/// not valid before; the result is identical to a full recompute.
///
/// Returns the number of nodes visited.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) -> usize {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    let mut visited = 0;
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };
        visited += 1;

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed || !node.world_valid;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }
        node.world_valid = true;

        let current_world = node.transform.world_matrix;

        // Reverse push keeps children in insertion order when popped.
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }

    visited
}

/// Updates the subtree rooted at `root_handle` from its parent's cached
/// world matrix. The parent must already be up to date.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) -> usize {
    let Some(node) = nodes.get(root_handle) else {
        return 0;
    };

    let parent_world = node
        .parent
        .and_then(|parent| nodes.get(parent))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    // Force the subtree root to recompute against the parent it has now.
    if let Some(node) = nodes.get_mut(root_handle) {
        node.world_valid = false;
    }

    let mut stack = vec![(root_handle, parent_world, true)];
    let mut visited = 0;
    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };
        visited += 1;

        let local_changed = node.transform.update_local_matrix();
        let needs_update = local_changed || parent_changed || !node.world_valid;
        if needs_update {
            node.transform
                .set_world_matrix(parent_world * *node.transform.local_matrix());
        }
        node.world_valid = true;

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, needs_update));
        }
    }

    visited
}

/// Depth-first, pre-order iterator over a node forest.
pub struct DepthFirst<'a> {
    nodes: &'a SlotMap<NodeHandle, Node>,
    stack: Vec<NodeHandle>,
}

impl<'a> DepthFirst<'a> {
    pub(crate) fn new(nodes: &'a SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) -> Self {
        Self {
            nodes,
            stack: roots.iter().rev().copied().collect(),
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (NodeHandle, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.stack.pop() {
            if let Some(node) = self.nodes.get(handle) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some((handle, node));
            }
        }
        None
    }
}

/// Post-order handle list (children before parents) for bottom-up passes.
#[must_use]
pub fn post_order(nodes: &SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) -> Vec<NodeHandle> {
    // Reversing a pre-order walk that visits children last-to-first yields a
    // post-order walk with children first-to-last.
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<NodeHandle> = roots.to_vec();
    while let Some(handle) = stack.pop() {
        if let Some(node) = nodes.get(handle) {
            order.push(handle);
            stack.extend(node.children.iter().copied());
        }
    }
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;

    fn link(nodes: &mut SlotMap<NodeHandle, Node>, parent: NodeHandle, child: NodeHandle) {
        nodes[parent].children.push(child);
        nodes[child].parent = Some(parent);
    }

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new(0);
        parent.transform.translation = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new(1);
        child.transform.translation = Vec3::new(0.0, 1.0, 0.0);
        let child_handle = nodes.insert(child);
        link(&mut nodes, parent_handle, child_handle);

        let visited = update_hierarchy(&mut nodes, &[parent_handle]);
        assert_eq!(visited, 2);

        let child_world_pos = nodes[child_handle].transform.world_matrix.translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
        assert!(nodes[child_handle].world_valid);
    }

    #[test]
    fn parent_change_propagates_to_unchanged_child() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let parent = nodes.insert(Node::new(0));
        let mut child = Node::new(1);
        child.transform.translation = Vec3::X;
        let child = nodes.insert(child);
        link(&mut nodes, parent, child);

        update_hierarchy(&mut nodes, &[parent]);

        nodes[parent].transform.rotation = Quat::from_rotation_z(FRAC_PI_2);
        update_hierarchy(&mut nodes, &[parent]);

        let pos: Vec3 = nodes[child].transform.world_matrix.translation.into();
        assert!((pos - Vec3::Y).length() < 1e-5, "got {pos}");
    }

    #[test]
    fn traversal_orders() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let a = nodes.insert(Node::new(0));
        let b = nodes.insert(Node::new(1));
        let c = nodes.insert(Node::new(2));
        let d = nodes.insert(Node::new(3));
        link(&mut nodes, a, b);
        link(&mut nodes, b, c);
        link(&mut nodes, a, d);

        let pre: Vec<_> = DepthFirst::new(&nodes, &[a]).map(|(h, _)| h).collect();
        assert_eq!(pre, vec![a, b, c, d]);

        let post = post_order(&nodes, &[a]);
        assert_eq!(post, vec![c, b, d, a]);
    }
}
