//! Bottom-up bounding volume aggregation.
//!
//! Per node, two volumes are tracked:
//! - `aabb`: the node's own mesh bounds in world space
//! - `bvh`: the union of `aabb` and every descendant's `bvh`
//!
//! Scene dimensions are the union of all valid node `bvh` volumes.

use osteon_core::BoundingBox;
use slotmap::SecondaryMap;

use crate::NodeHandle;
use crate::graph::SceneGraph;
use crate::transform_system::post_order;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeVolumes {
    /// World-space bounds of the node's own mesh.
    pub aabb: Option<BoundingBox>,
    /// Bounds of the node and its whole subtree.
    pub bvh: Option<BoundingBox>,
}

/// Computes [`NodeVolumes`] for every node and the scene-wide dimensions.
///
/// Reads cached world matrices, so it must run after
/// [`SceneGraph::update`].
#[derive(Debug, Default)]
pub struct BoundingVolumeAggregator {
    volumes: SecondaryMap<NodeHandle, NodeVolumes>,
    dimensions: Option<BoundingBox>,
}

impl BoundingVolumeAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes all volumes and returns the scene dimensions.
    pub fn compute(&mut self, graph: &SceneGraph) -> Option<BoundingBox> {
        self.volumes.clear();

        // Children come before parents, so child bvh volumes are final when
        // the parent folds them in.
        for handle in post_order(graph.nodes(), graph.roots()) {
            let node = &graph.nodes()[handle];

            let aabb = node
                .mesh
                .and_then(|key| graph.mesh(key))
                .and_then(|mesh| mesh.bounds)
                .map(|local| local.transform(node.world_matrix()));

            let bvh = node
                .children()
                .iter()
                .filter_map(|&child| self.volumes.get(child).and_then(|v| v.bvh))
                .fold(aabb, |acc, child_bvh| {
                    Some(acc.map_or(child_bvh, |b| b.union(&child_bvh)))
                });

            self.volumes.insert(handle, NodeVolumes { aabb, bvh });
        }

        self.dimensions = self
            .volumes
            .values()
            .filter_map(|v| v.bvh)
            .reduce(|acc, bvh| acc.union(&bvh));

        log::trace!(
            "Aggregated bounds for {} nodes, dimensions {:?}",
            self.volumes.len(),
            self.dimensions
        );
        self.dimensions
    }

    #[must_use]
    pub fn node_volumes(&self, handle: NodeHandle) -> Option<&NodeVolumes> {
        self.volumes.get(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &NodeVolumes)> {
        self.volumes.iter()
    }

    /// Union of every valid node volume from the last [`compute`](Self::compute).
    #[must_use]
    pub fn dimensions(&self) -> Option<BoundingBox> {
        self.dimensions
    }
}
