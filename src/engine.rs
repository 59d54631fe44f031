//! Engine Core Module
//!
//! [`Engine`] owns a scene graph together with everything that evaluates
//! against it and runs one frame of work per [`Engine::tick`]:
//!
//! 1. **Animation**: the active clip writes local TRS of its targets
//! 2. **Transforms**: world matrices are propagated top-down
//! 3. **Skinning**: joint palettes are recomputed for skinned meshes
//! 4. **Bounds**: node volumes and scene dimensions are aggregated
//!
//! The order is fixed; each stage reads what the previous one wrote. IK runs
//! outside the tick, on demand, through [`Engine::solve_ik`].
//!
//! # Example
//!
//! ```rust,ignore
//! use osteon::{Engine, EngineSettings};
//!
//! let (mut engine, handles) = Engine::from_description(&scene, &clips, EngineSettings::default())?;
//! engine.player.play_by_name("walk")?;
//!
//! loop {
//!     let report = engine.tick(dt)?;
//!     // ... upload engine.skinning palettes, cull against report.dimensions ...
//! }
//! ```

use glam::{Affine3A, Vec3};
use osteon_animation::{AnimationClipDescription, AnimationPlayer};
use osteon_core::{BoundingBox, OsteonError, Result};
use osteon_ik::{CcdSolver, IkOutcome};
use osteon_scene::transform::compose_local;
use osteon_scene::{
    BoundingVolumeAggregator, NodeHandle, SceneDescription, SceneGraph, SceneHandles,
    SkinningContext,
};

use crate::settings::EngineSettings;

/// What one [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Channels of the active clip that wrote a value.
    pub channels_applied: usize,
    /// Nodes visited by the world-matrix update.
    pub nodes_updated: usize,
    /// Joint palettes recomputed.
    pub palettes_updated: usize,
    /// Scene-wide bounds after the tick, if any mesh contributes bounds.
    pub dimensions: Option<BoundingBox>,
}

/// Single-threaded tick orchestrator.
///
/// All state is plain owned data; callers read the public fields between
/// ticks.
#[derive(Debug, Default)]
pub struct Engine {
    pub scene: SceneGraph,
    pub player: AnimationPlayer,
    pub skinning: SkinningContext,
    pub bounds: BoundingVolumeAggregator,
    pub settings: EngineSettings,

    time: f32,
    frame_count: u64,
}

impl Engine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Wraps an already built scene graph.
    #[must_use]
    pub fn with_scene(scene: SceneGraph, settings: EngineSettings) -> Self {
        Self {
            scene,
            settings,
            ..Self::default()
        }
    }

    /// Builds the scene and clip library from loader output.
    ///
    /// Clips are added to the player in order, so clip `i` of `clips` has
    /// index `i`. Nothing is returned on the first validation error.
    pub fn from_description(
        scene: &SceneDescription,
        clips: &[AnimationClipDescription],
        settings: EngineSettings,
    ) -> Result<(Self, SceneHandles)> {
        let (graph, handles) = scene.build()?;
        let mut engine = Self::with_scene(graph, settings);
        for clip in clips {
            engine.player.add_clip(clip.build(&handles)?);
        }
        Ok((engine, handles))
    }

    /// Runs one frame: animation, world matrices, skins, bounds.
    ///
    /// An animation error aborts the tick before any world matrix changes.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport> {
        let channels_applied = self.player.update(dt, &mut self.scene)?;
        let nodes_updated = self.scene.update();

        let palettes_updated = if self.settings.update_skins {
            self.skinning.update(&self.scene)
        } else {
            0
        };

        let dimensions = if self.settings.compute_bounds {
            self.bounds.compute(&self.scene)
        } else {
            self.bounds.dimensions()
        };

        self.time += dt;
        self.frame_count += 1;

        log::trace!(
            "Tick {}: {channels_applied} channels, {nodes_updated} nodes, {palettes_updated} palettes",
            self.frame_count
        );

        Ok(TickReport {
            channels_applied,
            nodes_updated,
            palettes_updated,
            dimensions,
        })
    }

    /// Total time passed to [`tick`](Self::tick), in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========================================================================
    // IK
    // ========================================================================

    /// Copies the local transforms of `joints` into a solver chain.
    ///
    /// `joints` is ordered root to effector and each entry must be a direct
    /// child of the one before it. Returns the world transform of the root
    /// joint's parent (identity for a scene root) and the chain.
    pub fn extract_ik_chain(&self, joints: &[NodeHandle]) -> Result<(Affine3A, Vec<Affine3A>)> {
        let Some(&root) = joints.first() else {
            return Err(OsteonError::EmptyIkChain);
        };

        let mut chain = Vec::with_capacity(joints.len());
        for (index, &handle) in joints.iter().enumerate() {
            let node = self
                .scene
                .node(handle)
                .ok_or_else(|| OsteonError::node_not_found(format!("IK joint {index}")))?;
            if index > 0 && node.parent() != Some(joints[index - 1]) {
                return Err(OsteonError::BrokenIkChain { index });
            }
            let t = &node.transform;
            chain.push(compose_local(t.translation, t.rotation, t.scale));
        }

        let parent_world = self
            .scene
            .node(root)
            .and_then(|node| node.parent())
            .and_then(|parent| self.scene.compute_world_matrix(parent))
            .unwrap_or(Affine3A::IDENTITY);

        Ok((parent_world, chain))
    }

    /// Writes a solved chain back into the local TRS of `joints`.
    ///
    /// World matrices refresh on the next tick.
    pub fn apply_ik_chain(&mut self, joints: &[NodeHandle], chain: &[Affine3A]) -> Result<()> {
        if joints.len() != chain.len() {
            return Err(OsteonError::index_out_of_bounds(
                "IK chain length",
                chain.len(),
            ));
        }
        if let Some(index) = joints.iter().position(|&h| !self.scene.contains(h)) {
            return Err(OsteonError::node_not_found(format!("IK joint {index}")));
        }

        for (&handle, local) in joints.iter().zip(chain) {
            if let Some(node) = self.scene.node_mut(handle) {
                node.transform.apply_local_matrix(*local);
            }
        }
        Ok(())
    }

    /// Poses `joints` so the last one approaches the world-space `target`.
    ///
    /// Partial results of an exhausted solve are written back as well.
    pub fn solve_ik(&mut self, joints: &[NodeHandle], target: Vec3) -> Result<IkOutcome> {
        let (parent_world, mut chain) = self.extract_ik_chain(joints)?;
        let local_target = parent_world.inverse().transform_point3(target);

        let outcome = CcdSolver::new(self.settings.ik).solve(&mut chain, local_target)?;
        self.apply_ik_chain(joints, &chain)?;
        Ok(outcome)
    }
}
