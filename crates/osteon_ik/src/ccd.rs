use glam::{Affine3A, Quat, Vec3};
use osteon_core::{OsteonError, Result};
use smallvec::SmallVec;

use crate::rotation::shortest_arc;

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CcdSettings {
    /// Maximum number of sweeps from effector to root.
    /// Default: 15
    pub max_iterations: u32,
    /// Distance from effector to target at which the chain counts as solved.
    /// Default: 0.01
    pub threshold: f32,
}

impl Default for CcdSettings {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            threshold: 0.01,
        }
    }
}

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IkOutcome {
    /// The effector got within the threshold during sweep `iterations`
    /// (zero when it already was before the first sweep).
    Converged { iterations: u32, distance: f32 },
    /// Every sweep ran without reaching the threshold. The chain keeps the
    /// rotations applied so far.
    Exhausted { distance: f32 },
}

impl IkOutcome {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, IkOutcome::Converged { .. })
    }

    /// Effector to target distance when the solve stopped.
    #[must_use]
    pub fn distance(&self) -> f32 {
        match *self {
            IkOutcome::Converged { distance, .. } | IkOutcome::Exhausted { distance } => distance,
        }
    }
}

// Chains are short; keep prefix products off the heap.
type Globals = SmallVec<[Affine3A; 16]>;

/// Cyclic coordinate descent solver.
///
/// Operates on a caller-owned chain of local transforms ordered root first,
/// effector last. Only rotations are written: every entry keeps its
/// translation and scale, so link lengths never change as long as the
/// joints above a link scale uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CcdSolver {
    pub settings: CcdSettings,
}

impl CcdSolver {
    #[must_use]
    pub fn new(settings: CcdSettings) -> Self {
        Self { settings }
    }

    /// Rotates the joints of `chain` so its last entry approaches `target`.
    ///
    /// `target` is expressed in the frame `chain[0]` is relative to.
    pub fn solve(&self, chain: &mut [Affine3A], target: Vec3) -> Result<IkOutcome> {
        if chain.is_empty() {
            return Err(OsteonError::EmptyIkChain);
        }

        let threshold_sq = self.settings.threshold * self.settings.threshold;
        let mut globals = Globals::new();

        for iteration in 0..self.settings.max_iterations {
            let distance_sq = effector(chain, &mut globals).distance_squared(target);
            if distance_sq < threshold_sq {
                return Ok(converged(iteration, distance_sq));
            }

            for joint in (0..chain.len() - 1).rev() {
                let effector_pos = effector(chain, &mut globals);
                let joint_global = globals[joint];
                let joint_pos: Vec3 = joint_global.translation.into();
                let (_, joint_rotation, _) = joint_global.to_scale_rotation_translation();

                let world_delta = shortest_arc(effector_pos - joint_pos, target - joint_pos);
                let local_delta = joint_rotation.inverse() * world_delta * joint_rotation;
                chain[joint] = rotate_local(chain[joint], local_delta);

                let distance_sq = effector(chain, &mut globals).distance_squared(target);
                if distance_sq < threshold_sq {
                    return Ok(converged(iteration + 1, distance_sq));
                }
            }
        }

        let distance = effector(chain, &mut globals).distance(target);
        log::debug!(
            "CCD exhausted {} iterations, {distance} from target",
            self.settings.max_iterations
        );
        Ok(IkOutcome::Exhausted { distance })
    }
}

fn converged(iterations: u32, distance_sq: f32) -> IkOutcome {
    let distance = distance_sq.sqrt();
    log::debug!("CCD converged after {iterations} iterations, {distance} from target");
    IkOutcome::Converged {
        iterations,
        distance,
    }
}

/// Refills `globals` with prefix products of `chain`; returns the effector position.
fn effector(chain: &[Affine3A], globals: &mut Globals) -> Vec3 {
    globals.clear();
    let mut acc = Affine3A::IDENTITY;
    for local in chain {
        acc = acc * *local;
        globals.push(acc);
    }
    acc.translation.into()
}

/// Applies `delta` inside the rotation of a TRS matrix, ahead of its scale.
///
/// The result stays `T * (R * delta) * S`, so translation and scale of the
/// entry are untouched and it still decomposes exactly.
fn rotate_local(local: Affine3A, delta: Quat) -> Affine3A {
    let (scale, rotation, translation) = local.to_scale_rotation_translation();
    let rotation = normalize_or_identity(rotation * normalize_or_identity(delta));
    Affine3A::from_scale_rotation_translation(scale, rotation, translation)
}

fn normalize_or_identity(q: Quat) -> Quat {
    let q = q.normalize();
    if q.is_finite() { q } else { Quat::IDENTITY }
}
