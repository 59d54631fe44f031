//! Conversions between world transforms and the local chains the solver
//! works on.
//!
//! A chain is ordered root first, effector last. `chain[0]` is relative to
//! whatever frame the caller picked (usually the parent of the root joint);
//! every following entry is relative to its predecessor.

use glam::{Affine3A, Vec3};

/// Builds a local chain from world transforms ordered root to effector.
///
/// `parent_world` is the world transform of the root joint's parent.
#[must_use]
pub fn chain_from_world(parent_world: Affine3A, world: &[Affine3A]) -> Vec<Affine3A> {
    let mut previous = parent_world;
    world
        .iter()
        .map(|&current| {
            let local = previous.inverse() * current;
            previous = current;
            local
        })
        .collect()
}

/// Accumulated global transform of every chain entry.
#[must_use]
pub fn chain_globals(chain: &[Affine3A]) -> Vec<Affine3A> {
    let mut acc = Affine3A::IDENTITY;
    chain
        .iter()
        .map(|local| {
            acc = acc * *local;
            acc
        })
        .collect()
}

/// Global position of every chain entry.
#[must_use]
pub fn chain_world_positions(chain: &[Affine3A]) -> Vec<Vec3> {
    chain_globals(chain)
        .into_iter()
        .map(|global| global.translation.into())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn round_trips_through_world_space() {
        let parent = Affine3A::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let world = [
            parent * Affine3A::from_rotation_translation(Quat::from_rotation_z(0.3), Vec3::X),
            parent
                * Affine3A::from_rotation_translation(Quat::from_rotation_z(0.7), Vec3::new(1.5, 0.8, 0.0)),
        ];

        let chain = chain_from_world(parent, &world);
        let positions = chain_world_positions(&chain);
        for (got, expected) in positions.iter().zip(&world) {
            let expected: Vec3 = (parent.inverse() * *expected).translation.into();
            assert!((*got - expected).length() < 1e-5);
        }
    }
}
