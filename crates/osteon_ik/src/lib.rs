//! Cyclic coordinate descent IK.
//!
//! The solver works on its own chain of local transforms, not on the scene
//! graph; see [`chain`] for moving between the two.

pub mod ccd;
pub mod chain;
pub mod rotation;

pub use ccd::{CcdSettings, CcdSolver, IkOutcome};
pub use chain::{chain_from_world, chain_globals, chain_world_positions};
pub use rotation::{orthogonal_axis, shortest_arc};
