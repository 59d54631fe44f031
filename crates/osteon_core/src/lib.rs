//! Foundational types shared by the Osteon crates.
//!
//! - [`errors`]: the engine-wide [`OsteonError`] and [`Result`] alias
//! - [`NodeId`]: loader-assigned node identifier
//! - [`BoundingBox`]: axis-aligned box with axis-projection transform

pub mod bounds;
pub mod errors;

use std::fmt;

pub use bounds::BoundingBox;
pub use errors::{OsteonError, Result};

/// Stable identifier a loader assigns to a node at construction.
///
/// Identifiers are unique within a scene but not necessarily contiguous,
/// and are unrelated to where the node lives in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}
