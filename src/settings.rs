//! Engine Settings
//!
//! Per-tick configuration for [`Engine`](crate::Engine).
//!
//! ```rust,ignore
//! use osteon::{Engine, EngineSettings};
//!
//! // Animation and skinning only; bounds computed on demand.
//! let engine = Engine::new(EngineSettings {
//!     compute_bounds: false,
//!     ..Default::default()
//! });
//! ```

use osteon_ik::CcdSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineSettings {
    /// Recompute per-node bounding volumes and scene dimensions every tick.
    /// Default: true
    pub compute_bounds: bool,
    /// Recompute joint palettes of skinned meshes every tick.
    /// Default: true
    pub update_skins: bool,
    /// Solver configuration used by [`Engine::solve_ik`](crate::Engine::solve_ik).
    pub ik: CcdSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            compute_bounds: true,
            update_skins: true,
            ik: CcdSettings::default(),
        }
    }
}
