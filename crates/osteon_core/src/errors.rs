//! Error Types
//!
//! This module defines the error type shared by every Osteon crate.
//!
//! # Overview
//!
//! [`OsteonError`] covers the conditions the engine reports instead of
//! panicking:
//! - Hierarchy construction problems (bad parent index, cycles, duplicate ids)
//! - Lookups that do not resolve (stale node handles, unknown clips)
//! - Skin data inconsistencies detected at load time
//! - Animation data that cannot drive its channel
//! - IK requests that cannot be solved at all
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, OsteonError>`.
//!
//! ```rust,ignore
//! use osteon_core::errors::{OsteonError, Result};
//!
//! fn find_clip(index: usize, count: usize) -> Result<usize> {
//!     if index >= count {
//!         return Err(OsteonError::ClipNotFound(index));
//!     }
//!     Ok(index)
//! }
//! ```

use thiserror::Error;

use crate::NodeId;

/// The main error type for the Osteon engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OsteonError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A node handle did not resolve (the node was removed or never existed).
    #[error("Node not found: {context}")]
    NodeNotFound {
        /// Description of what was being resolved
        context: String,
    },

    /// No node carries the requested identifier.
    #[error("Node id not found: {0}")]
    NodeIdNotFound(NodeId),

    /// Two nodes were constructed with the same identifier.
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// Building or editing the hierarchy would create a cycle.
    #[error("Cyclic hierarchy at node {0}")]
    CyclicHierarchy(NodeId),

    /// Index into constructed data out of bounds.
    #[error("Index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// A skin's joint list and inverse-bind list have different lengths.
    #[error(
        "Skin '{skin}' has {joints} joints but {inverse_bind_matrices} inverse bind matrices"
    )]
    SkinJointMismatch {
        /// Skin name
        skin: String,
        /// Number of joints
        joints: usize,
        /// Number of inverse bind matrices
        inverse_bind_matrices: usize,
    },

    /// A node expected to carry a skin does not, or its skin was never added.
    #[error("No skin bound to node {0}")]
    SkinNotFound(NodeId),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// The requested clip index does not exist.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(usize),

    /// No clip carries the requested name.
    #[error("Animation clip not found: '{0}'")]
    ClipNameNotFound(String),

    /// A channel targets a property its sampler's output kind cannot drive.
    #[error("Channel {channel} of clip '{clip}' cannot drive {path} from its sampler")]
    SamplerOutputMismatch {
        /// Clip name
        clip: String,
        /// Channel index within the clip
        channel: usize,
        /// Target path name
        path: &'static str,
    },

    // ========================================================================
    // IK Errors
    // ========================================================================
    /// The solver was handed a chain without any transform.
    #[error("IK chain is empty")]
    EmptyIkChain,

    /// A scene-driven IK chain skips a generation: joint `index` is not a
    /// direct child of the joint before it.
    #[error("IK joint {index} is not a child of the previous joint")]
    BrokenIkChain {
        /// Position of the offending joint in the chain
        index: usize,
    },
}

impl OsteonError {
    /// Shorthand for [`OsteonError::NodeNotFound`].
    pub fn node_not_found(context: impl Into<String>) -> Self {
        OsteonError::NodeNotFound {
            context: context.into(),
        }
    }

    /// Shorthand for [`OsteonError::IndexOutOfBounds`].
    pub fn index_out_of_bounds(context: impl Into<String>, index: usize) -> Self {
        OsteonError::IndexOutOfBounds {
            context: context.into(),
            index,
        }
    }
}

/// Alias for `Result<T, OsteonError>`.
pub type Result<T> = std::result::Result<T, OsteonError>;
