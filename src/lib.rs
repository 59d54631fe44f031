#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Skeletal scene graph, skinning, keyframe animation and CCD IK.
//!
//! The member crates are re-exported as modules; the most used types are
//! also available at the root.

pub mod engine;
pub mod settings;

pub use osteon_animation as animation;
pub use osteon_ik as ik;
pub use osteon_scene as scene;

pub use engine::{Engine, TickReport};
pub use settings::EngineSettings;

pub use osteon_animation::{
    AnimationChannel, AnimationClip, AnimationClipDescription, AnimationPlayer, AnimationSampler,
    ChannelDescription, InterpolationMode, LoopMode, SamplerOutputs, TargetPath,
};
pub use osteon_core::{BoundingBox, NodeId, OsteonError, Result};
pub use osteon_ik::{CcdSettings, CcdSolver, IkOutcome};
pub use osteon_scene::{
    BoundingVolumeAggregator, JointPalette, Mesh, Node, NodeDescription, NodeHandle, NodeLookup,
    SceneDescription, SceneGraph, SceneHandles, Skin, SkinDescription, SkinningContext, Transform,
};
