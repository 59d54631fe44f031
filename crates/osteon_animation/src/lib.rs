//! Keyframe animation: samplers, channels, clips and playback.

pub mod channel;
pub mod clip;
pub mod description;
pub mod player;
pub mod sampler;
pub mod values;

pub use channel::{AnimationChannel, TargetPath};
pub use clip::AnimationClip;
pub use description::{AnimationClipDescription, ChannelDescription};
pub use player::{AnimationPlayer, LoopMode};
pub use sampler::{AnimationSampler, InterpolationMode, SamplerOutputs, keyframe_blend_factor};
pub use values::{Interpolatable, nlerp};
