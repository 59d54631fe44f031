use osteon_core::Result;
use osteon_scene::SceneHandles;

use crate::channel::{AnimationChannel, TargetPath};
use crate::clip::AnimationClip;
use crate::sampler::AnimationSampler;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelDescription {
    pub path: TargetPath,
    /// Index into [`SceneDescription::nodes`](osteon_scene::SceneDescription::nodes).
    pub node: usize,
    pub sampler: usize,
}

/// Clip data as a loader produces it, with targets as description indices.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationClipDescription {
    pub name: String,
    pub samplers: Vec<AnimationSampler>,
    pub channels: Vec<ChannelDescription>,
}

impl AnimationClipDescription {
    /// Resolves channel targets through `handles` and validates the clip.
    pub fn build(&self, handles: &SceneHandles) -> Result<AnimationClip> {
        let channels = self
            .channels
            .iter()
            .map(|c| Ok(AnimationChannel::new(c.path, handles.node(c.node)?, c.sampler)))
            .collect::<Result<Vec<_>>>()?;

        AnimationClip::new(&self.name, self.samplers.clone(), channels)
    }
}
