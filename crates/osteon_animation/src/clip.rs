use osteon_core::{OsteonError, Result};

use crate::channel::{AnimationChannel, TargetPath};
use crate::sampler::{AnimationSampler, InterpolationMode, SamplerOutputs};

/// Immutable keyframe data for one animation.
///
/// `start` and `end` are derived from the sampler inputs at construction and
/// cannot be set independently.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    samplers: Vec<AnimationSampler>,
    channels: Vec<AnimationChannel>,
    start: f32,
    end: f32,
}

impl AnimationClip {
    /// Validates channel → sampler references and output kinds.
    ///
    /// Non-linear interpolation modes and unsorted inputs are accepted with
    /// a warning.
    pub fn new(
        name: &str,
        samplers: Vec<AnimationSampler>,
        channels: Vec<AnimationChannel>,
    ) -> Result<Self> {
        for (index, channel) in channels.iter().enumerate() {
            let sampler = samplers.get(channel.sampler).ok_or_else(|| {
                OsteonError::index_out_of_bounds(
                    format!("sampler of channel {index} in clip '{name}'"),
                    channel.sampler,
                )
            })?;

            let kind_matches = matches!(
                (channel.path, &sampler.outputs),
                (
                    TargetPath::Translation | TargetPath::Scale,
                    SamplerOutputs::Vector3(_)
                ) | (TargetPath::Rotation, SamplerOutputs::Rotation(_))
            );
            if !kind_matches {
                return Err(OsteonError::SamplerOutputMismatch {
                    clip: name.to_string(),
                    channel: index,
                    path: channel.path.name(),
                });
            }
        }

        for (index, sampler) in samplers.iter().enumerate() {
            if sampler.interpolation != InterpolationMode::Linear {
                log::warn!(
                    "Clip '{name}' sampler {index}: {:?} interpolation is evaluated as linear",
                    sampler.interpolation
                );
            }
            if !sampler.is_sorted() {
                log::warn!("Clip '{name}' sampler {index}: input times are not ascending");
            }
            if sampler.outputs.len() < sampler.inputs.len() {
                log::warn!(
                    "Clip '{name}' sampler {index}: {} outputs for {} inputs",
                    sampler.outputs.len(),
                    sampler.inputs.len()
                );
            }
        }

        let (start, end) = samplers
            .iter()
            .flat_map(|s| s.inputs.iter().copied())
            .fold(None, |range: Option<(f32, f32)>, t| {
                Some(range.map_or((t, t), |(lo, hi)| (lo.min(t), hi.max(t))))
            })
            .unwrap_or((0.0, 0.0));

        Ok(Self {
            name: name.to_string(),
            samplers,
            channels,
            start,
            end,
        })
    }

    #[inline]
    #[must_use]
    pub fn samplers(&self) -> &[AnimationSampler] {
        &self.samplers
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[AnimationChannel] {
        &self.channels
    }

    /// Earliest input time over all samplers.
    #[inline]
    #[must_use]
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Latest input time over all samplers.
    #[inline]
    #[must_use]
    pub fn end(&self) -> f32 {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}
