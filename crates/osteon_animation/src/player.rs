use std::sync::Arc;

use osteon_core::{OsteonError, Result};
use osteon_scene::SceneGraph;

use crate::channel::TargetPath;
use crate::clip::AnimationClip;
use crate::sampler::SamplerOutputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopMode {
    /// Play to the end of the clip and pause there.
    Once,
    #[default]
    Loop,
    PingPong,
}

/// Evaluates clips and writes the results into node local transforms.
///
/// Holds the clip library and the playback state of the one active clip.
/// Evaluation only touches TRS fields of channel targets; world matrices
/// are left for [`SceneGraph::update`].
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clips: Vec<Arc<AnimationClip>>,
    active: Option<usize>,

    /// Playback position in clip time, inside `[start, end]` of the active clip.
    pub time: f32,
    /// Multiplier applied to `dt`; negative plays backwards.
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            active: None,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
        }
    }
}

impl AnimationPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clip to the library and returns its index.
    pub fn add_clip(&mut self, clip: impl Into<Arc<AnimationClip>>) -> usize {
        self.clips.push(clip.into());
        self.clips.len() - 1
    }

    #[must_use]
    pub fn clip(&self, index: usize) -> Option<&Arc<AnimationClip>> {
        self.clips.get(index)
    }

    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    /// Index of the first clip named `name`.
    #[must_use]
    pub fn clip_by_name(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.name == name)
    }

    #[must_use]
    pub fn active_clip(&self) -> Option<usize> {
        self.active
    }

    /// Starts `index` from its first keyframe.
    pub fn play(&mut self, index: usize) -> Result<()> {
        let clip = self.clips.get(index).ok_or(OsteonError::ClipNotFound(index))?;
        log::debug!("Playing clip '{}' ({} channels)", clip.name, clip.channels().len());
        self.time = clip.start();
        self.active = Some(index);
        self.paused = false;
        Ok(())
    }

    pub fn play_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .clip_by_name(name)
            .ok_or_else(|| OsteonError::ClipNameNotFound(name.to_string()))?;
        self.play(index)
    }

    /// Clears the active clip. Node transforms keep their last pose.
    pub fn stop(&mut self) {
        self.active = None;
        self.time = 0.0;
    }

    /// Advances playback by `dt` seconds and applies the active clip.
    ///
    /// Returns the number of channels applied; zero without an active clip.
    pub fn update(&mut self, dt: f32, graph: &mut SceneGraph) -> Result<usize> {
        let Some(index) = self.active else {
            return Ok(0);
        };
        let clip = self
            .clips
            .get(index)
            .ok_or(OsteonError::ClipNotFound(index))?;
        let (start, end) = (clip.start(), clip.end());

        if !self.paused {
            self.advance(dt, start, end);
        }
        self.apply(index, self.time, graph)
    }

    fn advance(&mut self, dt: f32, start: f32, end: f32) {
        let duration = end - start;
        if duration <= 0.0 {
            self.time = start;
            return;
        }

        let local = self.time - start + dt * self.time_scale;

        let local = match self.loop_mode {
            LoopMode::Once => {
                if local >= duration {
                    self.paused = true;
                    duration
                } else if local < 0.0 {
                    self.paused = true;
                    0.0
                } else {
                    local
                }
            }
            LoopMode::Loop => local.rem_euclid(duration),
            LoopMode::PingPong => {
                let t = local.rem_euclid(duration * 2.0);
                if t > duration { duration * 2.0 - t } else { t }
            }
        };

        self.time = start + local;
    }

    /// Evaluates clip `index` at `time` and writes the affected TRS fields.
    ///
    /// Every channel target is resolved before anything is written, so an
    /// unknown clip or a removed target node leaves the scene untouched.
    /// Returns the number of channels that wrote a value.
    pub fn apply(&self, index: usize, time: f32, graph: &mut SceneGraph) -> Result<usize> {
        let clip = self.clips.get(index).ok_or(OsteonError::ClipNotFound(index))?;

        if let Some(channel) = clip
            .channels()
            .iter()
            .position(|channel| !graph.contains(channel.node))
        {
            return Err(OsteonError::node_not_found(format!(
                "target of channel {channel} in clip '{}'",
                clip.name
            )));
        }

        let mut applied = 0;
        for channel in clip.channels() {
            let Some(sampler) = clip.samplers().get(channel.sampler) else {
                continue;
            };
            let Some(node) = graph.node_mut(channel.node) else {
                continue;
            };
            let transform = &mut node.transform;

            let wrote = match (&sampler.outputs, channel.path) {
                (SamplerOutputs::Vector3(values), TargetPath::Translation) => {
                    write_sample(sampler.sample(values, time), &mut transform.translation)
                }
                (SamplerOutputs::Vector3(values), TargetPath::Scale) => {
                    write_sample(sampler.sample(values, time), &mut transform.scale)
                }
                (SamplerOutputs::Rotation(values), TargetPath::Rotation) => {
                    write_sample(sampler.sample(values, time), &mut transform.rotation)
                }
                _ => false,
            };

            if wrote {
                applied += 1;
            }
        }

        log::trace!(
            "Clip '{}' at t={time}: {applied}/{} channels applied",
            clip.name,
            clip.channels().len()
        );
        Ok(applied)
    }
}

fn write_sample<T>(value: Option<T>, slot: &mut T) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::AnimationSampler;
    use crate::AnimationChannel;
    use glam::Vec3;
    use osteon_scene::Node;

    fn player_with_clip(graph: &mut SceneGraph) -> AnimationPlayer {
        let node = graph.add_node(Node::new(0));
        let sampler = AnimationSampler::linear_vec3(vec![1.0, 3.0], vec![Vec3::ZERO, Vec3::X]);
        let channel = AnimationChannel::new(TargetPath::Translation, node, 0);
        let clip = AnimationClip::new("slide", vec![sampler], vec![channel]).unwrap();
        let mut player = AnimationPlayer::new();
        player.add_clip(clip);
        player
    }

    #[test]
    fn loop_wraps_into_clip_range() {
        let mut graph = SceneGraph::new();
        let mut player = player_with_clip(&mut graph);
        player.play(0).unwrap();
        assert_eq!(player.time, 1.0);

        player.update(2.5, &mut graph).unwrap();
        assert!((player.time - 1.5).abs() < 1e-5);
    }

    #[test]
    fn once_pauses_at_end() {
        let mut graph = SceneGraph::new();
        let mut player = player_with_clip(&mut graph);
        player.loop_mode = LoopMode::Once;
        player.play(0).unwrap();

        player.update(10.0, &mut graph).unwrap();
        assert!(player.paused);
        assert_eq!(player.time, 3.0);
    }

    #[test]
    fn ping_pong_reflects_at_end() {
        let mut graph = SceneGraph::new();
        let mut player = player_with_clip(&mut graph);
        player.loop_mode = LoopMode::PingPong;
        player.play(0).unwrap();

        player.update(2.5, &mut graph).unwrap();
        assert!((player.time - 2.5).abs() < 1e-5);
    }

    #[test]
    fn play_by_unknown_name_fails() {
        let mut player = AnimationPlayer::new();
        assert_eq!(
            player.play_by_name("run"),
            Err(OsteonError::ClipNameNotFound("run".to_string()))
        );
    }
}
