use glam::{Quat, Vec3};

use crate::values::Interpolatable;

/// How a sampler's keyframes are meant to be interpolated.
///
/// Only the keyframe pair scan of [`AnimationSampler::sample`] is
/// implemented; `Step` and `CubicSpline` data are blended linearly between
/// outputs `i` and `i + 1`, exactly like `Linear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    Step,
    #[default]
    Linear,
    CubicSpline,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplerOutputs {
    /// Translation or scale values.
    Vector3(Vec<Vec3>),
    /// Rotation values.
    Rotation(Vec<Quat>),
}

impl SamplerOutputs {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SamplerOutputs::Vector3(v) => v.len(),
            SamplerOutputs::Rotation(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Time → value curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationSampler {
    pub interpolation: InterpolationMode,
    /// Keyframe times, expected ascending.
    pub inputs: Vec<f32>,
    pub outputs: SamplerOutputs,
}

impl AnimationSampler {
    #[must_use]
    pub fn new(interpolation: InterpolationMode, inputs: Vec<f32>, outputs: SamplerOutputs) -> Self {
        Self {
            interpolation,
            inputs,
            outputs,
        }
    }

    #[must_use]
    pub fn linear_vec3(inputs: Vec<f32>, outputs: Vec<Vec3>) -> Self {
        Self::new(
            InterpolationMode::Linear,
            inputs,
            SamplerOutputs::Vector3(outputs),
        )
    }

    #[must_use]
    pub fn linear_rotation(inputs: Vec<f32>, outputs: Vec<Quat>) -> Self {
        Self::new(
            InterpolationMode::Linear,
            inputs,
            SamplerOutputs::Rotation(outputs),
        )
    }

    /// `(first, last)` input time, or `None` without keyframes.
    #[must_use]
    pub fn input_range(&self) -> Option<(f32, f32)> {
        let first = *self.inputs.first()?;
        let last = *self.inputs.last()?;
        Some((first, last))
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.inputs.windows(2).all(|w| w[0] <= w[1])
    }

    /// Scans every keyframe pair enclosing `time` and blends its outputs.
    ///
    /// All enclosing pairs are visited in order and the last applicable one
    /// wins; at an exact interior keyframe that is the pair starting there.
    /// Pairs with a blend factor that is not a number or exceeds one are
    /// skipped, as are pairs whose outputs are missing. Returns `None` when
    /// no pair applied, in which case the target keeps its value.
    pub fn sample<T: Interpolatable>(&self, outputs: &[T], time: f32) -> Option<T> {
        let mut result = None;
        for (i, pair) in self.inputs.windows(2).enumerate() {
            let (t0, t1) = (pair[0], pair[1]);
            if !(t0 <= time && time <= t1) {
                continue;
            }
            let (Some(&v0), Some(&v1)) = (outputs.get(i), outputs.get(i + 1)) else {
                continue;
            };
            if let Some(u) = keyframe_blend_factor(t0, t1, time) {
                result = Some(T::interpolate_linear(v0, v1, u));
            }
        }
        result
    }
}

/// Blend factor of `time` between keyframes at `t0` and `t1`.
///
/// `None` when the factor is not a number (zero-length interval) or greater
/// than one. Values outside the interval are not clamped.
#[must_use]
pub fn keyframe_blend_factor(t0: f32, t1: f32, time: f32) -> Option<f32> {
    let u = (time - t0).max(0.0) / (t1 - t0);
    if u.is_nan() || u > 1.0 { None } else { Some(u) }
}
