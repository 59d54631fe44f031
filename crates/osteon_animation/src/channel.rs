use osteon_scene::NodeHandle;

/// Node property a channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

impl TargetPath {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TargetPath::Translation => "translation",
            TargetPath::Rotation => "rotation",
            TargetPath::Scale => "scale",
        }
    }
}

/// Binds one sampler of the owning clip to a node property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationChannel {
    pub path: TargetPath,
    /// Non-owning handle into the scene arena.
    pub node: NodeHandle,
    /// Index into [`AnimationClip::samplers`](crate::AnimationClip::samplers).
    pub sampler: usize,
}

impl AnimationChannel {
    #[must_use]
    pub fn new(path: TargetPath, node: NodeHandle, sampler: usize) -> Self {
        Self {
            path,
            node,
            sampler,
        }
    }
}
