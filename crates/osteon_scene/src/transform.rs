use glam::{Affine3A, EulerRot, Mat4, Quat, Vec3};

/// Transform component
///
/// Holds a node's translation, rotation and scale (TRS) together with the
/// cached local and world matrices and the shadow state used for dirty checks.
///
/// The local matrix is always composed as `T * R * S`.
#[derive(Debug, Clone)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    last_translation: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_translation: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            ..Self::new()
        }
    }

    /// Whether the TRS fields changed since the local matrix was last rebuilt.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.force_update
            || self.translation != self.last_translation
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
    }

    /// Rebuilds the local matrix if the TRS fields changed.
    ///
    /// Returns whether the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.is_dirty();

        if changed {
            self.local_matrix = compose_local(self.translation, self.rotation, self.scale);

            self.last_translation = self.translation;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Sets the rotation from XYZ Euler angles (radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Current rotation as XYZ Euler angles (radians).
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// World matrix as of the last hierarchy update. May be stale; use
    /// [`SceneGraph::world_matrix`](crate::SceneGraph::world_matrix) for a
    /// checked read.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub(crate) fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Replaces TRS with the decomposition of `mat`.
    ///
    /// Shear in `mat` cannot be represented by TRS and is lost.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        let (scale, rotation, translation) = mat.to_scale_rotation_translation();

        self.scale = scale;
        self.rotation = rotation;
        self.translation = translation;

        self.mark_dirty();
    }

    pub fn apply_local_matrix_from_mat4(&mut self, mat: Mat4) {
        self.apply_local_matrix(Affine3A::from_mat4(mat));
    }

    /// Forces the next update to rebuild the local matrix.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// `Translate(t) * Rotate(r) * Scale(s)`.
#[inline]
#[must_use]
pub fn compose_local(translation: Vec3, rotation: Quat, scale: Vec3) -> Affine3A {
    Affine3A::from_scale_rotation_translation(scale, rotation, translation)
}
