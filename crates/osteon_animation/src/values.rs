use glam::{Quat, Vec3, Vec4};

/// A property value that can be blended between two keyframes.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        nlerp(start, end, t)
    }
}

/// Normalized linear quaternion blend.
///
/// `end` is negated when the two rotations lie in opposite hemispheres so the
/// blend follows the shorter arc. The result is always unit length. At
/// `t == 1` a flipped `end` comes back as `-end`, the same rotation.
#[must_use]
pub fn nlerp(start: Quat, end: Quat, t: f32) -> Quat {
    let a = Vec4::from(start);
    let mut b = Vec4::from(end);
    if a.dot(b) < 0.0 {
        b = -b;
    }
    Quat::from_vec4(a.lerp(b, t)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn nlerp_takes_short_arc() {
        let a = Quat::from_rotation_y(0.1);
        // Same orientation as rotation_y(0.3), opposite sign.
        let b = -Quat::from_rotation_y(0.3);
        let mid = nlerp(a, b, 0.5);
        assert!(mid.angle_between(Quat::from_rotation_y(0.2)) < 1e-4);
    }

    #[test]
    fn nlerp_endpoints_match_rotations() {
        let a = Quat::from_rotation_z(0.4);
        let b = -Quat::from_rotation_z(1.3);
        assert!(nlerp(a, b, 0.0).angle_between(a) < 1e-4);
        assert!(nlerp(a, b, 1.0).angle_between(b) < 1e-4);
    }

    #[test]
    fn nlerp_is_unit_length() {
        let a = Quat::from_rotation_x(0.2);
        let b = Quat::from_rotation_z(PI * 0.9);
        for step in 0..=10 {
            let q = nlerp(a, b, step as f32 / 10.0);
            assert!((q.length() - 1.0).abs() < 1e-5);
        }
    }
}
