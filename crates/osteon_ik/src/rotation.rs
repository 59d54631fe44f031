use std::f32::consts::PI;

use glam::{Quat, Vec3};

/// Rotation taking the direction of `from` onto the direction of `to`.
///
/// Inputs need not be normalized. A zero-length input yields identity.
/// Anti-parallel inputs yield a half turn about an axis orthogonal to
/// `from`, built from the coordinate axis least aligned with it, so the
/// result is never NaN.
#[must_use]
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    let (Some(from), Some(to)) = (from.try_normalize(), to.try_normalize()) else {
        return Quat::IDENTITY;
    };

    let cos = from.dot(to).clamp(-1.0, 1.0);
    if cos >= 1.0 - 1e-6 {
        return Quat::IDENTITY;
    }
    if cos <= -1.0 + 1e-6 {
        return Quat::from_axis_angle(orthogonal_axis(from), PI);
    }

    let axis = from.cross(to).normalize();
    Quat::from_axis_angle(axis, cos.acos())
}

/// Unit vector orthogonal to the unit vector `v`.
#[must_use]
pub fn orthogonal_axis(v: Vec3) -> Vec3 {
    let abs = v.abs();
    let least_aligned = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    v.cross(least_aligned).normalize()
}
