//! Transform tests
//!
//! Tests for:
//! - Transform TRS defaults and dirty checking
//! - Local matrix composition order (T * R * S)
//! - Euler angle round-trip conversions
//! - apply_local_matrix decomposition

use glam::{Affine3A, Mat4, Quat, Vec3};
use osteon::Transform;
use osteon::scene::transform::compose_local;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.translation, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(*t.local_matrix(), Affine3A::IDENTITY);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // A fresh transform always rebuilds once.
    assert!(t.is_dirty());
    assert!(t.update_local_matrix());

    assert!(!t.is_dirty());
    assert!(!t.update_local_matrix());

    t.translation = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    // Writing the same value back is not a change.
    t.translation = Vec3::new(1.0, 2.0, 3.0);
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn local_matrix_scales_then_rotates_then_translates() {
    let mut t = Transform::from_trs(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_rotation_z(FRAC_PI_2),
        Vec3::new(2.0, 1.0, 1.0),
    );
    t.update_local_matrix();

    // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (10,2,0)
    let p = t.local_matrix().transform_point3(Vec3::X);
    assert!(vec3_approx(p, Vec3::new(10.0, 2.0, 0.0)), "got {p}");

    let expected = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))
        * Mat4::from_quat(Quat::from_rotation_z(FRAC_PI_2))
        * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
    assert!(Mat4::from(*t.local_matrix()).abs_diff_eq(expected, EPSILON));
}

#[test]
fn compose_local_matches_transform() {
    let translation = Vec3::new(1.0, -2.0, 0.5);
    let rotation = Quat::from_rotation_y(0.4);
    let scale = Vec3::splat(1.5);

    let mut t = Transform::from_trs(translation, rotation, scale);
    t.update_local_matrix();

    assert!(
        Mat4::from(compose_local(translation, rotation, scale))
            .abs_diff_eq(Mat4::from(*t.local_matrix()), EPSILON)
    );
}

#[test]
fn euler_round_trip() {
    let mut t = Transform::new();
    t.set_rotation_euler(0.3, -FRAC_PI_4, 0.7);
    let euler = t.rotation_euler();
    assert!(vec3_approx(euler, Vec3::new(0.3, -FRAC_PI_4, 0.7)), "got {euler}");
}

#[test]
fn apply_local_matrix_decomposes_into_trs() {
    let translation = Vec3::new(3.0, 4.0, 5.0);
    let rotation = Quat::from_rotation_x(FRAC_PI_4);
    let scale = Vec3::new(1.0, 2.0, 3.0);

    let mut t = Transform::new();
    t.update_local_matrix();
    t.apply_local_matrix(Affine3A::from_scale_rotation_translation(
        scale,
        rotation,
        translation,
    ));

    assert!(t.is_dirty());
    assert!(vec3_approx(t.translation, translation));
    assert!(vec3_approx(t.scale, scale));
    assert!(t.rotation.angle_between(rotation) < 1e-4);
}

#[test]
fn apply_local_matrix_from_mat4() {
    let m = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
    let mut t = Transform::new();
    t.apply_local_matrix_from_mat4(m);
    t.update_local_matrix();

    assert!(vec3_approx(t.translation, Vec3::Y));
    assert!(vec3_approx(t.scale, Vec3::splat(2.0)));
    assert!(Mat4::from(*t.local_matrix()).abs_diff_eq(m, EPSILON));
}
