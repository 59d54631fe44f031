//! Engine tests
//!
//! Tests for:
//! - Tick ordering: animation -> world matrices -> skins -> bounds
//! - TickReport contents and EngineSettings switches
//! - Scene-driven IK: chain extraction, solve, write-back

use glam::{Mat4, Vec3};
use osteon::{
    AnimationClipDescription, AnimationSampler, BoundingBox, ChannelDescription, Engine,
    EngineSettings, IkOutcome, Mesh, NodeDescription, NodeHandle, NodeId, OsteonError,
    SceneDescription, SkinDescription, TargetPath,
};

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn node(id: u32, name: &str, parent: Option<usize>, translation: Vec3) -> NodeDescription {
    NodeDescription {
        id: NodeId(id),
        name: name.into(),
        parent,
        translation,
        ..Default::default()
    }
}

/// body(0, skinned mesh) + shoulder(1) -> elbow(2) -> wrist(3), links of length 1.
fn arm_scene() -> (SceneDescription, Vec<AnimationClipDescription>) {
    let scene = SceneDescription {
        nodes: vec![
            NodeDescription {
                mesh: Some(0),
                skin: Some(0),
                ..node(0, "body", None, Vec3::ZERO)
            },
            node(1, "shoulder", None, Vec3::ZERO),
            node(2, "elbow", Some(1), Vec3::Y),
            node(3, "wrist", Some(2), Vec3::Y),
        ],
        meshes: vec![Mesh::new(
            "body",
            Some(BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5))),
        )],
        skins: vec![SkinDescription {
            name: "arm".into(),
            skeleton_root: Some(1),
            joints: vec![1, 2, 3],
            inverse_bind_matrices: None,
        }],
    };

    let raise = AnimationClipDescription {
        name: "raise".into(),
        samplers: vec![AnimationSampler::linear_vec3(
            vec![0.0, 1.0],
            vec![Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
        )],
        channels: vec![ChannelDescription {
            path: TargetPath::Translation,
            node: 1,
            sampler: 0,
        }],
    };

    (scene, vec![raise])
}

fn arm_engine(settings: EngineSettings) -> (Engine, Vec<NodeHandle>) {
    let (scene, clips) = arm_scene();
    let (engine, handles) = Engine::from_description(&scene, &clips, settings).unwrap();
    (engine, handles.nodes)
}

// ============================================================================
// Tick
// ============================================================================

#[test]
fn tick_runs_every_stage_in_order() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (mut engine, nodes) = arm_engine(EngineSettings::default());
    engine.player.play_by_name("raise").unwrap();

    let report = engine.tick(0.5).unwrap();
    assert_eq!(report.channels_applied, 1);
    assert_eq!(report.nodes_updated, 4);
    assert_eq!(report.palettes_updated, 1);
    assert_eq!(
        report.dimensions,
        Some(BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5)))
    );

    // Animation result is visible in world space within the same tick.
    let wrist: Vec3 = engine.scene.world_matrix(nodes[3]).unwrap().translation.into();
    assert!(vec3_approx(wrist, Vec3::new(0.0, 3.0, 0.0)), "got {wrist}");

    // ...and in the joint palette computed after it.
    let palette = engine.skinning.joint_matrices(nodes[0]).unwrap();
    assert_eq!(palette.len(), 3);
    assert!(palette[2].abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)), EPSILON));

    assert_eq!(engine.frame_count(), 1);
    assert!((engine.time() - 0.5).abs() < EPSILON);
}

#[test]
fn settings_disable_skins_and_bounds() {
    let (mut engine, nodes) = arm_engine(EngineSettings {
        compute_bounds: false,
        update_skins: false,
        ..Default::default()
    });

    let report = engine.tick(0.1).unwrap();
    assert_eq!(report.channels_applied, 0);
    assert_eq!(report.palettes_updated, 0);
    assert_eq!(report.dimensions, None);
    assert!(engine.skinning.palette(nodes[0]).is_none());
}

#[test]
fn failed_animation_aborts_tick() {
    let (mut engine, nodes) = arm_engine(EngineSettings::default());
    engine.tick(0.0).unwrap();
    engine.player.play(0).unwrap();

    engine.scene.remove_node(nodes[1]);
    assert!(matches!(
        engine.tick(0.1),
        Err(OsteonError::NodeNotFound { .. })
    ));
    assert_eq!(engine.frame_count(), 1);
}

#[test]
fn unknown_clip_index_is_rejected() {
    let (mut engine, _) = arm_engine(EngineSettings::default());
    assert_eq!(engine.player.play(4), Err(OsteonError::ClipNotFound(4)));
}

// ============================================================================
// IK
// ============================================================================

#[test]
fn solve_ik_poses_scene_chain() {
    let (mut engine, nodes) = arm_engine(EngineSettings::default());
    engine.tick(0.0).unwrap();

    let joints = [nodes[1], nodes[2], nodes[3]];
    let angle = 30f32.to_radians();
    let target = Vec3::new(angle.sin(), angle.cos(), 0.0) * 1.8;

    let outcome = engine.solve_ik(&joints, target).unwrap();
    assert!(matches!(outcome, IkOutcome::Converged { .. }), "{outcome:?}");

    engine.tick(0.0).unwrap();
    let wrist: Vec3 = engine.scene.world_matrix(nodes[3]).unwrap().translation.into();
    assert!(wrist.distance(target) < 0.01 + EPSILON, "got {wrist}");

    // Rotation only: link lengths are preserved.
    let elbow: Vec3 = engine.scene.world_matrix(nodes[2]).unwrap().translation.into();
    assert!((elbow.length() - 1.0).abs() < EPSILON);
    assert!((wrist.distance(elbow) - 1.0).abs() < EPSILON);
}

#[test]
fn solve_ik_with_scaled_joint_writes_exact_trs() {
    let (mut engine, nodes) = arm_engine(EngineSettings::default());
    let scale = Vec3::new(2.0, 1.0, 1.0);
    engine.scene.node_mut(nodes[2]).unwrap().transform.scale = scale;
    engine.tick(0.0).unwrap();

    let target = Vec3::new(1.5, 0.5, 0.0);
    let outcome = engine.solve_ik(&[nodes[1], nodes[2], nodes[3]], target).unwrap();
    assert!(outcome.is_converged(), "{outcome:?}");

    // The written TRS reproduces the solved chain: no shear was dropped.
    let elbow = &engine.scene.node(nodes[2]).unwrap().transform;
    assert!(elbow.scale.abs_diff_eq(scale, EPSILON));
    assert!(vec3_approx(elbow.translation, Vec3::Y));

    engine.tick(0.0).unwrap();
    let elbow_pos: Vec3 = engine.scene.world_matrix(nodes[2]).unwrap().translation.into();
    let wrist: Vec3 = engine.scene.world_matrix(nodes[3]).unwrap().translation.into();
    assert!(wrist.distance(target) < 0.01 + EPSILON, "got {wrist}");
    assert!((elbow_pos.length() - 1.0).abs() < EPSILON);
    assert!((wrist.distance(elbow_pos) - 1.0).abs() < EPSILON);
}

#[test]
fn extract_chain_relative_to_parent() {
    let (mut engine, nodes) = arm_engine(EngineSettings::default());
    engine.scene.node_mut(nodes[1]).unwrap().transform.translation = Vec3::new(0.0, 5.0, 0.0);

    let (parent_world, chain) = engine.extract_ik_chain(&[nodes[2], nodes[3]]).unwrap();
    let parent_pos: Vec3 = parent_world.translation.into();
    assert!(vec3_approx(parent_pos, Vec3::new(0.0, 5.0, 0.0)));
    assert_eq!(chain.len(), 2);
    assert!(vec3_approx(chain[0].translation.into(), Vec3::Y));
}

#[test]
fn ik_chain_must_be_contiguous() {
    let (mut engine, nodes) = arm_engine(EngineSettings::default());

    assert_eq!(
        engine.solve_ik(&[nodes[1], nodes[3]], Vec3::ONE),
        Err(OsteonError::BrokenIkChain { index: 1 })
    );
    assert_eq!(engine.solve_ik(&[], Vec3::ONE), Err(OsteonError::EmptyIkChain));
}
