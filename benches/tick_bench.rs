use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};
use osteon::{
    AnimationClipDescription, AnimationSampler, BoundingBox, ChannelDescription, Engine,
    EngineSettings, Mesh, NodeDescription, NodeId, SceneDescription, SkinDescription, TargetPath,
};
use std::hint::black_box;

const CHAINS: usize = 8;
const CHAIN_LENGTH: usize = 24;

/// One skinned mesh driven by `CHAINS` joint chains, each joint rotated by its own channel.
fn build_engine() -> Engine {
    let mut nodes = vec![NodeDescription {
        id: NodeId(0),
        name: "body".into(),
        mesh: Some(0),
        skin: Some(0),
        ..Default::default()
    }];
    let mut joints = Vec::new();
    let mut samplers = Vec::new();
    let mut channels = Vec::new();

    let times: Vec<f32> = (0..=30).map(|i| i as f32 / 30.0).collect();
    for chain in 0..CHAINS {
        for link in 0..CHAIN_LENGTH {
            let index = nodes.len();
            nodes.push(NodeDescription {
                id: NodeId(index as u32),
                parent: if link == 0 { None } else { Some(index - 1) },
                translation: if link == 0 {
                    Vec3::new(chain as f32, 0.0, 0.0)
                } else {
                    Vec3::Y * 0.25
                },
                ..Default::default()
            });
            joints.push(index);

            let phase = index as f32 * 0.1;
            samplers.push(AnimationSampler::linear_rotation(
                times.clone(),
                times
                    .iter()
                    .map(|t| Quat::from_rotation_z((t * std::f32::consts::TAU + phase).sin() * 0.2))
                    .collect(),
            ));
            channels.push(ChannelDescription {
                path: TargetPath::Rotation,
                node: index,
                sampler: samplers.len() - 1,
            });
        }
    }

    let scene = SceneDescription {
        nodes,
        meshes: vec![Mesh::new(
            "body",
            Some(BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0))),
        )],
        skins: vec![SkinDescription {
            name: "rig".into(),
            skeleton_root: Some(1),
            inverse_bind_matrices: Some(vec![Mat4::IDENTITY; joints.len()]),
            joints,
        }],
    };
    let clip = AnimationClipDescription {
        name: "sway".into(),
        samplers,
        channels,
    };

    let (mut engine, _) = Engine::from_description(&scene, &[clip], EngineSettings::default())
        .expect("benchmark scene is valid");
    engine.player.play(0).expect("clip exists");
    engine
}

fn tick_benchmark(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = build_engine();

    c.bench_function("tick_full", |b| {
        b.iter(|| {
            black_box(engine.tick(black_box(1.0 / 60.0)).expect("tick"));
        });
    });

    engine.settings.compute_bounds = false;
    engine.settings.update_skins = false;
    c.bench_function("tick_animation_and_transforms", |b| {
        b.iter(|| {
            black_box(engine.tick(black_box(1.0 / 60.0)).expect("tick"));
        });
    });
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
