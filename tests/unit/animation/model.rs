use super::*;
use crate::animation::channel::Keyframe;
use crate::animation::sink::InMemoryDrawSink;
use crate::foundation::core::Vec2;
use crate::foundation::error::ModelError;
use crate::geometry::vertex::Vertex;
use crate::scene::builder::{NodeBuilder, SceneBuilder};
use std::f32::consts::FRAC_PI_2;

fn quad() -> Vec<Vertex> {
    [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y]
        .into_iter()
        .map(|p| Vertex::new(p, Vec2::ZERO, Vec3::Z))
        .collect()
}

fn slide(target: u32) -> Channel {
    Channel::translation(
        NodeId(target),
        vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(1.0, Vec3::new(10.0, 0.0, 0.0)),
        ],
    )
}

fn constant_translation(target: u32, v: Vec3) -> Channel {
    Channel::translation(NodeId(target), vec![Keyframe::new(0.0, v)])
}

fn constant_rotation(target: u32, q: Quat) -> Channel {
    Channel::rotation(NodeId(target), vec![Keyframe::new(0.0, q)])
}

fn arm() -> Vec<SceneNode> {
    SceneBuilder::new()
        .root(
            NodeBuilder::new(NodeId(0))
                .with_scale(Vec3::splat(2.0))
                .with_vertices("body", quad())
                .child(
                    NodeBuilder::new(NodeId(1))
                        .with_translation(Vec3::new(0.0, 1.0, 0.0))
                        .with_vertices("arm", quad())
                        .child(NodeBuilder::new(NodeId(2)).with_vertices("hand", quad())),
                ),
        )
        .root(NodeBuilder::new(NodeId(10)).with_vertices("ground", quad()))
        .build()
        .unwrap()
}

fn build(channels: Vec<Channel>) -> AnimatedModel {
    AnimatedModel::build(&arm(), channels, &BakeSettings::default()).unwrap()
}

#[test]
fn keyframe_boundaries_follow_the_wrap_policy() {
    let model = build(vec![slide(1)]);
    assert_eq!(model.length(), 1.0);
    assert_eq!(model.pose_of(NodeId(1), 0.0).unwrap().translation, Vec3::ZERO);
    assert_eq!(
        model.pose_of(NodeId(1), 0.5).unwrap().translation,
        Vec3::new(5.0, 0.0, 0.0)
    );
    assert_eq!(model.pose_of(NodeId(1), 1.0).unwrap().translation, Vec3::ZERO);
}

#[test]
fn poses_repeat_every_loop() {
    let model = build(vec![
        slide(1),
        constant_rotation(2, Quat::from_rotation_z(0.3)),
    ]);
    for id in [NodeId(0), NodeId(1), NodeId(2)] {
        for t in [0.1, 0.35, 0.8] {
            let base = model.pose_of(id, t).unwrap();
            for k in [-3.0, -1.0, 1.0, 2.0, 7.0] {
                let shifted = model.pose_of(id, t + k * f64::from(model.length())).unwrap();
                assert!(shifted.translation.abs_diff_eq(base.translation, 1e-4));
                assert!(shifted.rotation.abs_diff_eq(base.rotation, 1e-5));
                assert!(shifted.scale.abs_diff_eq(base.scale, 1e-5));
            }
        }
    }
}

#[test]
fn local_time_handles_negative_and_non_finite_times() {
    let model = build(vec![slide(1)]);
    assert!((model.local_time(-0.25) - 0.75).abs() < 1e-6);
    assert_eq!(model.local_time(f64::NAN), 0.0);
    assert_eq!(model.local_time(f64::INFINITY), 0.0);
    assert!(model.local_time(1.0 - 1e-12) < model.length());
}

#[test]
fn translation_channels_add_up() {
    let model = build(vec![
        constant_translation(1, Vec3::X),
        constant_translation(1, Vec3::Y),
    ]);
    let pose = model.pose_of(NodeId(1), 0.4).unwrap();
    assert_eq!(pose.translation, Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn rotation_channels_multiply_in_channel_order() {
    let qy = Quat::from_rotation_y(FRAC_PI_2);
    let qx = Quat::from_rotation_x(FRAC_PI_2);
    let model = build(vec![constant_rotation(1, qy), constant_rotation(1, qx)]);
    let pose = model.pose_of(NodeId(1), 0.0).unwrap();
    assert!(pose.rotation.abs_diff_eq(qy * qx, 1e-5));
}

#[test]
fn unanimated_properties_keep_the_base_value() {
    let model = build(vec![slide(0)]);
    let pose = model.pose_of(NodeId(0), 0.5).unwrap();
    assert_eq!(pose.scale, Vec3::splat(2.0));
    assert_eq!(pose.rotation, Quat::IDENTITY);

    // Node 1 has no channel and no animated descendant, so it was folded into node 0.
    assert!(model.pose_of(NodeId(1), 0.5).is_none());
}

#[test]
fn nodes_without_channels_return_their_base() {
    let model = build(vec![slide(2)]);
    let node1 = model.roots()[0].find(NodeId(1)).unwrap();
    assert_eq!(model.pose(node1, 0.3), node1.base);
    assert_eq!(node1.base.translation, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn invalid_and_dangling_channels_are_dropped() {
    let unsorted = Channel::translation(
        NodeId(1),
        vec![Keyframe::new(1.0, Vec3::ZERO), Keyframe::new(0.0, Vec3::X)],
    );
    let settings = BakeSettings::default().exclude(NodeId(2));
    let model = AnimatedModel::build(
        &arm(),
        vec![
            slide(99),
            unsorted,
            slide(2),
            Channel::scale(NodeId(1), Vec::new()),
            slide(1),
        ],
        &settings,
    )
    .unwrap();

    assert_eq!(model.channels().len(), 1);
    assert_eq!(model.channels()[0].target, NodeId(1));
    assert!(model.pose_of(NodeId(2), 0.0).is_none());
}

#[test]
fn length_falls_back_to_the_default() {
    let model = build(Vec::new());
    assert_eq!(model.length(), 1.0);
    assert!(model.roots().is_empty());

    let settings = BakeSettings {
        default_length: 2.5,
        ..BakeSettings::default()
    };
    let model = AnimatedModel::build(
        &arm(),
        vec![constant_translation(1, Vec3::X)],
        &settings,
    )
    .unwrap();
    assert_eq!(model.length(), 2.5);
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = BakeSettings {
        default_length: 0.0,
        ..BakeSettings::default()
    };
    let err = AnimatedModel::build(&arm(), Vec::new(), &settings).unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[test]
fn render_emits_static_roots_then_dynamic_nodes_in_pre_order() {
    let model = build(vec![slide(1)]);
    let placement = Trs::from_translation(Vec3::new(0.0, 0.0, -5.0));
    let mut sink = InMemoryDrawSink::new();
    model.render_at(placement, 0.5, &mut sink);

    let textures: Vec<&str> = sink
        .calls()
        .iter()
        .map(|c| c.batch.texture.as_str())
        .collect();
    // Root 10 is static; node 2 is folded into node 1.
    assert_eq!(textures, ["ground", "body", "arm", "hand"]);

    let calls = sink.calls();
    assert_eq!(calls[0].world, placement);
    let expected_node1 = placement
        .compose(&Trs::from_scale(Vec3::splat(2.0)))
        .compose(&Trs::from_translation(Vec3::new(5.0, 0.0, 0.0)));
    assert!(calls[2].world.translation.abs_diff_eq(expected_node1.translation, 1e-5));
    assert_eq!(calls[2].world, calls[3].world);
}

#[test]
fn world_poses_list_dynamic_nodes_in_render_order() {
    let model = build(vec![slide(2)]);
    let poses = model.world_poses(0.5);
    let ids: Vec<NodeId> = poses.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, [NodeId(0), NodeId(1), NodeId(2)]);
    // (5,0,0) in node 1's space, under a parent scale of 2 and node 1's offset.
    assert!(
        poses[2]
            .1
            .translation
            .abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5)
    );

    let mut count = 0;
    model.render(0.5, &mut |_: &Trs, b: &Geometry| count += b.vertices.len());
    assert_eq!(count, 16);
}

#[test]
fn models_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AnimatedModel>();

    let model = std::sync::Arc::new(build(vec![slide(1)]));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let model = model.clone();
            std::thread::spawn(move || model.pose_of(NodeId(1), f64::from(i) * 0.25))
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let pose = h.join().unwrap().unwrap();
        let expected = Vec3::new(2.5 * i as f32, 0.0, 0.0);
        assert!(pose.translation.abs_diff_eq(expected, 1e-5));
    }
}
