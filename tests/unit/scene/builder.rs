use super::*;
use crate::foundation::core::Vec2;
use crate::geometry::atlas::NoAtlas;
use crate::geometry::baker::PrimitiveMode;
use std::f32::consts::FRAC_PI_2;

#[test]
fn build_preserves_structure_and_transforms() {
    let roots = SceneBuilder::new()
        .root(
            NodeBuilder::new(NodeId(0))
                .with_translation(Vec3::new(0.0, 1.0, 0.0))
                .child(NodeBuilder::new(NodeId(1)).with_scale(Vec3::splat(2.0))),
        )
        .build()
        .unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].transform.translation, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(roots[0].children[0].id, NodeId(1));
    assert_eq!(roots[0].children[0].transform.scale, Vec3::splat(2.0));
    assert!(roots[0].mesh.is_none());
}

#[test]
fn anonymous_nodes_get_ids_above_explicit_ones() {
    let roots = SceneBuilder::new()
        .root(NodeBuilder::anonymous().child(NodeBuilder::new(NodeId(7))))
        .root(NodeBuilder::anonymous())
        .build()
        .unwrap();
    assert_eq!(roots[0].id, NodeId(8));
    assert_eq!(roots[0].children[0].id, NodeId(7));
    assert_eq!(roots[1].id, NodeId(9));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = SceneBuilder::new()
        .root(NodeBuilder::new(NodeId(1)))
        .root(NodeBuilder::anonymous().child(NodeBuilder::new(NodeId(1))))
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[test]
fn euler_rotation_applies_x_then_y_then_z() {
    let node =
        NodeBuilder::new(NodeId(0)).with_euler_rotation(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
    let roots = SceneBuilder::new().root(node).build().unwrap();
    let expected = Quat::from_rotation_x(FRAC_PI_2) * Quat::from_rotation_z(FRAC_PI_2);
    assert!(roots[0].transform.rotation.abs_diff_eq(expected, 1e-6));
}

#[test]
fn axis_rotation_normalizes_the_axis() {
    let roots = SceneBuilder::new()
        .root(NodeBuilder::new(NodeId(0)).with_axis_rotation(FRAC_PI_2, Vec3::new(0.0, 0.0, 5.0)))
        .build()
        .unwrap();
    let r = roots[0].transform.rotation;
    assert!((r.length() - 1.0).abs() < 1e-6);
    assert!((r * Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));
}

#[test]
fn vertices_and_primitives_merge_by_texture() {
    let quad = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let prim = Primitive::new(PrimitiveMode::Quads, quad, vec![], "stone".into());
    let vertex = Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Y);
    let roots = SceneBuilder::new()
        .root(
            NodeBuilder::new(NodeId(0))
                .with_vertices("stone", [vertex; 4])
                .with_primitives(&[prim], &NoAtlas),
        )
        .build()
        .unwrap();
    let mesh = roots[0].mesh.as_ref().unwrap();
    assert_eq!(mesh.batches().len(), 1);
    assert_eq!(mesh.vertex_count(), 8);
}
