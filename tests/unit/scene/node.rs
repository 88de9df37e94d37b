use super::*;
use crate::foundation::core::{TextureRef, Vec2, Vec3};
use crate::geometry::vertex::Vertex;

fn tree() -> SceneNode {
    let mut leaf = SceneNode::new(NodeId(3));
    leaf.mesh = Some(Mesh::from_batches([crate::geometry::vertex::Geometry::new(
        TextureRef::new("t"),
        vec![Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Y); 4],
    )]));
    let mut mid = SceneNode::new(NodeId(2));
    mid.children.push(leaf);
    let mut root = SceneNode::new(NodeId(1));
    root.children.push(mid);
    root.children.push(SceneNode::new(NodeId(4)));
    root
}

#[test]
fn walk_is_pre_order_with_depth() {
    let mut seen = Vec::new();
    tree().walk(&mut |n, depth| seen.push((n.id.0, depth)));
    assert_eq!(seen, vec![(1, 0), (2, 1), (3, 2), (4, 1)]);
}

#[test]
fn find_and_count_cover_the_subtree() {
    let root = tree();
    assert_eq!(root.node_count(), 4);
    assert!(root.find(NodeId(3)).is_some_and(SceneNode::has_geometry));
    assert!(!root.find(NodeId(4)).unwrap().has_geometry());
    assert!(root.find(NodeId(99)).is_none());
}

#[test]
fn parser_shaped_json_deserializes_with_defaults() {
    let json = r#"{
        "id": 1,
        "transform": { "rotation": [0.0, 0.0, 0.0, 1.0], "scale": [2.0, 2.0, 2.0] },
        "children": [
            {
                "id": 2,
                "mesh": [
                    {
                        "texture": "stone",
                        "vertices": [
                            { "position": [0.0, 0.0, 0.0], "uv": [0.0, 0.0], "normal": [0.0, 1.0, 0.0] }
                        ]
                    }
                ]
            }
        ]
    }"#;
    let root: SceneNode = serde_json::from_str(json).unwrap();
    assert_eq!(root.transform.scale, Vec3::splat(2.0));
    assert_eq!(root.transform.translation, Vec3::ZERO);
    assert!(root.mesh.is_none());
    let child = &root.children[0];
    assert_eq!(child.id, NodeId(2));
    assert_eq!(child.transform, Trs::IDENTITY);
    assert_eq!(child.mesh.as_ref().unwrap().vertex_count(), 1);
}
