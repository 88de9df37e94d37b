use std::collections::{BTreeSet, HashSet};

use crate::foundation::core::{Mat4, NodeId, Quat};
use crate::geometry::vertex::{Geometry, Mesh, Vertex};
use crate::scene::node::SceneNode;
use crate::transform::trs::Trs;

/// A node that stays individually transformable after compaction.
///
/// Exists for a source node iff the node is animated or has an animated descendant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompactedNode {
    /// Source node id; animation channels target it.
    pub id: NodeId,
    /// Bind-pose transform relative to the parent.
    pub base: Trs,
    /// Own geometry plus folded static descendants, in this node's local space, one batch
    /// per texture.
    pub static_batches: Vec<Geometry>,
    /// Dynamic children.
    pub children: Vec<CompactedNode>,
}

impl CompactedNode {
    /// Number of compacted nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CompactedNode::node_count)
            .sum::<usize>()
    }

    /// First compacted node in this subtree with the given id.
    pub fn find(&self, id: NodeId) -> Option<&CompactedNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Result of compacting a forest of scene roots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompactedScene {
    /// Dynamic roots.
    pub roots: Vec<CompactedNode>,
    /// Geometry of fully static root subtrees, in model space.
    pub static_batches: Vec<Geometry>,
}

impl CompactedScene {
    /// Total number of compacted nodes.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(CompactedNode::node_count).sum()
    }

    /// Total number of vertices across every static batch.
    pub fn vertex_count(&self) -> usize {
        fn node_vertices(n: &CompactedNode) -> usize {
            n.static_batches
                .iter()
                .map(|b| b.vertices.len())
                .sum::<usize>()
                + n.children.iter().map(node_vertices).sum::<usize>()
        }
        self.static_batches
            .iter()
            .map(|b| b.vertices.len())
            .sum::<usize>()
            + self.roots.iter().map(node_vertices).sum::<usize>()
    }
}

/// Compact `roots`, keeping only nodes in or above the `animated` set as separate units.
///
/// Static subtrees are folded into the nearest dynamic ancestor: each static node's vertices
/// are moved through the matrix product of its own transform and those of its static ancestors
/// up to (excluding) that dynamic ancestor, then merged per texture. Static root subtrees fold into
/// [`CompactedScene::static_batches`]. Nodes in `excluded` are dropped with their subtrees.
pub fn compact(
    roots: &[SceneNode],
    animated: &HashSet<NodeId>,
    excluded: &BTreeSet<NodeId>,
) -> CompactedScene {
    let mut dynamic = HashSet::new();
    for root in roots {
        mark_dynamic(root, animated, excluded, &mut dynamic);
    }

    let pass = Pass {
        dynamic: &dynamic,
        excluded,
    };
    let mut scene_mesh = Mesh::new();
    let mut compacted = Vec::new();
    for root in roots.iter().filter(|r| !excluded.contains(&r.id)) {
        if dynamic.contains(&root.id) {
            compacted.push(pass.compact_dynamic(root));
        } else {
            pass.fold_static(root, Level::of(&root.transform), &mut scene_mesh);
        }
    }

    let scene = CompactedScene {
        roots: compacted,
        static_batches: non_empty(scene_mesh),
    };
    tracing::debug!(
        dynamic_nodes = scene.node_count(),
        static_batches = scene.static_batches.len(),
        vertices = scene.vertex_count(),
        "compacted scene"
    );
    scene
}

/// Records every dynamic node of the subtree and reports whether `node` is one.
fn mark_dynamic(
    node: &SceneNode,
    animated: &HashSet<NodeId>,
    excluded: &BTreeSet<NodeId>,
    out: &mut HashSet<NodeId>,
) -> bool {
    if excluded.contains(&node.id) {
        return false;
    }
    let mut is_dynamic = animated.contains(&node.id);
    for child in &node.children {
        is_dynamic |= mark_dynamic(child, animated, excluded, out);
    }
    if is_dynamic {
        out.insert(node.id);
    }
    is_dynamic
}

struct Pass<'a> {
    dynamic: &'a HashSet<NodeId>,
    excluded: &'a BTreeSet<NodeId>,
}

impl Pass<'_> {
    fn children<'n>(&self, node: &'n SceneNode) -> impl Iterator<Item = &'n SceneNode> {
        node.children
            .iter()
            .filter(|c| !self.excluded.contains(&c.id))
    }

    fn compact_dynamic(&self, node: &SceneNode) -> CompactedNode {
        // Own geometry stays in local space; the node's pose is applied at render time.
        let mut mesh = node.mesh.clone().unwrap_or_default();
        let mut children = Vec::new();
        for child in self.children(node) {
            if self.dynamic.contains(&child.id) {
                children.push(self.compact_dynamic(child));
            } else {
                self.fold_static(child, Level::of(&child.transform), &mut mesh);
            }
        }
        CompactedNode {
            id: node.id,
            base: node.transform,
            static_batches: non_empty(mesh),
            children,
        }
    }

    fn fold_static(&self, node: &SceneNode, to_target: Level, out: &mut Mesh) {
        if let Some(mesh) = &node.mesh {
            for batch in mesh.batches() {
                out.push_vertices(
                    &batch.texture,
                    batch.vertices.iter().map(|v| Vertex {
                        position: to_target.matrix.transform_point3(v.position),
                        uv: v.uv,
                        normal: to_target.rotation * v.normal,
                    }),
                );
            }
        }
        for child in self.children(node) {
            self.fold_static(child, to_target.then(&child.transform), out);
        }
    }
}

/// Map from a static node's local space into the space its batches are collected in.
///
/// Positions go through the full matrix product, which keeps the shear a non-uniformly scaled
/// parent puts on a rotated child. Normals only follow the product of rotations.
#[derive(Clone, Copy)]
struct Level {
    matrix: Mat4,
    rotation: Quat,
}

impl Level {
    fn of(t: &Trs) -> Self {
        Self {
            matrix: t.to_matrix(),
            rotation: t.unit_rotation(),
        }
    }

    fn then(&self, child: &Trs) -> Self {
        Self {
            matrix: self.matrix * child.to_matrix(),
            rotation: self.rotation * child.unit_rotation(),
        }
    }
}

fn non_empty(mesh: Mesh) -> Vec<Geometry> {
    mesh.into_batches()
        .into_iter()
        .filter(|b| !b.vertices.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compact/optimizer.rs"]
mod tests;
