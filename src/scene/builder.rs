use std::collections::BTreeSet;

use crate::foundation::core::{NodeId, Quat, TextureRef, Vec3};
use crate::foundation::error::{ModelError, ModelResult};
use crate::geometry::atlas::TextureResolver;
use crate::geometry::baker::{Primitive, bake_mesh};
use crate::geometry::vertex::{Mesh, Vertex};
use crate::scene::node::SceneNode;
use crate::transform::trs::Trs;

/// Mutable description of one node, used only while assembling an asset.
#[derive(Clone, Debug, Default)]
pub struct NodeBuilder {
    id: Option<NodeId>,
    transform: Trs,
    mesh: Mesh,
    children: Vec<NodeBuilder>,
}

impl NodeBuilder {
    /// Node with an explicit id, so channels can target it.
    pub fn new(id: NodeId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Node without an id; one is assigned when the scene is built.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replace the whole local transform.
    pub fn with_transform(mut self, transform: Trs) -> Self {
        self.transform = transform;
        self
    }

    /// Set the translation.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    /// Set the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Append Euler rotations in radians, about X first, then Y, then Z.
    pub fn with_euler_rotation(mut self, angles: Vec3) -> Self {
        self.transform.rotation = self.transform.rotation
            * Quat::from_rotation_x(angles.x)
            * Quat::from_rotation_y(angles.y)
            * Quat::from_rotation_z(angles.z);
        self
    }

    /// Set the rotation to `angle` radians about `axis`.
    pub fn with_axis_rotation(mut self, angle: f32, axis: Vec3) -> Self {
        self.transform.rotation = Quat::from_axis_angle(axis.normalize_or_zero(), angle);
        self
    }

    /// Set the per-axis scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Add already-baked vertices for `texture`.
    pub fn with_vertices(
        mut self,
        texture: impl Into<TextureRef>,
        vertices: impl IntoIterator<Item = Vertex>,
    ) -> Self {
        self.mesh.push_vertices(&texture.into(), vertices);
        self
    }

    /// Merge a baked mesh into this node's geometry.
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh.extend(mesh);
        self
    }

    /// Bake raw primitives against `resolver` and merge the result.
    pub fn with_primitives(self, primitives: &[Primitive], resolver: &dyn TextureResolver) -> Self {
        self.with_mesh(bake_mesh(primitives, resolver))
    }

    /// Append a child node.
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    fn collect_explicit_ids(&self, seen: &mut BTreeSet<NodeId>) -> ModelResult<()> {
        if let Some(id) = self.id
            && !seen.insert(id)
        {
            return Err(ModelError::validation(format!("duplicate node id {id}")));
        }
        self.children
            .iter()
            .try_for_each(|c| c.collect_explicit_ids(seen))
    }

    fn freeze(self, next_free: &mut u32) -> ModelResult<SceneNode> {
        let id = match self.id {
            Some(id) => id,
            None => {
                let id = NodeId(*next_free);
                *next_free = next_free
                    .checked_add(1)
                    .ok_or_else(|| ModelError::validation("node id space exhausted"))?;
                id
            }
        };
        let children = self
            .children
            .into_iter()
            .map(|c| c.freeze(next_free))
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(SceneNode {
            id,
            transform: self.transform,
            mesh: (!self.mesh.is_empty()).then_some(self.mesh),
            children,
        })
    }
}

/// Collects root nodes and converts them once into an immutable scene tree.
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    roots: Vec<NodeBuilder>,
}

impl SceneBuilder {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root node.
    pub fn root(mut self, node: NodeBuilder) -> Self {
        self.roots.push(node);
        self
    }

    /// Freeze the scene.
    ///
    /// Anonymous nodes get ids counting up from one past the largest explicit id, in pre-order.
    /// Duplicate explicit ids are rejected.
    pub fn build(self) -> ModelResult<Vec<SceneNode>> {
        let mut explicit = BTreeSet::new();
        for root in &self.roots {
            root.collect_explicit_ids(&mut explicit)?;
        }
        let mut next_free = match explicit.last() {
            Some(max) => max
                .0
                .checked_add(1)
                .ok_or_else(|| ModelError::validation("node id space exhausted"))?,
            None => 0,
        };
        self.roots
            .into_iter()
            .map(|r| r.freeze(&mut next_free))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
