use crate::foundation::core::{TextureRef, Vec2, Vec3};
use crate::transform::trs::Trs;

/// A single baked vertex: position, texture coordinate and normal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    /// Position in the owning node's local space.
    pub position: Vec3,
    /// Texture coordinate (atlas-mapped once baked against a present sprite).
    pub uv: Vec2,
    /// Face normal.
    pub normal: Vec3,
}

impl Vertex {
    /// Build a vertex from its components.
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    /// Re-express this vertex in the parent space of `t`.
    pub fn transformed(&self, t: &Trs) -> Self {
        Self {
            position: t.transform_point(self.position),
            uv: self.uv,
            normal: t.transform_normal(self.normal),
        }
    }
}

/// Vertices that share one texture, four per quad.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Geometry {
    /// Texture every vertex in this batch samples from.
    pub texture: TextureRef,
    /// Quad-grouped vertices.
    pub vertices: Vec<Vertex>,
}

impl Geometry {
    /// Build a batch from a texture and its vertices.
    pub fn new(texture: TextureRef, vertices: Vec<Vertex>) -> Self {
        Self { texture, vertices }
    }

    /// Number of complete quads in the batch.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Copy of this batch with every vertex moved into the parent space of `t`.
    pub fn transformed(&self, t: &Trs) -> Self {
        Self {
            texture: self.texture.clone(),
            vertices: self.vertices.iter().map(|v| v.transformed(t)).collect(),
        }
    }
}

/// Texture-grouped vertex batches.
///
/// Each texture appears at most once; pushing more vertices for a known texture extends its
/// batch. Batches keep the order in which their textures were first seen.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Mesh {
    batches: Vec<Geometry>,
}

impl Mesh {
    /// Empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh from arbitrary batches, merging any that share a texture.
    pub fn from_batches(batches: impl IntoIterator<Item = Geometry>) -> Self {
        let mut mesh = Self::new();
        for batch in batches {
            mesh.push_geometry(batch);
        }
        mesh
    }

    /// Append vertices to the batch for `texture`, creating it on first use.
    pub fn push_vertices(
        &mut self,
        texture: &TextureRef,
        vertices: impl IntoIterator<Item = Vertex>,
    ) {
        match self.batches.iter_mut().find(|b| &b.texture == texture) {
            Some(batch) => batch.vertices.extend(vertices),
            None => self
                .batches
                .push(Geometry::new(texture.clone(), vertices.into_iter().collect())),
        }
    }

    /// Merge a whole batch into this mesh.
    pub fn push_geometry(&mut self, geometry: Geometry) {
        match self
            .batches
            .iter_mut()
            .find(|b| b.texture == geometry.texture)
        {
            Some(batch) => batch.vertices.extend(geometry.vertices),
            None => self.batches.push(geometry),
        }
    }

    /// Merge every batch of `other` into this mesh.
    pub fn extend(&mut self, other: Mesh) {
        for batch in other.batches {
            self.push_geometry(batch);
        }
    }

    /// Borrow the batches.
    pub fn batches(&self) -> &[Geometry] {
        &self.batches
    }

    /// Consume the mesh into its batches.
    pub fn into_batches(self) -> Vec<Geometry> {
        self.batches
    }

    /// `true` when no batch holds any vertex.
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.vertices.is_empty())
    }

    /// Total vertex count across batches.
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/vertex.rs"]
mod tests;
