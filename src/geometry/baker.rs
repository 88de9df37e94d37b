use crate::foundation::core::{TextureRef, Vec2, Vec3};
use crate::foundation::error::{ModelError, ModelResult};
use crate::foundation::math::normal_or_default;
use crate::geometry::atlas::{TextureResolver, UvMapper};
use crate::geometry::vertex::{Mesh, Vertex};

/// Topology of a primitive's vertex stream.
///
/// Mirrors the modes asset formats commonly declare; only [`PrimitiveMode::Quads`] and
/// [`PrimitiveMode::Triangles`] can be baked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PrimitiveMode {
    /// Isolated points.
    Points,
    /// Independent line segments.
    Lines,
    /// Closed polyline.
    LineLoop,
    /// Open polyline.
    LineStrip,
    /// Independent triangles, three vertices each.
    Triangles,
    /// Triangle strip.
    TriangleStrip,
    /// Triangle fan.
    TriangleFan,
    /// Independent quads, four vertices each.
    Quads,
}

impl PrimitiveMode {
    fn face_size(self) -> Option<usize> {
        match self {
            Self::Quads => Some(4),
            Self::Triangles => Some(3),
            _ => None,
        }
    }
}

/// Raw buffers of one drawable primitive as handed over by an asset parser.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Primitive {
    /// How the vertex stream is grouped into faces.
    pub mode: PrimitiveMode,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Texture coordinates; missing entries read as `(0, 0)`.
    #[serde(default)]
    pub uvs: Vec<Vec2>,
    /// Optional index buffer; without it buffers are consumed in order.
    #[serde(default)]
    pub indices: Option<Vec<u32>>,
    /// Texture the primitive samples from.
    pub texture: TextureRef,
}

impl Primitive {
    /// Non-indexed primitive.
    pub fn new(
        mode: PrimitiveMode,
        positions: Vec<Vec3>,
        uvs: Vec<Vec2>,
        texture: TextureRef,
    ) -> Self {
        Self {
            mode,
            positions,
            uvs,
            indices: None,
            texture,
        }
    }

    /// Attach an index buffer.
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    fn element_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), |idx| idx.len())
    }

    fn vertex_index(&self, element: usize) -> ModelResult<usize> {
        let index = match &self.indices {
            Some(indices) => indices[element] as usize,
            None => element,
        };
        if index >= self.positions.len() {
            return Err(ModelError::geometry(format!(
                "vertex index {index} out of range for {} positions",
                self.positions.len()
            )));
        }
        Ok(index)
    }
}

/// Bake one primitive into quad-grouped vertices.
///
/// Quads emit `a, b, c, d` with normal `normalize((c - a) x (d - b))`. Triangles emit
/// `a, b, c, c` with normal `normalize(-((c - a) x (b - a)))`, so counter-clockwise faces in
/// both modes point along the right-hand normal. Degenerate faces get `(0, 1, 0)`.
pub fn bake_primitive(
    primitive: &Primitive,
    uv_mapper: Option<&dyn UvMapper>,
) -> ModelResult<Vec<Vertex>> {
    let face_size = primitive.mode.face_size().ok_or_else(|| {
        ModelError::geometry(format!(
            "unsupported primitive mode {:?}",
            primitive.mode
        ))
    })?;
    if primitive.positions.is_empty() {
        return Err(ModelError::geometry("primitive has no positions"));
    }

    let faces = primitive.element_count() / face_size;
    let mut out = Vec::with_capacity(faces * 4);
    let mut corners = [0usize; 4];

    for face in 0..faces {
        for (k, slot) in corners.iter_mut().take(face_size).enumerate() {
            *slot = primitive.vertex_index(face * face_size + k)?;
        }
        if face_size == 3 {
            corners[3] = corners[2];
        }

        let [a, b, c, d] = corners.map(|i| primitive.positions[i]);
        let normal = if face_size == 4 {
            normal_or_default((c - a).cross(d - b))
        } else {
            normal_or_default(-(c - a).cross(b - a))
        };

        for i in corners {
            let uv = primitive.uvs.get(i).copied().unwrap_or(Vec2::ZERO);
            let uv = uv_mapper.map_or(uv, |m| m.map_uv(uv));
            out.push(Vertex::new(primitive.positions[i], uv, normal));
        }
    }
    Ok(out)
}

/// Bake a mesh's primitives into texture-grouped batches.
///
/// Textures present in the atlas get mapped UVs and are grouped under their atlas page; absent
/// textures keep raw UVs and their own reference. Primitives that fail to bake are skipped.
pub fn bake_mesh(primitives: &[Primitive], resolver: &dyn TextureResolver) -> Mesh {
    let mut mesh = Mesh::new();
    for (index, primitive) in primitives.iter().enumerate() {
        let sprite = resolver.resolve(&primitive.texture);
        if sprite.is_none() {
            tracing::debug!(
                texture = %primitive.texture,
                "texture not present in atlas, keeping raw UVs"
            );
        }

        let mapper = sprite.as_ref().map(|s| s as &dyn UvMapper);
        match bake_primitive(primitive, mapper) {
            Ok(vertices) => {
                let texture = sprite.as_ref().map_or(&primitive.texture, |s| &s.atlas);
                mesh.push_vertices(texture, vertices);
            }
            Err(err) => {
                tracing::warn!(
                    primitive = index,
                    texture = %primitive.texture,
                    error = %err,
                    "skipping primitive"
                );
            }
        }
    }
    mesh
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/baker.rs"]
mod tests;
