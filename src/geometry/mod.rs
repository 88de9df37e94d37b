//! Vertex data, texture atlas mapping and primitive baking.

/// Texture resolution and atlas UV mapping.
pub mod atlas;
/// Raw primitive buffers to quad-grouped vertices.
pub mod baker;
/// Baked vertices and texture-grouped batches.
pub mod vertex;
