use std::collections::HashMap;

use kurbo::{Affine, Point, Rect};

use crate::foundation::core::{TextureRef, Vec2};

/// Maps a normalized `0..1` texture coordinate into its final texture space.
pub trait UvMapper {
    /// Map one coordinate.
    fn map_uv(&self, uv: Vec2) -> Vec2;
}

impl<F> UvMapper for F
where
    F: Fn(Vec2) -> Vec2,
{
    fn map_uv(&self, uv: Vec2) -> Vec2 {
        self(uv)
    }
}

/// Where a texture ended up after atlas packing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AtlasSprite {
    /// Atlas page holding the sprite. Baked batches are keyed by this texture.
    pub atlas: TextureRef,
    /// Normalized region of the page covered by the sprite.
    pub region: Rect,
}

impl AtlasSprite {
    /// Build a sprite from its page and normalized region.
    pub fn new(atlas: TextureRef, region: Rect) -> Self {
        Self { atlas, region }
    }

    /// Affine map taking the unit square onto [`AtlasSprite::region`].
    pub fn to_affine(&self) -> Affine {
        Affine::map_unit_square(self.region)
    }
}

impl UvMapper for AtlasSprite {
    fn map_uv(&self, uv: Vec2) -> Vec2 {
        let p = self.to_affine() * Point::new(f64::from(uv.x), f64::from(uv.y));
        Vec2::new(p.x as f32, p.y as f32)
    }
}

/// Host-side lookup from texture references to packed atlas sprites.
///
/// `None` means the texture is not present; baking still succeeds with untouched UVs and the
/// caller is expected to substitute a placeholder texture.
pub trait TextureResolver: Send + Sync {
    /// Resolve `texture` to its atlas sprite, if present.
    fn resolve(&self, texture: &TextureRef) -> Option<AtlasSprite>;
}

/// Resolver for hosts without an atlas: every texture is reported absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAtlas;

impl TextureResolver for NoAtlas {
    fn resolve(&self, _texture: &TextureRef) -> Option<AtlasSprite> {
        None
    }
}

/// Map-backed resolver.
#[derive(Clone, Debug, Default)]
pub struct AtlasResolver {
    sprites: HashMap<TextureRef, AtlasSprite>,
}

impl AtlasResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sprite for `texture`, replacing any previous entry.
    pub fn insert(&mut self, texture: TextureRef, sprite: AtlasSprite) -> &mut Self {
        self.sprites.insert(texture, sprite);
        self
    }

    /// Number of registered textures.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl TextureResolver for AtlasResolver {
    fn resolve(&self, texture: &TextureRef) -> Option<AtlasSprite> {
        self.sprites.get(texture).cloned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/atlas.rs"]
mod tests;
