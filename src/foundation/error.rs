/// Convenience result type used across scenebake.
pub type ModelResult<T> = Result<T, ModelError>;

/// Top-level error taxonomy used by baking and animation APIs.
///
/// Every variant is recoverable: aggregate operations log and skip the offending item
/// instead of failing the whole asset.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// Invalid user-provided scene, settings, or builder data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed animation channels or keyframes.
    #[error("animation error: {0}")]
    Animation(String),

    /// Primitive buffers that cannot be turned into vertices.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Failures while scheduling or running a bake.
    #[error("bake error: {0}")]
    Bake(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    /// Build a [`ModelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ModelError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ModelError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`ModelError::Bake`] value.
    pub fn bake(msg: impl Into<String>) -> Self {
        Self::Bake(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
