//! Immutable scene graph and the builder that assembles it.

/// Two-phase construction of scene trees.
pub mod builder;
/// Immutable scene nodes.
pub mod node;
