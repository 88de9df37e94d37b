//! Translation-rotation-scale transforms and their interpolation.

/// Interpolation contract shared by transform components and animation values.
pub mod lerp;
/// The TRS value type.
pub mod trs;
