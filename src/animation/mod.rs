//! Keyframe channels, pose resolution and render traversal.

/// Channels, keyframes and clips.
pub mod channel;
/// The animated model built from a compacted scene.
pub mod model;
/// Draw-call consumers.
pub mod sink;
