//! scenebake turns hierarchical 3D assets into render-ready vertex batches and a minimal
//! animated node tree that can be re-posed every frame.
//!
//! # Pipeline overview
//!
//! 1. **Build**: [`SceneBuilder`] assembles a mutable tree, then freezes it into [`SceneNode`]s.
//!    Raw [`Primitive`] buffers are baked into quad-grouped [`Vertex`] batches on the way in.
//! 2. **Compact**: nodes that are neither animated nor above an animated node are folded into
//!    their nearest dynamic ancestor, pre-transformed and merged per texture.
//! 3. **Animate**: [`AnimatedModel`] resolves each remaining node's pose from its [`Channel`]s
//!    at a looping query time.
//! 4. **Draw**: [`AnimatedModel::render`] walks the tree in pre-order and hands every batch with
//!    its world [`Trs`] to a [`DrawSink`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO**: parsing asset files and submitting draw calls belong to the host.
//! - **Read-only models**: an [`AnimatedModel`] is immutable after construction and `Send + Sync`.
//! - **Recoverable errors**: bad primitives and channels are logged through `tracing` and skipped.
//!
//! # Example
//!
//! ```
//! use scenebake::{
//!     AnimatedModel, BakeSettings, Channel, InMemoryDrawSink, Keyframe, NodeBuilder, NodeId,
//!     SceneBuilder, Vec2, Vec3, Vertex,
//! };
//!
//! let quad = [Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y]
//!     .map(|p| Vertex::new(p, Vec2::ZERO, Vec3::Z));
//! let roots = SceneBuilder::new()
//!     .root(
//!         NodeBuilder::new(NodeId(0))
//!             .with_vertices("body", quad)
//!             .child(NodeBuilder::new(NodeId(1)).with_vertices("wheel", quad)),
//!     )
//!     .build()?;
//!
//! let spin = Channel::translation(
//!     NodeId(1),
//!     vec![Keyframe::new(0.0, Vec3::ZERO), Keyframe::new(2.0, Vec3::Y)],
//! );
//! let model = AnimatedModel::build(&roots, vec![spin], &BakeSettings::default())?;
//! assert_eq!(model.length(), 2.0);
//!
//! let mut sink = InMemoryDrawSink::new();
//! model.render(1.0, &mut sink);
//! assert_eq!(sink.calls().len(), 2);
//! # Ok::<(), scenebake::ModelError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod bake;
mod compact;
mod foundation;
mod geometry;
mod scene;

/// Translation-rotation-scale algebra and interpolation.
pub mod transform;

pub use animation::channel::{
    AnimationClip, Channel, ChannelKeyframes, ChannelProperty, ChannelSample, Keyframe,
    sample_keyframes,
};
pub use animation::model::AnimatedModel;
pub use animation::sink::{DrawCall, DrawSink, InMemoryDrawSink};
pub use bake::settings::BakeSettings;
pub use bake::{bake_clips, bake_static};
pub use compact::optimizer::{CompactedNode, CompactedScene, compact};
pub use foundation::core::{Mat3, Mat4, NodeId, Quat, Rect, TextureRef, Vec2, Vec3};
pub use foundation::error::{ModelError, ModelResult};
pub use geometry::atlas::{AtlasResolver, AtlasSprite, NoAtlas, TextureResolver, UvMapper};
pub use geometry::baker::{Primitive, PrimitiveMode, bake_mesh, bake_primitive};
pub use geometry::vertex::{Geometry, Mesh, Vertex};
pub use scene::builder::{NodeBuilder, SceneBuilder};
pub use scene::node::SceneNode;
pub use transform::lerp::Lerp;
pub use transform::trs::Trs;
