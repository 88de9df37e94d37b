use crate::geometry::vertex::{Geometry, Vertex};
use crate::transform::trs::Trs;

/// Consumer of the draw calls produced by an [`AnimatedModel`](crate::AnimatedModel) traversal.
///
/// Ordering contract: calls arrive in render order. Model-level static batches come first, then
/// each dynamic node's batches in depth-first pre-order.
pub trait DrawSink {
    /// Draw `batch`, whose vertices are expressed in the local space of `world`.
    fn draw(&mut self, world: &Trs, batch: &Geometry);
}

impl<F> DrawSink for F
where
    F: FnMut(&Trs, &Geometry),
{
    fn draw(&mut self, world: &Trs, batch: &Geometry) {
        self(world, batch)
    }
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    /// Accumulated world transform of the batch.
    pub world: Trs,
    /// The submitted batch, still in local space.
    pub batch: Geometry,
}

impl DrawCall {
    /// Batch vertices moved into world space.
    pub fn world_vertices(&self) -> Vec<Vertex> {
        self.batch
            .vertices
            .iter()
            .map(|v| v.transformed(&self.world))
            .collect()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryDrawSink {
    calls: Vec<DrawCall>,
}

impl InMemoryDrawSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded calls.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drop recorded calls so the sink can be reused for the next frame.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Every recorded vertex in world space, in draw order.
    pub fn world_vertices(&self) -> Vec<Vertex> {
        self.calls.iter().flat_map(DrawCall::world_vertices).collect()
    }
}

impl DrawSink for InMemoryDrawSink {
    fn draw(&mut self, world: &Trs, batch: &Geometry) {
        self.calls.push(DrawCall {
            world: *world,
            batch: batch.clone(),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sink.rs"]
mod tests;
