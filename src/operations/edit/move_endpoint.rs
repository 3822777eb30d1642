use tracing::trace;

use crate::error::Result;
use crate::math::{ensure_finite, Point2};
use crate::topology::{VertexId, WallEnd, WallGraph, WallId};

/// Moves one end of a wall.
///
/// The end is a shared vertex, so every wall meeting there follows.
pub struct MoveEndpoint {
    wall: WallId,
    end: WallEnd,
    to: Point2,
}

impl MoveEndpoint {
    /// Creates a new `MoveEndpoint` operation.
    #[must_use]
    pub fn new(wall: WallId, end: WallEnd, to: Point2) -> Self {
        Self { wall, end, to }
    }

    /// Executes the move, returning the moved vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not finite or the wall is missing.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<VertexId> {
        ensure_finite(&self.to)?;
        let vertex = graph.wall(self.wall)?.vertex(self.end);
        graph.vertex_mut(vertex)?.point = self.to;
        trace!(wall = ?self.wall, end = ?self.end, x = self.to.x, y = self.to.y, "moved endpoint");
        Ok(vertex)
    }
}
