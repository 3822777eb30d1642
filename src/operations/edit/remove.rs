use tracing::debug;

use crate::error::Result;
use crate::topology::{WallData, WallGraph, WallId};

/// Removes a wall and any vertex left without walls.
pub struct RemoveWall {
    wall: WallId,
}

impl RemoveWall {
    /// Creates a new `RemoveWall` operation.
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the removal, returning the removed wall's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the graph.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<WallData> {
        let data = graph.remove_wall(self.wall)?;
        for vertex in [data.start, data.end] {
            if graph.walls_at(vertex).is_empty() {
                graph.remove_vertex(vertex);
            }
        }
        debug!(wall = ?self.wall, "removed wall");
        Ok(data)
    }
}
