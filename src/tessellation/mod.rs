mod tessellate_room;

pub use tessellate_room::TessellateRoom;

use serde::{Deserialize, Serialize};

use crate::math::polygon_2d::signed_area;
use crate::math::Point2;

/// Triangle mesh of a room floor, in world units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorMesh {
    /// Vertex positions.
    pub vertices: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl FloorMesh {
    /// Total area covered by the triangles.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.indices
            .iter()
            .map(|tri| {
                let corners = tri.map(|i| self.vertices[i as usize]);
                signed_area(&corners).abs()
            })
            .sum()
    }
}
