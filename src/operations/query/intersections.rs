use crate::math::intersect_2d::segments_intersect;
use crate::math::Point2;
use crate::topology::{WallGraph, WallId};

/// A point where two walls cross away from any shared vertex.
#[derive(Debug, Clone, Copy)]
pub struct WallCrossing {
    /// The crossing point.
    pub point: Point2,
    /// The two walls involved.
    pub walls: (WallId, WallId),
}

/// Finds every pairwise crossing between walls that do not already meet at
/// a shared vertex or coincident endpoints.
pub struct WallIntersections {
    shared_tolerance: f64,
}

impl WallIntersections {
    /// Creates a new `WallIntersections` query.
    #[must_use]
    pub fn new(shared_tolerance: f64) -> Self {
        Self { shared_tolerance }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Vec<WallCrossing> {
        let walls: Vec<_> = graph
            .walls()
            .filter_map(|(id, data)| graph.segment(id).ok().map(|seg| (id, data, seg)))
            .collect();

        let mut crossings = Vec::new();
        for (i, (id_a, data_a, (a0, a1))) in walls.iter().enumerate() {
            for (id_b, data_b, (b0, b1)) in &walls[i + 1..] {
                if data_a.shares_vertex(data_b) {
                    continue;
                }
                if let Some(point) = segments_intersect(a0, a1, b0, b1, self.shared_tolerance) {
                    crossings.push(WallCrossing {
                        point,
                        walls: (*id_a, *id_b),
                    });
                }
            }
        }
        crossings
    }
}
