use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::math::{points_coincide, Point2};
use crate::topology::{WallGraph, WallId};

/// Finds walls with an endpoint within tolerance of a point.
///
/// Matches by coordinates, so it also sees endpoints that sit on top of
/// each other without sharing a vertex.
pub struct FindConnected {
    point: Point2,
    tolerance: f64,
}

impl FindConnected {
    /// Creates a new `FindConnected` query.
    #[must_use]
    pub fn new(point: Point2, tolerance: f64) -> Self {
        Self { point, tolerance }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Vec<WallId> {
        graph
            .wall_ids()
            .into_iter()
            .filter(|&id| {
                graph.segment(id).is_ok_and(|(s, e)| {
                    points_coincide(&s, &self.point, self.tolerance)
                        || points_coincide(&e, &self.point, self.tolerance)
                })
            })
            .collect()
    }
}

/// Breadth-first collection of every wall reachable through shared vertices.
pub struct TransitivelyConnected {
    wall: WallId,
}

impl TransitivelyConnected {
    /// Creates a new `TransitivelyConnected` query.
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the query. The starting wall is the first element.
    ///
    /// # Errors
    ///
    /// Returns an error if the starting wall is not in the graph.
    pub fn execute(&self, graph: &WallGraph) -> Result<Vec<WallId>> {
        graph.wall(self.wall)?;

        let mut seen: HashSet<WallId> = HashSet::from([self.wall]);
        let mut order = vec![self.wall];
        let mut queue = VecDeque::from([self.wall]);

        while let Some(current) = queue.pop_front() {
            for next in graph.neighbours(current)? {
                if seen.insert(next) {
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }
        Ok(order)
    }
}
