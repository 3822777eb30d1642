use tracing::debug;

use crate::error::Result;
use crate::math::{points_coincide, Point2};
use crate::topology::{WallEnd, WallGraph, WallId};

/// Absorbs a new segment into an existing wall it extends along the same axis.
///
/// Succeeds when one end of the new segment sits on the existing wall's
/// `connection` end, the two are collinear, and the new segment continues
/// outward rather than doubling back. The existing wall's connecting end is
/// then moved to the new segment's far end; the new segment is never added.
///
/// A connecting vertex that other walls also meet is a real junction and is
/// left alone.
pub struct MergeCollinear {
    existing: WallId,
    start: Point2,
    end: Point2,
    connection: WallEnd,
    vertex_tolerance: f64,
    collinear_tolerance: f64,
}

impl MergeCollinear {
    /// Creates a new `MergeCollinear` operation.
    #[must_use]
    pub fn new(existing: WallId, start: Point2, end: Point2, connection: WallEnd) -> Self {
        Self {
            existing,
            start,
            end,
            connection,
            vertex_tolerance: 1.0,
            collinear_tolerance: 1e-3,
        }
    }

    /// Sets the endpoint and angle tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, vertex_tolerance: f64, collinear_tolerance: f64) -> Self {
        self.vertex_tolerance = vertex_tolerance;
        self.collinear_tolerance = collinear_tolerance;
        self
    }

    /// Executes the merge. Returns whether the existing wall absorbed the
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing wall is not in the graph.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<bool> {
        let data = graph.wall(self.existing)?.clone();
        let joint = data.vertex(self.connection);
        let anchor = graph.point(data.vertex(self.connection.opposite()))?;
        let joint_point = graph.point(joint)?;

        let far = if points_coincide(&self.start, &joint_point, self.vertex_tolerance) {
            self.end
        } else if points_coincide(&self.end, &joint_point, self.vertex_tolerance) {
            self.start
        } else {
            return Ok(false);
        };

        if graph.walls_at(joint).len() != 1 {
            return Ok(false);
        }

        let existing_dir = joint_point - anchor;
        let new_dir = far - joint_point;
        let (le, ln) = (existing_dir.norm(), new_dir.norm());
        if le < f64::EPSILON || ln < f64::EPSILON {
            return Ok(false);
        }
        let existing_dir = existing_dir / le;
        let new_dir = new_dir / ln;

        let collinear = existing_dir.perp(&new_dir).abs() < self.collinear_tolerance;
        let same_way = existing_dir.dot(&new_dir) > 0.0;
        if !collinear || !same_way {
            return Ok(false);
        }

        match graph.vertex_near(&far, self.vertex_tolerance) {
            Some(target) if target != joint => {
                let wall = graph.wall_mut(self.existing)?;
                match self.connection {
                    WallEnd::Start => wall.start = target,
                    WallEnd::End => wall.end = target,
                }
                graph.remove_vertex(joint);
            }
            _ => graph.vertex_mut(joint)?.point = far,
        }

        debug!(wall = ?self.existing, x = far.x, y = far.y, "extended collinear wall");
        Ok(true)
    }
}
