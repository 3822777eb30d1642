use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::math::distance_2d::distance;
use crate::math::{ensure_finite, Point2};
use crate::params::PlanParams;
use crate::topology::{WallData, WallGraph, WallId};

use super::merge::MergeCollinear;
use super::split::SplitCrossings;

/// Adds a wall to the graph.
///
/// Endpoints within `vertex_tolerance` of an existing vertex attach to it.
/// A segment that continues a lone collinear wall is absorbed into that
/// wall instead of being added. Otherwise the wall is inserted and every
/// crossing with an existing wall splits both walls at a shared vertex.
pub struct AddWall {
    start: Point2,
    end: Point2,
    thickness: f64,
    params: PlanParams,
}

impl AddWall {
    /// Creates a new `AddWall` operation with default parameters.
    #[must_use]
    pub fn new(start: Point2, end: Point2, thickness: f64) -> Self {
        Self {
            start,
            end,
            thickness,
            params: PlanParams::default(),
        }
    }

    /// Sets custom thresholds.
    #[must_use]
    pub fn with_params(mut self, params: PlanParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the operation, returning the walls that now cover the
    /// requested segment.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite input, non-positive thickness, or a
    /// segment no longer than `min_wall_length` once its ends attach to
    /// nearby vertices.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        ensure_finite(&self.start)?;
        ensure_finite(&self.end)?;
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "wall thickness must be positive, got {}",
                self.thickness
            ))
            .into());
        }
        let tol = self.params.vertex_tolerance;
        let snapped = |p: Point2| {
            graph
                .vertex_near(&p, tol)
                .and_then(|v| graph.point(v).ok())
                .unwrap_or(p)
        };
        let length = distance(&snapped(self.start), &snapped(self.end));
        if length <= self.params.min_wall_length {
            warn!(length, "rejected short wall");
            return Err(OperationError::WallTooShort {
                length,
                min: self.params.min_wall_length,
            }
            .into());
        }

        if let Some(existing) = self.try_merge(graph)? {
            return self.split(graph, existing);
        }

        let start = graph.resolve_vertex(self.start, tol);
        let end = graph.resolve_vertex(self.end, tol);
        if start == end {
            if graph.walls_at(start).is_empty() {
                graph.remove_vertex(start);
            }
            return Err(OperationError::InvalidInput(
                "both ends resolve to the same vertex".into(),
            )
            .into());
        }

        if let Some((dup, _)) = graph.walls().find(|(_, w)| {
            (w.start == start && w.end == end) || (w.start == end && w.end == start)
        }) {
            debug!(wall = ?dup, "wall already present");
            return Ok(vec![dup]);
        }

        let id = graph.insert_wall(WallData::new(start, end, self.thickness))?;
        debug!(wall = ?id, length, "added wall");
        self.split(graph, id)
    }

    fn try_merge(&self, graph: &mut WallGraph) -> Result<Option<WallId>> {
        let tol = self.params.vertex_tolerance;
        for point in [self.start, self.end] {
            let Some(vertex) = graph.vertex_near(&point, tol) else {
                continue;
            };
            let walls = graph.walls_at(vertex);
            let [existing] = walls.as_slice() else {
                continue;
            };
            let Some(connection) = graph.wall(*existing)?.end_at(vertex) else {
                continue;
            };
            let merged = MergeCollinear::new(*existing, self.start, self.end, connection)
                .with_tolerances(tol, self.params.collinear_tolerance)
                .execute(graph)?;
            if merged {
                return Ok(Some(*existing));
            }
        }
        Ok(None)
    }

    fn split(&self, graph: &mut WallGraph, wall: WallId) -> Result<Vec<WallId>> {
        SplitCrossings::new(
            vec![wall],
            self.params.shared_endpoint_tolerance,
            self.params.vertex_tolerance,
        )
        .execute(graph)
    }
}
