use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::math::distance_2d::{distance, projection_parameter};
use crate::math::intersect_2d::segments_intersect;
use crate::math::{points_coincide, Point2};
use crate::topology::{VertexId, WallData, WallGraph, WallId};

/// Result of splitting a wall in two.
#[derive(Debug, Clone, Copy)]
pub struct SplitOutcome {
    /// Child running from the parent's start to the split vertex.
    pub first: WallId,
    /// Child running from the split vertex to the parent's end.
    pub second: WallId,
    /// The vertex both children share.
    pub vertex: VertexId,
}

/// Splits a wall at a point on its span.
///
/// The parent wall is removed and two children with fresh ids take its
/// place. Both inherit the thickness and keep the parent's end vertices, so
/// every other wall meeting those vertices stays connected.
pub struct SplitWall {
    wall: WallId,
    at: Point2,
    vertex: Option<VertexId>,
    tolerance: f64,
}

impl SplitWall {
    /// Creates a new `SplitWall` operation.
    #[must_use]
    pub fn new(wall: WallId, at: Point2, tolerance: f64) -> Self {
        Self {
            wall,
            at,
            vertex: None,
            tolerance,
        }
    }

    /// Splits at an existing vertex instead of resolving one from the point.
    #[must_use]
    pub fn at_vertex(mut self, vertex: VertexId) -> Self {
        self.vertex = Some(vertex);
        self
    }

    /// Executes the split.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or the split point does not lie
    /// strictly inside the wall's span.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<SplitOutcome> {
        let data = graph.wall(self.wall)?.clone();
        let start = graph.point(data.start)?;
        let end = graph.point(data.end)?;

        let at = match self.vertex {
            Some(v) => graph.point(v)?,
            None => self.at,
        };

        let Some(t) = projection_parameter(&at, &start, &end) else {
            return Err(OperationError::InvalidInput("cannot split a zero-length wall".into()).into());
        };
        if t <= 0.0
            || t >= 1.0
            || points_coincide(&at, &start, self.tolerance)
            || points_coincide(&at, &end, self.tolerance)
        {
            return Err(OperationError::InvalidInput(format!(
                "split point ({}, {}) is not inside the wall span",
                at.x, at.y
            ))
            .into());
        }

        let vertex = match self.vertex {
            Some(v) => v,
            None => graph.resolve_vertex(at, self.tolerance),
        };

        graph.remove_wall(self.wall)?;
        let mut first = WallData::new(data.start, vertex, data.thickness);
        first.hide_dimension = data.hide_dimension;
        let mut second = WallData::new(vertex, data.end, data.thickness);
        second.hide_dimension = data.hide_dimension;
        let first = graph.insert_wall(first)?;
        let second = graph.insert_wall(second)?;

        debug!(wall = ?self.wall, ?first, ?second, x = at.x, y = at.y, "split wall");
        Ok(SplitOutcome {
            first,
            second,
            vertex,
        })
    }
}

/// Planarizes walls against the rest of the graph.
///
/// Every wall in the work list that crosses another wall away from a shared
/// vertex is split at the crossing, and so is the wall it crosses, so both
/// end up sharing one vertex there. Walls in the ignore set are never split
/// against.
pub struct SplitCrossings {
    walls: Vec<WallId>,
    ignore: HashSet<WallId>,
    shared_tolerance: f64,
    vertex_tolerance: f64,
}

impl SplitCrossings {
    /// Creates a new `SplitCrossings` operation.
    #[must_use]
    pub fn new(walls: Vec<WallId>, shared_tolerance: f64, vertex_tolerance: f64) -> Self {
        Self {
            walls,
            ignore: HashSet::new(),
            shared_tolerance,
            vertex_tolerance,
        }
    }

    /// Walls that must not be split against the work list.
    #[must_use]
    pub fn ignoring(mut self, ignore: impl IntoIterator<Item = WallId>) -> Self {
        self.ignore.extend(ignore);
        self
    }

    /// Executes the operation, returning the pieces that replace the work
    /// list walls (unsplit walls are returned as they are).
    ///
    /// # Errors
    ///
    /// Returns an error if a split fails.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        let mut pending: Vec<WallId> = self
            .walls
            .iter()
            .copied()
            .filter(|&w| graph.contains_wall(w))
            .rev()
            .collect();
        let mut ignore = self.ignore.clone();
        let mut done = Vec::new();

        while let Some(wall) = pending.pop() {
            if !graph.contains_wall(wall) {
                continue;
            }
            let Some((other, point)) = self.first_crossing(graph, wall, &ignore)? else {
                done.push(wall);
                continue;
            };

            let w = graph.wall(wall)?.clone();
            let o = graph.wall(other)?.clone();
            let (ws, we) = (graph.point(w.start)?, graph.point(w.end)?);
            let (os, oe) = (graph.point(o.start)?, graph.point(o.end)?);

            // Reuse an end vertex when the crossing is a T-junction.
            let vertex = if points_coincide(&point, &ws, self.shared_tolerance) {
                w.start
            } else if points_coincide(&point, &we, self.shared_tolerance) {
                w.end
            } else if points_coincide(&point, &os, self.shared_tolerance) {
                o.start
            } else if points_coincide(&point, &oe, self.shared_tolerance) {
                o.end
            } else {
                graph.add_vertex(point)
            };
            trace!(?wall, ?other, x = point.x, y = point.y, "crossing");

            if o.end_at(vertex).is_none() {
                let outcome = SplitWall::new(other, point, self.vertex_tolerance)
                    .at_vertex(vertex)
                    .execute(graph)?;
                if ignore.remove(&other) {
                    ignore.insert(outcome.first);
                    ignore.insert(outcome.second);
                }
                // Pieces of a work-list wall are still pending.
                if let Some(pos) = pending.iter().position(|&p| p == other) {
                    pending.remove(pos);
                    pending.push(outcome.first);
                    pending.push(outcome.second);
                }
                if let Some(pos) = done.iter().position(|&p| p == other) {
                    done.remove(pos);
                    done.push(outcome.first);
                    done.push(outcome.second);
                }
            }

            if w.end_at(vertex).is_none() {
                let outcome = SplitWall::new(wall, point, self.vertex_tolerance)
                    .at_vertex(vertex)
                    .execute(graph)?;
                if ignore.remove(&wall) {
                    ignore.insert(outcome.first);
                    ignore.insert(outcome.second);
                }
                pending.push(outcome.second);
                pending.push(outcome.first);
            } else {
                pending.push(wall);
            }
        }
        Ok(done)
    }

    /// Closest crossing of `wall` with any non-ignored wall, measured from the
    /// wall's start.
    fn first_crossing(
        &self,
        graph: &WallGraph,
        wall: WallId,
        ignore: &HashSet<WallId>,
    ) -> Result<Option<(WallId, Point2)>> {
        let w = graph.wall(wall)?;
        let (ws, we) = graph.segment(wall)?;
        let mut best: Option<(WallId, Point2, f64)> = None;

        for (other, data) in graph.walls() {
            if other == wall || ignore.contains(&other) || data.shares_vertex(w) {
                continue;
            }
            let (os, oe) = graph.segment(other)?;
            if let Some(point) = segments_intersect(&ws, &we, &os, &oe, self.shared_tolerance) {
                let d = distance(&ws, &point);
                if best.is_none_or(|(_, _, bd)| d < bd) {
                    best = Some((other, point, d));
                }
            }
        }
        Ok(best.map(|(id, p, _)| (id, p)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn wall(graph: &mut WallGraph, a: Point2, b: Point2) -> WallId {
        let s = graph.resolve_vertex(a, 1.0);
        let e = graph.resolve_vertex(b, 1.0);
        graph.insert_wall(WallData::new(s, e, 10.0)).unwrap()
    }

    #[test]
    fn split_wall_replaces_with_two_children() {
        let mut graph = WallGraph::new();
        let w = wall(&mut graph, p(0.0, 0.0), p(200.0, 0.0));
        let out = SplitWall::new(w, p(100.0, 0.0), 1.0).execute(&mut graph).unwrap();

        assert!(!graph.contains_wall(w));
        assert_eq!(graph.wall_count(), 2);
        let (s1, e1) = graph.segment(out.first).unwrap();
        let (s2, e2) = graph.segment(out.second).unwrap();
        assert!(points_coincide(&s1, &p(0.0, 0.0), 1e-9));
        assert!(points_coincide(&e1, &p(100.0, 0.0), 1e-9));
        assert!(points_coincide(&s2, &p(100.0, 0.0), 1e-9));
        assert!(points_coincide(&e2, &p(200.0, 0.0), 1e-9));
        assert_eq!(graph.wall(out.first).unwrap().end, out.vertex);
        assert_eq!(graph.wall(out.second).unwrap().start, out.vertex);
    }

    #[test]
    fn split_at_end_is_rejected() {
        let mut graph = WallGraph::new();
        let w = wall(&mut graph, p(0.0, 0.0), p(200.0, 0.0));
        assert!(SplitWall::new(w, p(200.0, 0.0), 1.0).execute(&mut graph).is_err());
        assert!(SplitWall::new(w, p(250.0, 0.0), 1.0).execute(&mut graph).is_err());
        assert!(graph.contains_wall(w));
    }

    #[test]
    fn crossing_splits_both_walls_at_shared_vertex() {
        let mut graph = WallGraph::new();
        wall(&mut graph, p(0.0, 0.0), p(200.0, 0.0));
        let b = wall(&mut graph, p(100.0, -50.0), p(100.0, 50.0));

        let pieces = SplitCrossings::new(vec![b], 1.0, 1.0).execute(&mut graph).unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(graph.wall_count(), 4);

        let centre = graph.vertex_near(&p(100.0, 0.0), 1e-6).unwrap();
        assert_eq!(graph.walls_at(centre).len(), 4);
    }

    #[test]
    fn t_junction_splits_only_the_crossed_wall() {
        let mut graph = WallGraph::new();
        wall(&mut graph, p(0.0, 0.0), p(200.0, 0.0));
        let stub = wall(&mut graph, p(80.0, 0.0), p(80.0, 120.0));

        let pieces = SplitCrossings::new(vec![stub], 1.0, 1.0).execute(&mut graph).unwrap();
        assert_eq!(pieces, vec![stub]);
        assert_eq!(graph.wall_count(), 3);
        let start = graph.wall(stub).unwrap().start;
        assert_eq!(graph.walls_at(start).len(), 3);
    }

    #[test]
    fn multiple_crossings_along_one_wall() {
        let mut graph = WallGraph::new();
        wall(&mut graph, p(100.0, -50.0), p(100.0, 50.0));
        wall(&mut graph, p(200.0, -50.0), p(200.0, 50.0));
        let long = wall(&mut graph, p(0.0, 0.0), p(300.0, 0.0));

        let pieces = SplitCrossings::new(vec![long], 1.0, 1.0).execute(&mut graph).unwrap();
        assert_eq!(pieces.len(), 3);
        assert_eq!(graph.wall_count(), 7);
    }

    #[test]
    fn ignored_walls_are_not_split() {
        let mut graph = WallGraph::new();
        let a = wall(&mut graph, p(0.0, 0.0), p(200.0, 0.0));
        let b = wall(&mut graph, p(100.0, -50.0), p(100.0, 50.0));

        let pieces = SplitCrossings::new(vec![b], 1.0, 1.0)
            .ignoring([a])
            .execute(&mut graph)
            .unwrap();
        assert_eq!(pieces, vec![b]);
        assert_eq!(graph.wall_count(), 2);
    }
}
