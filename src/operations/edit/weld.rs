use tracing::debug;

use crate::error::Result;
use crate::math::distance_2d::distance;
use crate::topology::{VertexId, WallGraph, WallId};

/// Merges one vertex into another.
///
/// Every wall ending at `from` is re-pointed to `into`. Walls that collapse
/// onto a single vertex, or that now duplicate an existing wall, are dropped.
pub struct WeldVertices {
    from: VertexId,
    into: VertexId,
}

impl WeldVertices {
    /// Creates a new `WeldVertices` operation.
    #[must_use]
    pub fn new(from: VertexId, into: VertexId) -> Self {
        Self { from, into }
    }

    /// Executes the weld, returning the walls that were dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        graph.vertex(self.from)?;
        graph.vertex(self.into)?;
        if self.from == self.into {
            return Ok(Vec::new());
        }

        let mut dropped = Vec::new();
        for wall in graph.walls_at(self.from) {
            let data = graph.wall_mut(wall)?;
            if data.start == self.from {
                data.start = self.into;
            }
            if data.end == self.from {
                data.end = self.into;
            }
            let (s, e) = (data.start, data.end);
            let duplicate = graph.walls().any(|(other, w)| {
                other != wall && ((w.start == s && w.end == e) || (w.start == e && w.end == s))
            });
            if s == e || duplicate {
                graph.remove_wall(wall)?;
                dropped.push(wall);
            }
        }
        graph.remove_vertex(self.from);
        debug!(from = ?self.from, into = ?self.into, dropped = dropped.len(), "welded vertices");
        Ok(dropped)
    }
}

/// Welds every pair of vertices closer than a tolerance.
///
/// Used when importing plans that only linked walls by equal coordinates.
pub struct WeldCoincident {
    tolerance: f64,
}

impl WeldCoincident {
    /// Creates a new `WeldCoincident` operation.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Executes the pass, returning how many vertices were merged away.
    ///
    /// # Errors
    ///
    /// Returns an error if a weld fails.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<usize> {
        let ids: Vec<VertexId> = graph.vertices().map(|(id, _)| id).collect();
        let mut merged = 0;
        for (i, &keep) in ids.iter().enumerate() {
            let Ok(anchor) = graph.point(keep) else {
                continue;
            };
            for &other in &ids[i + 1..] {
                let Ok(q) = graph.point(other) else {
                    continue;
                };
                if distance(&anchor, &q) < self.tolerance {
                    WeldVertices::new(other, keep).execute(graph)?;
                    merged += 1;
                }
            }
        }
        Ok(merged)
    }
}

/// Removes walls no longer than a minimum length, welding their two ends
/// together so the walls around them stay connected.
pub struct PruneDegenerate {
    min_length: f64,
}

impl PruneDegenerate {
    /// Creates a new `PruneDegenerate` operation.
    #[must_use]
    pub fn new(min_length: f64) -> Self {
        Self { min_length }
    }

    /// Executes the pass, returning the removed walls.
    ///
    /// # Errors
    ///
    /// Returns an error if a weld fails.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        let mut removed = Vec::new();
        for wall in graph.wall_ids() {
            if !graph.contains_wall(wall) {
                continue;
            }
            let (s, e) = graph.segment(wall)?;
            if distance(&s, &e) > self.min_length {
                continue;
            }
            let data = graph.remove_wall(wall)?;
            removed.push(wall);
            removed.extend(WeldVertices::new(data.end, data.start).execute(graph)?);
        }
        graph.remove_orphan_vertices();
        Ok(removed)
    }
}
