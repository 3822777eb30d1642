use tracing::debug;

use crate::error::Result;
use crate::math::{ensure_finite, Point2};
use crate::params::PlanParams;
use crate::topology::{WallGraph, WallId};

use super::split::SplitCrossings;

/// Drags a whole wall by its middle handle.
///
/// The move is axis-constrained: a wall that is more horizontal than
/// vertical only translates vertically, and vice versa. Both vertices move
/// by the same delta, dragging every connected wall along. Afterwards the
/// wall and its pre-move neighbours are split wherever they now cross a wall
/// outside that set.
pub struct MoveWall {
    wall: WallId,
    drag_point: Point2,
    split: bool,
    params: PlanParams,
}

impl MoveWall {
    /// Creates a new `MoveWall` operation.
    #[must_use]
    pub fn new(wall: WallId, drag_point: Point2) -> Self {
        Self {
            wall,
            drag_point,
            split: true,
            params: PlanParams::default(),
        }
    }

    /// Sets custom thresholds.
    #[must_use]
    pub fn with_params(mut self, params: PlanParams) -> Self {
        self.params = params;
        self
    }

    /// Skips the crossing split, for intermediate drag steps.
    #[must_use]
    pub fn deferred(mut self) -> Self {
        self.split = false;
        self
    }

    /// Executes the move, returning the pieces of the moved wall and its
    /// neighbours.
    ///
    /// # Errors
    ///
    /// Returns an error if the drag point is not finite or the wall is missing.
    pub fn execute(&self, graph: &mut WallGraph) -> Result<Vec<WallId>> {
        ensure_finite(&self.drag_point)?;
        let wall = graph.resolved(self.wall)?;
        let data = graph.wall(self.wall)?.clone();
        let before = graph.neighbours(self.wall)?;

        let mut delta = self.drag_point - wall.midpoint();
        if wall.is_more_horizontal() {
            delta.x = 0.0;
        } else {
            delta.y = 0.0;
        }

        graph.vertex_mut(data.start)?.point = wall.start + delta;
        graph.vertex_mut(data.end)?.point = wall.end + delta;
        debug!(wall = ?self.wall, dx = delta.x, dy = delta.y, "moved wall");

        let mut group = vec![self.wall];
        group.extend(before.iter().copied());
        if !self.split {
            return Ok(group);
        }
        SplitCrossings::new(
            group.clone(),
            self.params.shared_endpoint_tolerance,
            self.params.vertex_tolerance,
        )
        .ignoring(group)
        .execute(graph)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::points_coincide;
    use crate::operations::edit::AddWall;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn horizontal_wall_moves_vertically_only() {
        let mut graph = WallGraph::new();
        let top = AddWall::new(p(0.0, 0.0), p(200.0, 0.0), 10.0).execute(&mut graph).unwrap()[0];
        let side = AddWall::new(p(200.0, 0.0), p(200.0, 300.0), 10.0)
            .execute(&mut graph)
            .unwrap()[0];

        MoveWall::new(top, p(170.0, 40.0)).execute(&mut graph).unwrap();

        let (s, e) = graph.segment(top).unwrap();
        assert!(points_coincide(&s, &p(0.0, 40.0), 1e-9));
        assert!(points_coincide(&e, &p(200.0, 40.0), 1e-9));
        assert!(points_coincide(&graph.segment(side).unwrap().0, &p(200.0, 40.0), 1e-9));
    }

    #[test]
    fn vertical_wall_moves_horizontally_only() {
        let mut graph = WallGraph::new();
        let w = AddWall::new(p(0.0, 0.0), p(0.0, 200.0), 10.0).execute(&mut graph).unwrap()[0];
        MoveWall::new(w, p(50.0, 500.0)).execute(&mut graph).unwrap();
        let (s, e) = graph.segment(w).unwrap();
        assert!(points_coincide(&s, &p(50.0, 0.0), 1e-9));
        assert!(points_coincide(&e, &p(50.0, 200.0), 1e-9));
    }

    #[test]
    fn new_crossing_after_move_is_split() {
        let mut graph = WallGraph::new();
        let mover = AddWall::new(p(0.0, 0.0), p(0.0, 200.0), 10.0).execute(&mut graph).unwrap()[0];
        AddWall::new(p(100.0, 50.0), p(300.0, 50.0), 10.0).execute(&mut graph).unwrap();

        let pieces = MoveWall::new(mover, p(150.0, 100.0)).execute(&mut graph).unwrap();

        assert_eq!(pieces.len(), 2);
        assert_eq!(graph.wall_count(), 4);
        let centre = graph.vertex_near(&p(150.0, 50.0), 1e-6).unwrap();
        assert_eq!(graph.walls_at(centre).len(), 4);
    }

    #[test]
    fn deferred_move_leaves_crossings() {
        let mut graph = WallGraph::new();
        let mover = AddWall::new(p(0.0, 0.0), p(0.0, 200.0), 10.0).execute(&mut graph).unwrap()[0];
        AddWall::new(p(100.0, 50.0), p(300.0, 50.0), 10.0).execute(&mut graph).unwrap();
        MoveWall::new(mover, p(150.0, 100.0)).deferred().execute(&mut graph).unwrap();
        assert_eq!(graph.wall_count(), 2);
    }
}
