use tracing::debug;

use crate::error::Result;
use crate::math::Point2;
use crate::operations::edit::{
    AddWall, MoveEndpoint, MoveWall, PruneDegenerate, RemoveWall, SplitCrossings, SplitOutcome,
    SplitWall, WeldVertices,
};
use crate::operations::query::NearestVertex;
use crate::operations::rooms::{Room, RoomDetector};
use crate::params::PlanParams;
use crate::serialization::{self, PlanRecord};
use crate::topology::{VertexId, Wall, WallEnd, WallGraph, WallId};

/// A floor plan: the wall graph plus the rooms derived from it.
///
/// Every mutation recomputes the rooms in full before returning, so
/// [`FloorPlan::rooms`] always matches [`FloorPlan::graph`].
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    graph: WallGraph,
    rooms: Vec<Room>,
    detector: RoomDetector,
    params: PlanParams,
}

impl FloorPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new(params: PlanParams) -> Self {
        Self {
            graph: WallGraph::new(),
            rooms: Vec::new(),
            detector: RoomDetector::new(params),
            params,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &WallGraph {
        &self.graph
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn params(&self) -> &PlanParams {
        &self.params
    }

    /// Resolved snapshot of every wall for rendering and routing.
    #[must_use]
    pub fn walls(&self) -> Vec<Wall> {
        self.graph.resolved_walls()
    }

    /// The room whose outline contains `point`, if any.
    #[must_use]
    pub fn room_at(&self, point: &Point2) -> Option<&Room> {
        self.rooms.iter().find(|r| r.contains(point))
    }

    /// Draws a wall. See [`AddWall`].
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is rejected.
    pub fn add_wall(&mut self, start: Point2, end: Point2, thickness: f64) -> Result<Vec<WallId>> {
        let pieces = AddWall::new(start, end, thickness)
            .with_params(self.params)
            .execute(&mut self.graph)?;
        self.recompute_rooms();
        Ok(pieces)
    }

    /// Deletes a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing.
    pub fn remove_wall(&mut self, wall: WallId) -> Result<()> {
        RemoveWall::new(wall).execute(&mut self.graph)?;
        self.recompute_rooms();
        Ok(())
    }

    /// Splits a wall in two at `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or `at` is not inside it.
    pub fn split_wall(&mut self, wall: WallId, at: Point2) -> Result<SplitOutcome> {
        let outcome = SplitWall::new(wall, at, self.params.vertex_tolerance).execute(&mut self.graph)?;
        self.recompute_rooms();
        Ok(outcome)
    }

    /// Moves one end of a wall, and every wall sharing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or the target is not finite.
    pub fn move_endpoint(&mut self, wall: WallId, end: WallEnd, to: Point2) -> Result<VertexId> {
        let vertex = MoveEndpoint::new(wall, end, to).execute(&mut self.graph)?;
        self.recompute_rooms();
        Ok(vertex)
    }

    /// Moves a whole wall and splits any crossings it now makes.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or the drag point is not finite.
    pub fn move_wall(&mut self, wall: WallId, drag_point: Point2) -> Result<Vec<WallId>> {
        let pieces = MoveWall::new(wall, drag_point)
            .with_params(self.params)
            .execute(&mut self.graph)?;
        self.recompute_rooms();
        Ok(pieces)
    }

    /// Moves a whole wall without splitting, for intermediate drag steps.
    /// Returns the wall and its neighbours, to be passed to
    /// [`FloorPlan::settle_walls`] when the drag ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or the drag point is not finite.
    pub fn drag_wall(&mut self, wall: WallId, drag_point: Point2) -> Result<Vec<WallId>> {
        let group = MoveWall::new(wall, drag_point)
            .with_params(self.params)
            .deferred()
            .execute(&mut self.graph)?;
        self.recompute_rooms();
        Ok(group)
    }

    /// Finishes a dragged vertex: welds it onto another vertex it was dropped
    /// on, splits crossings its walls now make, and prunes walls that became
    /// too short. Returns the surviving vertex, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or an edit fails.
    pub fn settle_vertex(&mut self, vertex: VertexId) -> Result<Option<VertexId>> {
        let point = self.graph.point(vertex)?;
        let tol = self.params.vertex_tolerance;
        let target = self
            .graph
            .vertices()
            .filter(|&(id, _)| id != vertex)
            .find(|(_, v)| (v.point - point).norm() < tol)
            .map(|(id, _)| id);
        let survivor = match target {
            Some(into) => {
                WeldVertices::new(vertex, into).execute(&mut self.graph)?;
                into
            }
            None => vertex,
        };

        SplitCrossings::new(
            self.graph.walls_at(survivor),
            self.params.shared_endpoint_tolerance,
            tol,
        )
        .execute(&mut self.graph)?;
        self.prune_and_recompute()?;
        Ok(self.graph.vertex(survivor).is_ok().then_some(survivor))
    }

    /// Finishes a dragged wall group from [`FloorPlan::drag_wall`]: splits
    /// crossings against walls outside the group and prunes short walls.
    ///
    /// # Errors
    ///
    /// Returns an error if an edit fails.
    pub fn settle_walls(&mut self, group: &[WallId]) -> Result<()> {
        SplitCrossings::new(
            group.to_vec(),
            self.params.shared_endpoint_tolerance,
            self.params.vertex_tolerance,
        )
        .ignoring(group.iter().copied())
        .execute(&mut self.graph)?;
        self.prune_and_recompute()
    }

    /// Shows or hides a wall's dimension line.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing.
    pub fn set_hide_dimension(&mut self, wall: WallId, hide: bool) -> Result<()> {
        self.graph.wall_mut(wall)?.hide_dimension = hide;
        Ok(())
    }

    /// Vertex within `radius` of `point`.
    #[must_use]
    pub fn vertex_near(&self, point: Point2, radius: f64) -> Option<VertexId> {
        NearestVertex::new(point, radius)
            .execute(&self.graph)
            .map(|(id, _)| id)
    }

    /// Recomputes every room, carrying identity over from the current list.
    pub fn recompute_rooms(&mut self) {
        self.rooms = self.detector.detect(&self.graph, &self.rooms);
    }

    fn prune_and_recompute(&mut self) -> Result<()> {
        let pruned = PruneDegenerate::new(self.params.min_wall_length).execute(&mut self.graph)?;
        if !pruned.is_empty() {
            debug!(pruned = pruned.len(), "pruned degenerate walls");
        }
        self.recompute_rooms();
        Ok(())
    }

    // --- Persistence ---

    /// Flattens the plan into store records.
    #[must_use]
    pub fn to_records(&self) -> Vec<PlanRecord> {
        serialization::encode(&self.graph, &self.rooms)
    }

    /// Loads a plan from store records, keeping stored room ids and labels
    /// for rooms that still exist.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid records.
    pub fn from_records(records: &[PlanRecord], params: PlanParams) -> Result<Self> {
        let (graph, stored) = serialization::decode(records, &params)?;
        let mut plan = Self {
            graph,
            rooms: stored,
            detector: RoomDetector::new(params),
            params,
        };
        plan.recompute_rooms();
        Ok(plan)
    }

    /// Serializes the plan to JSON records.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serialization::to_json(&self.to_records())
    }

    /// Loads a plan from JSON records.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or invalid records.
    pub fn from_json(json: &str, params: PlanParams) -> Result<Self> {
        Self::from_records(&serialization::from_json(json)?, params)
    }
}
