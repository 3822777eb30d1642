pub mod vertex;
pub mod wall;

pub use vertex::{VertexData, VertexId};
pub use wall::{Wall, WallData, WallEnd, WallId};

use crate::error::TopologyError;
use crate::math::Point2;
use slotmap::SlotMap;

/// Central arena that owns every wall and the vertices they meet at.
///
/// Walls reference vertices via typed IDs (generational indices), so two
/// walls sharing a corner share the vertex itself rather than equal
/// coordinates.
#[derive(Debug, Default, Clone)]
pub struct WallGraph {
    vertices: SlotMap<VertexId, VertexData>,
    walls: SlotMap<WallId, WallData>,
}

impl WallGraph {
    /// Creates a new, empty wall graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the graph has no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point2) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the graph.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or(TopologyError::VertexNotFound(id))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the graph.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or(TopologyError::VertexNotFound(id))
    }

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the graph.
    pub fn point(&self, id: VertexId) -> Result<Point2, TopologyError> {
        self.vertex(id).map(|v| v.point)
    }

    /// Removes a vertex regardless of whether walls still reference it.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<VertexData> {
        self.vertices.remove(id)
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Closest vertex within `tol` of `point`.
    #[must_use]
    pub fn vertex_near(&self, point: &Point2, tol: f64) -> Option<VertexId> {
        let tol_sq = tol * tol;
        self.vertices
            .iter()
            .map(|(id, v)| (id, (v.point - point).norm_squared()))
            .filter(|&(_, d)| d < tol_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Returns the vertex within `tol` of `point`, inserting one if none exists.
    pub fn resolve_vertex(&mut self, point: Point2, tol: f64) -> VertexId {
        match self.vertex_near(&point, tol) {
            Some(id) => id,
            None => self.add_vertex(point),
        }
    }

    /// Drops every vertex no wall references. Returns how many were removed.
    pub fn remove_orphan_vertices(&mut self) -> usize {
        let before = self.vertices.len();
        let walls = &self.walls;
        self.vertices
            .retain(|id, _| walls.values().any(|w| w.start == id || w.end == id));
        before - self.vertices.len()
    }

    // --- Wall operations ---

    /// Inserts a wall and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or both ends are the
    /// same vertex.
    pub fn insert_wall(&mut self, data: WallData) -> Result<WallId, TopologyError> {
        self.vertex(data.start)?;
        self.vertex(data.end)?;
        if data.start == data.end {
            return Err(TopologyError::InvalidTopology(
                "wall must join two distinct vertices".into(),
            ));
        }
        Ok(self.walls.insert(data))
    }

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the graph.
    pub fn wall(&self, id: WallId) -> Result<&WallData, TopologyError> {
        self.walls.get(id).ok_or(TopologyError::WallNotFound(id))
    }

    /// Returns a mutable reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the graph.
    pub fn wall_mut(&mut self, id: WallId) -> Result<&mut WallData, TopologyError> {
        self.walls.get_mut(id).ok_or(TopologyError::WallNotFound(id))
    }

    /// Removes a wall, leaving its vertices in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the graph.
    pub fn remove_wall(&mut self, id: WallId) -> Result<WallData, TopologyError> {
        self.walls.remove(id).ok_or(TopologyError::WallNotFound(id))
    }

    /// Returns true if the wall exists.
    #[must_use]
    pub fn contains_wall(&self, id: WallId) -> bool {
        self.walls.contains_key(id)
    }

    /// Iterates over all walls.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallData)> {
        self.walls.iter()
    }

    /// All wall ids, in arena order.
    #[must_use]
    pub fn wall_ids(&self) -> Vec<WallId> {
        self.walls.keys().collect()
    }

    /// Number of walls.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Endpoint coordinates of a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its vertices is missing.
    pub fn segment(&self, id: WallId) -> Result<(Point2, Point2), TopologyError> {
        let w = self.wall(id)?;
        Ok((self.point(w.start)?, self.point(w.end)?))
    }

    /// Resolved snapshot of one wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its vertices is missing.
    pub fn resolved(&self, id: WallId) -> Result<Wall, TopologyError> {
        let w = self.wall(id)?;
        Ok(Wall {
            id,
            start: self.point(w.start)?,
            end: self.point(w.end)?,
            thickness: w.thickness,
        })
    }

    /// Resolved snapshots of every wall, in arena order.
    #[must_use]
    pub fn resolved_walls(&self) -> Vec<Wall> {
        self.walls
            .keys()
            .filter_map(|id| self.resolved(id).ok())
            .collect()
    }

    /// Walls with an end at `vertex`.
    #[must_use]
    pub fn walls_at(&self, vertex: VertexId) -> Vec<WallId> {
        self.walls
            .iter()
            .filter(|(_, w)| w.start == vertex || w.end == vertex)
            .map(|(id, _)| id)
            .collect()
    }

    /// Walls sharing a vertex with `id`, excluding `id` itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the graph.
    pub fn neighbours(&self, id: WallId) -> Result<Vec<WallId>, TopologyError> {
        let w = self.wall(id)?;
        Ok(self
            .walls
            .iter()
            .filter(|&(other, data)| other != id && data.shares_vertex(w))
            .map(|(other, _)| other)
            .collect())
    }
}
