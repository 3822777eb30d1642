use crate::math::{midpoint, Point2, Vector2};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a wall. Split walls receive fresh ids.
    pub struct WallId;
}

/// One end of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallEnd {
    Start,
    End,
}

impl WallEnd {
    /// The other end.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Data stored for a wall in the graph.
#[derive(Debug, Clone)]
pub struct WallData {
    /// Start vertex.
    pub start: VertexId,
    /// End vertex.
    pub end: VertexId,
    /// Wall thickness in world units.
    pub thickness: f64,
    /// UI hint: suppress the dimension line for this wall.
    pub hide_dimension: bool,
}

impl WallData {
    /// Creates a wall between two vertices.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, thickness: f64) -> Self {
        Self {
            start,
            end,
            thickness,
            hide_dimension: false,
        }
    }

    /// Vertex at the given end.
    #[must_use]
    pub fn vertex(&self, end: WallEnd) -> VertexId {
        match end {
            WallEnd::Start => self.start,
            WallEnd::End => self.end,
        }
    }

    /// Which end references `vertex`, if any.
    #[must_use]
    pub fn end_at(&self, vertex: VertexId) -> Option<WallEnd> {
        if self.start == vertex {
            Some(WallEnd::Start)
        } else if self.end == vertex {
            Some(WallEnd::End)
        } else {
            None
        }
    }

    /// Returns true if both walls reference a common vertex.
    #[must_use]
    pub fn shares_vertex(&self, other: &WallData) -> bool {
        self.start == other.start
            || self.start == other.end
            || self.end == other.start
            || self.end == other.end
    }
}

/// Read-only snapshot of a wall with resolved endpoint coordinates, as
/// handed to rendering, persistence and routing consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub id: WallId,
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
}

impl Wall {
    /// Centreline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unnormalized direction from start to end.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    /// Centreline midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        midpoint(&self.start, &self.end)
    }

    /// Direction angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        let d = self.delta();
        d.y.atan2(d.x)
    }

    /// `|dx| >= |dy|`.
    #[must_use]
    pub fn is_more_horizontal(&self) -> bool {
        let d = self.delta();
        d.x.abs() >= d.y.abs()
    }
}
