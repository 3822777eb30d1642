use serde::{Deserialize, Serialize};

use crate::math::polygon_2d::point_in_polygon;
use crate::math::{points_coincide, Point2};

/// Stable identifier of a detected room.
///
/// Survives recomputation as long as the room's outline does.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

/// A room enclosed by walls. Rooms are derived from the wall graph and
/// replaced wholesale on every recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// Closed outline along wall centrelines, positive winding.
    pub path: Vec<Point2>,
    /// Clear floor area in square metres, inside the wall faces.
    pub area: f64,
    /// Area of the centreline outline in world units².
    pub centerline_area: f64,
    /// Where the room label is drawn.
    pub label_position: Point2,
}

impl Room {
    /// Returns true if the room outline contains `p`.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        point_in_polygon(p, &self.path)
    }

    /// Returns true if `path` has the same vertices as this room's outline.
    #[must_use]
    pub fn has_outline(&self, path: &[Point2], tol: f64) -> bool {
        same_outline(&self.path, path, tol)
    }
}

/// Two outlines are the same room when they have the same vertex count and
/// every vertex of one matches some vertex of the other.
#[must_use]
pub fn same_outline(a: &[Point2], b: &[Point2], tol: f64) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|p| b.iter().any(|q| points_coincide(p, q, tol)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn outline_match_ignores_order_and_start() {
        let a = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let b = vec![p(10.0, 10.0), p(0.0, 10.0), p(0.0, 0.0), p(10.0, 0.2)];
        assert!(same_outline(&a, &b, 0.5));
        assert!(!same_outline(&a, &b[..3], 0.5));
        assert!(!same_outline(&a, &b, 0.1));
    }
}
