use crate::math::distance_2d::{distance, projection_parameter};
use crate::math::Point2;
use crate::operations::query::{NearestVertex, NearestWall};
use crate::params::PlanParams;
use crate::topology::{VertexId, WallGraph, WallId};

/// What a snapped point locked onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    /// An existing wall corner.
    Vertex(VertexId),
    /// The centreline of a wall.
    Wall(WallId),
    /// Horizontal or vertical from the anchor.
    Axis,
    /// Nothing in range; the raw pointer.
    Free,
}

/// A pointer position after magnetic snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub point: Point2,
    pub target: SnapTarget,
}

/// Snaps a pointer position for wall drawing.
///
/// Vertices win over walls, walls over axis lock. Axis lock only applies
/// when an `anchor` is given and the segment from it is within the
/// perpendicular tolerance of horizontal or vertical.
#[must_use]
pub fn snap_point(
    graph: &WallGraph,
    point: Point2,
    anchor: Option<Point2>,
    radius: f64,
    params: &PlanParams,
) -> Snap {
    if let Some((vertex, _)) = NearestVertex::new(point, radius).execute(graph) {
        if let Ok(p) = graph.point(vertex) {
            return Snap {
                point: p,
                target: SnapTarget::Vertex(vertex),
            };
        }
    }

    if let Some((wall, _)) = NearestWall::new(point, radius).execute(graph) {
        if let Ok((s, e)) = graph.segment(wall) {
            if let Some(t) = projection_parameter(&point, &s, &e) {
                let t = t.clamp(0.0, 1.0);
                return Snap {
                    point: s + (e - s) * t,
                    target: SnapTarget::Wall(wall),
                };
            }
        }
    }

    if let Some(anchor) = anchor {
        if let Some(locked) = axis_lock(anchor, point, params.perpendicular_tolerance_deg) {
            return Snap {
                point: locked,
                target: SnapTarget::Axis,
            };
        }
    }

    Snap {
        point,
        target: SnapTarget::Free,
    }
}

/// Projects `point` onto the horizontal or vertical through `anchor` when
/// the direction is within `tolerance_deg` of that axis.
fn axis_lock(anchor: Point2, point: Point2, tolerance_deg: f64) -> Option<Point2> {
    if distance(&anchor, &point) < f64::EPSILON {
        return None;
    }
    let d = point - anchor;
    let angle = d.y.abs().atan2(d.x.abs()).to_degrees();
    if angle <= tolerance_deg {
        Some(Point2::new(point.x, anchor.y))
    } else if angle >= 90.0 - tolerance_deg {
        Some(Point2::new(anchor.x, point.y))
    } else {
        None
    }
}
