use std::collections::HashSet;

use crate::math::distance_2d::distance_to_segment;
use crate::math::polygon_2d::{is_simple_polygon, point_in_polygon_bounded, signed_area, Aabb};
use crate::math::Point2;
use crate::params::PlanParams;
use crate::topology::{Wall, WallId};

use super::network::RoomNetwork;

/// A cycle that passed validation, with the wall carrying each edge.
#[derive(Debug, Clone)]
pub struct RoomCandidate {
    pub path: Vec<Point2>,
    /// Wall under edge `i` (from `path[i]` to `path[i + 1]`).
    pub edge_walls: Vec<WallId>,
    pub signed_area: f64,
}

/// Checks a network cycle against the room rules and returns it as a
/// candidate when it passes.
///
/// A room must have positive winding, an area above `min_room_area`, no
/// self-crossing, an actual wall under every edge, and no other wall whose
/// midpoint lies strictly inside it.
#[must_use]
pub fn validate_cycle(
    cycle: &[usize],
    net: &RoomNetwork,
    walls: &[Wall],
    params: &PlanParams,
) -> Option<RoomCandidate> {
    let path: Vec<Point2> = cycle.iter().map(|&i| net.nodes[i]).collect();

    let area = signed_area(&path);
    if area <= 0.0 || area < params.min_room_area {
        return None;
    }
    if !is_simple_polygon(&path) {
        return None;
    }

    let tol = params.vertex_tolerance;
    let mut edge_walls = Vec::with_capacity(cycle.len());
    for (i, &a) in cycle.iter().enumerate() {
        let b = cycle[(i + 1) % cycle.len()];
        let (pa, pb) = (net.nodes[a], net.nodes[b]);
        let carrier = net.walls_between(a, b).find(|id| {
            walls.iter().any(|w| {
                w.id == *id
                    && distance_to_segment(&pa, &w.start, &w.end) < tol
                    && distance_to_segment(&pb, &w.start, &w.end) < tol
            })
        })?;
        edge_walls.push(carrier);
    }

    let boundary: HashSet<WallId> = edge_walls.iter().copied().collect();
    let bounds = Aabb::from_points(&path)?;
    let n = path.len();
    let subdivided = walls.iter().any(|w| {
        if boundary.contains(&w.id) {
            return false;
        }
        let mid = w.midpoint();
        point_in_polygon_bounded(&mid, &path, &bounds)
            && (0..n).all(|i| distance_to_segment(&mid, &path[i], &path[(i + 1) % n]) > tol)
    });
    if subdivided {
        return None;
    }

    Some(RoomCandidate {
        path,
        edge_walls,
        signed_area: area,
    })
}
