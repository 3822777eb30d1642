mod cycles;
mod network;
mod room;
mod validate;

pub use room::{same_outline, Room, RoomId};

use tracing::debug;

use crate::math::polygon_2d::{
    inset_polygon_per_edge, polygon_area, polygon_centroid, rotate_to_canonical_start,
};
use crate::math::units::area_to_square_metres;
use crate::params::PlanParams;
use crate::topology::WallGraph;

use cycles::enumerate_cycles;
use network::build_network;
use validate::{validate_cycle, RoomCandidate};

/// Detects rooms enclosed by walls.
///
/// The detector is a pure function of the wall graph except for room
/// identity: rooms whose outline matches one from the previous run keep
/// that room's id and label position, and new rooms draw fresh ids from the
/// detector's counter.
#[derive(Debug, Clone)]
pub struct RoomDetector {
    next_id: u64,
    params: PlanParams,
}

impl Default for RoomDetector {
    fn default() -> Self {
        Self::new(PlanParams::default())
    }
}

impl RoomDetector {
    /// Creates a detector with the given thresholds.
    #[must_use]
    pub fn new(params: PlanParams) -> Self {
        Self { next_id: 1, params }
    }

    /// Thresholds in use.
    #[must_use]
    pub fn params(&self) -> &PlanParams {
        &self.params
    }

    /// Recomputes every room from `graph`, carrying identity over from
    /// `previous`.
    pub fn detect(&mut self, graph: &WallGraph, previous: &[Room]) -> Vec<Room> {
        if let Some(max) = previous.iter().map(|r| r.id.0).max() {
            self.next_id = self.next_id.max(max + 1);
        }

        let walls = graph.resolved_walls();
        let net = build_network(graph, &self.params);
        let cycles = enumerate_cycles(&net, self.params.max_cycle_length);
        let tol = self.params.vertex_tolerance;

        let mut unique: Vec<RoomCandidate> = Vec::new();
        for cycle in &cycles {
            let Some(candidate) = validate_cycle(cycle, &net, &walls, &self.params) else {
                continue;
            };
            if unique
                .iter()
                .all(|u| !same_outline(&u.path, &candidate.path, tol))
            {
                unique.push(candidate);
            }
        }

        let mut rooms: Vec<Room> = unique
            .into_iter()
            .map(|candidate| self.finish(graph, candidate, previous))
            .collect();
        rooms.sort_by(|a, b| {
            a.path[0]
                .x
                .total_cmp(&b.path[0].x)
                .then(a.path[0].y.total_cmp(&b.path[0].y))
        });

        debug!(
            walls = walls.len(),
            cycles = cycles.len(),
            rooms = rooms.len(),
            "rooms recomputed"
        );
        rooms
    }

    fn finish(&mut self, graph: &WallGraph, candidate: RoomCandidate, previous: &[Room]) -> Room {
        let tol = self.params.vertex_tolerance;

        let half_thickness: Vec<f64> = candidate
            .edge_walls
            .iter()
            .map(|&w| graph.wall(w).map_or(0.0, |d| d.thickness * 0.5))
            .collect();
        let centerline_area = candidate.signed_area.abs();
        let clear_area = inset_polygon_per_edge(&candidate.path, &half_thickness)
            .map_or(centerline_area, |inner| polygon_area(&inner));

        let path = rotate_to_canonical_start(&candidate.path, tol);

        let (id, label_position) = match previous.iter().find(|r| r.has_outline(&path, tol)) {
            Some(prior) => (prior.id, prior.label_position),
            None => {
                let id = RoomId(self.next_id);
                self.next_id += 1;
                let centre = polygon_centroid(&path).unwrap_or(path[0]);
                (id, centre)
            }
        };

        Room {
            id,
            path,
            area: area_to_square_metres(clear_area),
            centerline_area,
            label_position,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::operations::edit::{AddWall, MoveEndpoint};
    use crate::topology::WallEnd;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn draw(graph: &mut WallGraph, pts: &[(f64, f64)], thickness: f64) {
        for w in pts.windows(2) {
            AddWall::new(p(w[0].0, w[0].1), p(w[1].0, w[1].1), thickness)
                .execute(graph)
                .unwrap();
        }
    }

    fn rectangle(graph: &mut WallGraph, w: f64, h: f64, thickness: f64) {
        draw(
            graph,
            &[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, 0.0)],
            thickness,
        );
    }

    #[test]
    fn rectangle_area_is_clear_floor() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 310.0, 410.0, 10.0);

        let rooms = RoomDetector::default().detect(&graph, &[]);
        assert_eq!(rooms.len(), 1);
        let room = &rooms[0];
        assert_relative_eq!(room.area, 12.0, epsilon = 1e-9);
        assert_relative_eq!(room.centerline_area, 310.0 * 410.0, epsilon = 1e-6);
        assert!(crate::math::polygon_2d::signed_area(&room.path) > 0.0);
        assert_relative_eq!(room.label_position.x, 155.0, epsilon = 1e-9);
        assert_relative_eq!(room.label_position.y, 205.0, epsilon = 1e-9);
    }

    #[test]
    fn open_u_has_no_room() {
        let mut graph = WallGraph::new();
        draw(
            &mut graph,
            &[(0.0, 0.0), (300.0, 0.0), (300.0, 300.0), (0.0, 300.0)],
            10.0,
        );
        assert!(RoomDetector::default().detect(&graph, &[]).is_empty());
    }

    #[test]
    fn partition_yields_two_rooms_not_three() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 400.0, 300.0, 10.0);
        AddWall::new(p(200.0, 0.0), p(200.0, 300.0), 10.0)
            .execute(&mut graph)
            .unwrap();

        let rooms = RoomDetector::default().detect(&graph, &[]);
        assert_eq!(rooms.len(), 2);
        for room in &rooms {
            assert_relative_eq!(room.centerline_area, 200.0 * 300.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn free_standing_wall_inside_rejects_room() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 400.0, 300.0, 10.0);
        AddWall::new(p(100.0, 150.0), p(300.0, 150.0), 10.0)
            .execute(&mut graph)
            .unwrap();
        assert!(RoomDetector::default().detect(&graph, &[]).is_empty());
    }

    #[test]
    fn sliver_is_rejected() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 200.0, 40.0, 10.0);
        assert!(RoomDetector::default().detect(&graph, &[]).is_empty());
    }

    #[test]
    fn detection_is_idempotent() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 400.0, 300.0, 10.0);
        AddWall::new(p(200.0, 0.0), p(200.0, 300.0), 10.0)
            .execute(&mut graph)
            .unwrap();

        let mut detector = RoomDetector::default();
        let first = detector.detect(&graph, &[]);
        let second = detector.detect(&graph, &first);
        assert_eq!(first, second);
    }

    #[test]
    fn identity_survives_unrelated_edit_and_label_is_kept() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 400.0, 300.0, 10.0);
        let mut detector = RoomDetector::default();
        let mut first = detector.detect(&graph, &[]);
        first[0].label_position = p(42.0, 42.0);

        // A detached wall elsewhere does not touch the room.
        AddWall::new(p(1000.0, 0.0), p(1200.0, 0.0), 10.0)
            .execute(&mut graph)
            .unwrap();
        let second = detector.detect(&graph, &first);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, first[0].id);
        assert_relative_eq!(second[0].label_position.x, 42.0);
    }

    #[test]
    fn reshaped_room_gets_new_identity() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 400.0, 300.0, 10.0);
        let mut detector = RoomDetector::default();
        let first = detector.detect(&graph, &[]);

        let corner = graph
            .walls()
            .find(|(_, w)| graph.point(w.end).unwrap() == p(400.0, 300.0))
            .map(|(id, _)| id)
            .unwrap();
        MoveEndpoint::new(corner, WallEnd::End, p(450.0, 350.0))
            .execute(&mut graph)
            .unwrap();

        let second = detector.detect(&graph, &first);
        assert_eq!(second.len(), 1);
        assert_ne!(second[0].id, first[0].id);
    }

    #[test]
    fn crossing_walls_without_shared_vertex_still_enclose() {
        use crate::topology::WallData;
        // Built without AddWall so the crossings are not split in the graph.
        let mut graph = WallGraph::new();
        for (a, b) in [
            ((-50.0, 0.0), (450.0, 0.0)),
            ((400.0, -50.0), (400.0, 350.0)),
            ((450.0, 300.0), (-50.0, 300.0)),
            ((0.0, 350.0), (0.0, -50.0)),
        ] {
            let s = graph.add_vertex(p(a.0, a.1));
            let e = graph.add_vertex(p(b.0, b.1));
            graph.insert_wall(WallData::new(s, e, 10.0)).unwrap();
        }
        let rooms = RoomDetector::default().detect(&graph, &[]);
        assert_eq!(rooms.len(), 1);
        assert_relative_eq!(rooms[0].centerline_area, 400.0 * 300.0, epsilon = 1e-6);
    }

    #[test]
    fn previous_ids_raise_the_counter() {
        let mut graph = WallGraph::new();
        rectangle(&mut graph, 400.0, 300.0, 10.0);
        let stale = Room {
            id: RoomId(41),
            path: vec![p(9000.0, 0.0), p(9100.0, 0.0), p(9100.0, 100.0)],
            area: 0.5,
            centerline_area: 5000.0,
            label_position: p(9050.0, 50.0),
        };
        let rooms = RoomDetector::default().detect(&graph, &[stale]);
        assert_eq!(rooms[0].id, RoomId(42));
    }
}
