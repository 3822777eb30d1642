use crate::math::distance_2d::{distance, distance_to_segment};
use crate::math::Point2;
use crate::topology::{VertexId, WallGraph, WallId};

/// Finds the vertex closest to a point within a radius.
pub struct NearestVertex {
    point: Point2,
    radius: f64,
    skip: Option<VertexId>,
}

impl NearestVertex {
    /// Creates a new `NearestVertex` query.
    #[must_use]
    pub fn new(point: Point2, radius: f64) -> Self {
        Self {
            point,
            radius,
            skip: None,
        }
    }

    /// Ignores `vertex`, e.g. the one being dragged.
    #[must_use]
    pub fn excluding(mut self, vertex: VertexId) -> Self {
        self.skip = Some(vertex);
        self
    }

    /// Returns `(vertex, distance)` for the closest vertex, if any.
    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Option<(VertexId, f64)> {
        graph
            .vertices()
            .filter(|&(id, _)| Some(id) != self.skip)
            .map(|(id, v)| (id, distance(&v.point, &self.point)))
            .filter(|&(_, d)| d <= self.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Collects walls whose centreline passes within a radius of a point,
/// closest first.
pub struct WallsNear {
    point: Point2,
    radius: f64,
}

impl WallsNear {
    /// Creates a new `WallsNear` query.
    #[must_use]
    pub fn new(point: Point2, radius: f64) -> Self {
        Self { point, radius }
    }

    /// Returns `(wall, distance)` pairs sorted by distance.
    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Vec<(WallId, f64)> {
        let mut hits: Vec<_> = graph
            .wall_ids()
            .into_iter()
            .filter_map(|id| {
                let (s, e) = graph.segment(id).ok()?;
                let d = distance_to_segment(&self.point, &s, &e);
                (d <= self.radius).then_some((id, d))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}

/// Finds the wall whose centreline passes closest to a point within a radius.
pub struct NearestWall {
    point: Point2,
    radius: f64,
}

impl NearestWall {
    /// Creates a new `NearestWall` query.
    #[must_use]
    pub fn new(point: Point2, radius: f64) -> Self {
        Self { point, radius }
    }

    /// Returns `(wall, distance)` for the closest wall, if any.
    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Option<(WallId, f64)> {
        WallsNear::new(self.point, self.radius)
            .execute(graph)
            .into_iter()
            .next()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::WallData;

    #[test]
    fn nearest_wall_and_vertex() {
        let mut graph = WallGraph::new();
        let a = graph.add_vertex(Point2::new(0.0, 0.0));
        let b = graph.add_vertex(Point2::new(100.0, 0.0));
        let c = graph.add_vertex(Point2::new(0.0, 30.0));
        let d = graph.add_vertex(Point2::new(100.0, 30.0));
        let low = graph.insert_wall(WallData::new(a, b, 10.0)).unwrap();
        let high = graph.insert_wall(WallData::new(c, d, 10.0)).unwrap();

        let at = Point2::new(50.0, 8.0);
        let hits = WallsNear::new(at, 25.0).execute(&graph);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![low, high]);
        assert_eq!(NearestWall::new(at, 10.0).execute(&graph).unwrap().0, low);

        let (v, dist) = NearestVertex::new(Point2::new(98.0, 1.0), 5.0)
            .execute(&graph)
            .unwrap();
        assert_eq!(v, b);
        assert!(dist < 5.0);
        assert!(NearestVertex::new(Point2::new(50.0, 15.0), 5.0).execute(&graph).is_none());

        let (v, _) = NearestVertex::new(Point2::new(98.0, 1.0), 40.0)
            .excluding(b)
            .execute(&graph)
            .unwrap();
        assert_eq!(v, d);
    }
}
