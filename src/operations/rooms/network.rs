use crate::math::distance_2d::distance;
use crate::math::Point2;
use crate::operations::query::WallIntersections;
use crate::params::PlanParams;
use crate::topology::{WallGraph, WallId};

/// A sub-segment of a wall between two consecutive network nodes.
#[derive(Debug, Clone, Copy)]
pub struct NetworkEdge {
    pub a: usize,
    pub b: usize,
    pub wall: WallId,
}

/// Undirected multigraph of wall endpoints and crossing points.
#[derive(Debug, Default)]
pub struct RoomNetwork {
    pub nodes: Vec<Point2>,
    pub edges: Vec<NetworkEdge>,
    /// node -> list of (neighbour node, wall).
    pub adjacency: Vec<Vec<(usize, WallId)>>,
}

impl RoomNetwork {
    /// Walls connecting two nodes directly.
    pub fn walls_between(&self, a: usize, b: usize) -> impl Iterator<Item = WallId> + '_ {
        self.adjacency[a]
            .iter()
            .filter(move |&&(n, _)| n == b)
            .map(|&(_, w)| w)
    }
}

/// Builds the room network from the current walls.
///
/// Every wall endpoint becomes a node, as does every crossing that is not
/// already a shared vertex. Each wall is then cut at the crossings on its
/// span, in order from its start, and consecutive points are joined by an
/// edge tagged with the wall.
#[must_use]
pub fn build_network(graph: &WallGraph, params: &PlanParams) -> RoomNetwork {
    let crossings = WallIntersections::new(params.shared_endpoint_tolerance).execute(graph);
    let tol = params.vertex_tolerance;

    let mut net = RoomNetwork::default();
    for (id, _) in graph.walls() {
        let Ok((start, end)) = graph.segment(id) else {
            continue;
        };

        let mut stops: Vec<(f64, Point2)> = crossings
            .iter()
            .filter(|c| c.walls.0 == id || c.walls.1 == id)
            .map(|c| (distance(&start, &c.point), c.point))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut prev = ensure_node(&mut net.nodes, start, tol);
        for (_, point) in stops {
            let node = ensure_node(&mut net.nodes, point, tol);
            push_edge(&mut net.edges, prev, node, id);
            prev = node;
        }
        let last = ensure_node(&mut net.nodes, end, tol);
        push_edge(&mut net.edges, prev, last, id);
    }

    net.adjacency = vec![Vec::new(); net.nodes.len()];
    for e in &net.edges {
        net.adjacency[e.a].push((e.b, e.wall));
        net.adjacency[e.b].push((e.a, e.wall));
    }
    net
}

fn push_edge(edges: &mut Vec<NetworkEdge>, a: usize, b: usize, wall: WallId) {
    if a != b {
        edges.push(NetworkEdge { a, b, wall });
    }
}

/// Finds or inserts a node, returning its index.
fn ensure_node(nodes: &mut Vec<Point2>, p: Point2, tol: f64) -> usize {
    let tol_sq = tol * tol;
    if let Some(i) = nodes.iter().position(|n| (n - p).norm_squared() < tol_sq) {
        return i;
    }
    nodes.push(p);
    nodes.len() - 1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::WallData;

    fn raw_wall(graph: &mut WallGraph, a: (f64, f64), b: (f64, f64)) {
        let s = graph.add_vertex(Point2::new(a.0, a.1));
        let e = graph.add_vertex(Point2::new(b.0, b.1));
        graph.insert_wall(WallData::new(s, e, 10.0)).unwrap();
    }

    #[test]
    fn hash_pattern_network() {
        let mut graph = WallGraph::new();
        raw_wall(&mut graph, (100.0, 0.0), (100.0, 400.0));
        raw_wall(&mut graph, (0.0, 300.0), (400.0, 300.0));
        raw_wall(&mut graph, (300.0, 0.0), (300.0, 400.0));
        raw_wall(&mut graph, (0.0, 100.0), (400.0, 100.0));

        let net = build_network(&graph, &PlanParams::default());
        // 8 dead ends + 4 crossings, each wall cut into 3 pieces.
        assert_eq!(net.nodes.len(), 12);
        assert_eq!(net.edges.len(), 12);
    }

    #[test]
    fn unwelded_square_shares_nodes() {
        let mut graph = WallGraph::new();
        raw_wall(&mut graph, (0.0, 0.0), (100.0, 0.0));
        raw_wall(&mut graph, (100.0, 0.0), (100.0, 100.0));
        raw_wall(&mut graph, (100.0, 100.0), (0.0, 100.0));
        raw_wall(&mut graph, (0.0, 100.0), (0.0, 0.0));

        let net = build_network(&graph, &PlanParams::default());
        assert_eq!(net.nodes.len(), 4);
        assert_eq!(net.edges.len(), 4);
        assert!(net.adjacency.iter().all(|adj| adj.len() == 2));
    }
}
