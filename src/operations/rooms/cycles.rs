use super::network::RoomNetwork;

/// Enumerates simple cycles of the network with at most `max_len` vertices.
///
/// Each search starts at one vertex and only walks through higher-numbered
/// vertices, so every cycle is reported once per direction. A cycle is
/// recorded when the walk returns to its start after more than two vertices.
#[must_use]
pub fn enumerate_cycles(net: &RoomNetwork, max_len: usize) -> Vec<Vec<usize>> {
    let mut cycles = Vec::new();
    let mut on_path = vec![false; net.nodes.len()];
    let mut path = Vec::with_capacity(max_len);

    for start in 0..net.nodes.len() {
        path.push(start);
        on_path[start] = true;
        walk(net, start, start, max_len, &mut path, &mut on_path, &mut cycles);
        on_path[start] = false;
        path.clear();
    }
    cycles
}

fn walk(
    net: &RoomNetwork,
    start: usize,
    current: usize,
    max_len: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    cycles: &mut Vec<Vec<usize>>,
) {
    for &(next, _) in &net.adjacency[current] {
        if next == start {
            if path.len() > 2 {
                cycles.push(path.clone());
            }
            continue;
        }
        if next < start || on_path[next] || path.len() >= max_len {
            continue;
        }
        path.push(next);
        on_path[next] = true;
        walk(net, start, next, max_len, path, on_path, cycles);
        on_path[next] = false;
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::operations::rooms::network::NetworkEdge;
    use crate::topology::WallId;

    fn ring(n: usize) -> RoomNetwork {
        let mut net = RoomNetwork {
            nodes: vec![Point2::origin(); n],
            ..RoomNetwork::default()
        };
        for i in 0..n {
            net.edges.push(NetworkEdge {
                a: i,
                b: (i + 1) % n,
                wall: WallId::default(),
            });
        }
        net.adjacency = vec![Vec::new(); n];
        for e in &net.edges {
            net.adjacency[e.a].push((e.b, e.wall));
            net.adjacency[e.b].push((e.a, e.wall));
        }
        net
    }

    #[test]
    fn square_ring_found_in_both_directions() {
        let cycles = enumerate_cycles(&ring(4), 8);
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().all(|c| c.len() == 4 && c[0] == 0));
    }

    #[test]
    fn long_ring_exceeds_bound() {
        assert!(enumerate_cycles(&ring(9), 8).is_empty());
        assert_eq!(enumerate_cycles(&ring(8), 8).len(), 2);
    }

    #[test]
    fn open_chain_has_no_cycles() {
        let mut net = ring(4);
        net.edges.pop();
        net.adjacency = vec![Vec::new(); 4];
        for e in &net.edges {
            net.adjacency[e.a].push((e.b, e.wall));
            net.adjacency[e.b].push((e.a, e.wall));
        }
        assert!(enumerate_cycles(&net, 8).is_empty());
    }
}
