//! Connectivity and bipartiteness checks
//!
//! Plain reachability sweeps from vertex 0. The strong check runs the sweep
//! twice, once over the graph and once over [`WeightedGraph::transpose`]: a
//! directed graph is strongly connected exactly when every vertex is reachable
//! from 0 and 0 is reachable from every vertex. An empty graph is neither
//! connected nor bipartite.

use crate::graph::{check_vertex, GraphError, WeightedGraph};
use crate::traits::VertexId;
use std::collections::VecDeque;
use tracing::debug;

/// Marks every vertex reachable from `start` along out-edges of `graph`, and
/// also along out-edges of `reverse` when given.
fn sweep<G: WeightedGraph>(
    graph: &G,
    reverse: Option<&G>,
    start: VertexId,
) -> Result<Vec<bool>, GraphError> {
    let n = graph.size();
    let mut seen = vec![false; n];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(start);

    while let Some(u) = queue.pop_front() {
        let mut next = graph.weighted_neighbors(u)?;
        if let Some(reverse) = reverse {
            next.extend(reverse.weighted_neighbors(u)?);
        }
        for (v, _) in next {
            check_vertex(v, n)?;
            if !seen[v] {
                seen[v] = true;
                queue.push_back(v);
            }
        }
    }
    Ok(seen)
}

/// Whether every vertex is reachable from every other when edge directions
/// are ignored.
///
/// # Example
///
/// ```rust
/// use graph_heaps::connectivity::{is_strongly_connected, is_weakly_connected};
/// use graph_heaps::graph::AdjacencyList;
///
/// let g = AdjacencyList::from_edges(3, u32::MAX, true, &[(0, 1, 1), (2, 1, 1)]).unwrap();
/// assert!(is_weakly_connected(&g).unwrap());
/// assert!(!is_strongly_connected(&g).unwrap());
/// ```
pub fn is_weakly_connected<G: WeightedGraph>(graph: &G) -> Result<bool, GraphError> {
    if graph.size() == 0 {
        return Ok(false);
    }
    let connected = if graph.is_directed() {
        let reverse = graph.transpose();
        sweep(graph, Some(&reverse), 0)?.into_iter().all(|s| s)
    } else {
        sweep(graph, None, 0)?.into_iter().all(|s| s)
    };
    debug!(vertices = graph.size(), connected, "weak connectivity checked");
    Ok(connected)
}

/// Whether every vertex is reachable from every other along edge directions.
/// For undirected graphs this is plain connectivity.
pub fn is_strongly_connected<G: WeightedGraph>(graph: &G) -> Result<bool, GraphError> {
    if graph.size() == 0 {
        return Ok(false);
    }
    let mut connected = sweep(graph, None, 0)?.into_iter().all(|s| s);
    if connected && graph.is_directed() {
        let reverse = graph.transpose();
        connected = sweep(&reverse, None, 0)?.into_iter().all(|s| s);
    }
    debug!(vertices = graph.size(), connected, "strong connectivity checked");
    Ok(connected)
}

/// Whether the vertices split into two sides with every edge crossing between
/// them. Directed edges are treated as undirected, and a self-loop rules
/// bipartiteness out.
///
/// ```rust
/// use graph_heaps::connectivity::is_bipartite;
/// use graph_heaps::graph::AdjacencyList;
///
/// let square = AdjacencyList::from_edges(4, 9, false, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]).unwrap();
/// let triangle = AdjacencyList::from_edges(3, 9, false, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
/// assert!(is_bipartite(&square).unwrap());
/// assert!(!is_bipartite(&triangle).unwrap());
/// ```
pub fn is_bipartite<G: WeightedGraph>(graph: &G) -> Result<bool, GraphError> {
    let n = graph.size();
    if n == 0 {
        return Ok(false);
    }
    let reverse = graph.is_directed().then(|| graph.transpose());

    // 0 = uncoloured, otherwise side 1 or 2
    let mut side = vec![0u8; n];
    let mut queue = VecDeque::new();
    for start in 0..n {
        if side[start] != 0 {
            continue;
        }
        side[start] = 1;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            let mut next = graph.weighted_neighbors(u)?;
            if let Some(reverse) = &reverse {
                next.extend(reverse.weighted_neighbors(u)?);
            }
            for (v, _) in next {
                check_vertex(v, n)?;
                if side[v] == 0 {
                    side[v] = 3 - side[u];
                    queue.push_back(v);
                } else if side[v] == side[u] {
                    debug!(from = u, to = v, "odd cycle found");
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}
