//! Shortest paths by repeated edge relaxation
//!
//! Bellman-Ford (single source) and Floyd-Warshall (all pairs) need no heap
//! and, unlike [`crate::pathfinding`], accept negative edge weights. Both
//! return `Ok(None)` when a negative cycle makes shortest paths undefined.
//! In an undirected graph every negative edge is such a cycle.
//!
//! As in the heap-driven searches, `max_weight()` marks unreachable pairs and
//! a sum that overflows the weight type is never taken as an improvement.

use crate::graph::{check_vertex, WeightedGraph};
use crate::pathfinding::SearchError;
use crate::traits::{VertexId, Weight};
use tracing::debug;

/// Distances from `source` to every vertex, or `None` if a negative cycle is
/// reachable from `source`.
///
/// # Example
///
/// ```rust
/// use graph_heaps::graph::AdjacencyList;
/// use graph_heaps::relaxation::bellman_ford;
///
/// let g = AdjacencyList::from_edges(3, i32::MAX, true, &[(0, 1, 4), (0, 2, 1), (2, 1, -2)]).unwrap();
/// assert_eq!(bellman_ford(&g, 0).unwrap(), Some(vec![0, -1, 1]));
/// ```
pub fn bellman_ford<G: WeightedGraph>(
    graph: &G,
    source: VertexId,
) -> Result<Option<Vec<G::Weight>>, SearchError> {
    let n = graph.size();
    check_vertex(source, n)?;
    let max = graph.max_weight();

    let mut distance = vec![max; n];
    distance[source] = G::Weight::default();

    let mut rounds = 0usize;
    for _ in 1..n {
        rounds += 1;
        if !relax_all(graph, &mut distance)? {
            break;
        }
    }
    // One more improving round means a cycle keeps lowering costs.
    if relax_all(graph, &mut distance)? {
        debug!(source, rounds, "bellman-ford found a negative cycle");
        return Ok(None);
    }
    debug!(source, rounds, "bellman-ford finished");
    Ok(Some(distance))
}

/// One pass over every edge out of a reached vertex. Returns whether any
/// distance dropped.
fn relax_all<G: WeightedGraph>(graph: &G, distance: &mut [G::Weight]) -> Result<bool, SearchError> {
    let n = distance.len();
    let max = graph.max_weight();
    let mut changed = false;
    for u in 0..n {
        if distance[u] == max {
            continue;
        }
        for (v, w) in graph.weighted_neighbors(u)? {
            check_vertex(v, n)?;
            if let Some(candidate) = distance[u].checked_add(w) {
                if candidate < distance[v] {
                    distance[v] = candidate;
                    changed = true;
                }
            }
        }
    }
    Ok(changed)
}

/// Distance matrix `d[from][to]` for every pair, or `None` if the graph has a
/// negative cycle.
///
/// O(n³) time and O(n²) memory.
///
/// ```rust
/// use graph_heaps::graph::AdjacencyList;
/// use graph_heaps::relaxation::floyd_warshall;
///
/// let g = AdjacencyList::from_edges(3, u32::MAX, true, &[(0, 1, 2), (1, 2, 3)]).unwrap();
/// let d = floyd_warshall(&g).unwrap().unwrap();
/// assert_eq!(d[0], vec![0, 2, 5]);
/// assert_eq!(d[2], vec![u32::MAX, u32::MAX, 0]);
/// ```
pub fn floyd_warshall<G: WeightedGraph>(graph: &G) -> Result<Option<Vec<Vec<G::Weight>>>, SearchError> {
    let n = graph.size();
    let max = graph.max_weight();
    let zero = G::Weight::default();

    let mut d = vec![vec![max; n]; n];
    for (u, row) in d.iter_mut().enumerate() {
        row[u] = zero;
        for (v, w) in graph.weighted_neighbors(u)? {
            check_vertex(v, n)?;
            if w < row[v] {
                row[v] = w;
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            let through = d[i][k];
            if through == max {
                continue;
            }
            for j in 0..n {
                let tail = d[k][j];
                if tail == max {
                    continue;
                }
                if let Some(candidate) = through.checked_add(tail) {
                    if candidate < d[i][j] {
                        d[i][j] = candidate;
                    }
                }
            }
        }
    }

    if let Some(v) = (0..n).find(|&v| d[v][v] < zero) {
        debug!(vertex = v, "floyd-warshall found a negative cycle");
        return Ok(None);
    }
    debug!(vertices = n, "floyd-warshall finished");
    Ok(Some(d))
}
