//! Minimum spanning trees: Prim (heap-driven) and Kruskal (union-find)
//!
//! Both return `Ok(None)` when the graph has no spanning tree, i.e. it is
//! disconnected, rather than a partial forest. Negative weights are fine here.

use crate::disjoint_set::DisjointSet;
use crate::graph::{check_vertex, WeightedGraph};
use crate::pathfinding::SearchError;
use crate::priority_queue::PriorityQueue;
use crate::traits::{Heap, VertexId, Weight};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// A tree edge `from - to` of the given weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MstEdge<W> {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: W,
}

/// Sum of the edge weights.
pub fn total_weight<W: Weight>(edges: &[MstEdge<W>]) -> W {
    edges
        .iter()
        .fold(W::default(), |acc, e| acc + e.weight)
}

/// Prim's algorithm grown from `start`.
///
/// Edges come out in the order their endpoints join the tree. The graph should
/// be undirected; a directed graph is accepted but only its out-edges are
/// followed.
///
/// # Example
///
/// ```rust
/// use graph_heaps::fibonacci::FibonacciHeap;
/// use graph_heaps::graph::AdjacencyList;
/// use graph_heaps::mst::{prim, total_weight};
///
/// let g = AdjacencyList::from_edges(3, u32::MAX, false, &[(0, 1, 3), (1, 2, 1), (0, 2, 2)]).unwrap();
/// let tree = prim::<_, FibonacciHeap<_>>(&g, 0).unwrap().unwrap();
/// assert_eq!(tree.len(), 2);
/// assert_eq!(total_weight(&tree), 3);
/// ```
pub fn prim<G, H>(graph: &G, start: VertexId) -> Result<Option<Vec<MstEdge<G::Weight>>>, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
{
    let n = graph.size();
    check_vertex(start, n)?;
    if graph.is_directed() {
        warn!("prim called on a directed graph; only out-edges are followed");
    }
    debug!(start, vertices = n, "prim started");

    let mut key = vec![graph.max_weight(); n];
    let mut parent: Vec<Option<VertexId>> = vec![None; n];
    let mut in_tree = vec![false; n];
    let mut tree = Vec::with_capacity(n.saturating_sub(1));

    let mut pq: PriorityQueue<G::Weight, H> = PriorityQueue::with_capacity(n);
    pq.push(start, G::Weight::default())?;

    while !pq.is_empty() && tree.len() + 1 < n {
        let (v, _) = pq.pop()?;
        in_tree[v] = true;
        if let Some(p) = parent[v] {
            tree.push(MstEdge {
                from: p,
                to: v,
                weight: key[v],
            });
        }
        for (u, w) in graph.weighted_neighbors(v)? {
            check_vertex(u, n)?;
            if !in_tree[u] && w < key[u] {
                key[u] = w;
                parent[u] = Some(v);
                pq.push(u, w)?;
            }
        }
    }

    debug!(edges = tree.len(), "prim finished");
    if tree.len() + 1 == n {
        Ok(Some(tree))
    } else {
        Ok(None)
    }
}

/// Kruskal's algorithm: lightest edges first, skipping those that close a cycle.
///
/// An empty graph has no spanning tree.
pub fn kruskal<G>(graph: &G) -> Result<Option<Vec<MstEdge<G::Weight>>>, SearchError>
where
    G: WeightedGraph,
{
    let n = graph.size();
    if n == 0 {
        return Ok(None);
    }
    debug!(vertices = n, "kruskal started");

    let mut edges = graph.edges();
    edges.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut sets = DisjointSet::new(n);
    let mut tree = Vec::with_capacity(n - 1);
    for ((from, to), weight) in edges {
        if tree.len() + 1 == n {
            break;
        }
        if sets.union(from, to)? {
            tree.push(MstEdge { from, to, weight });
        }
    }

    debug!(edges = tree.len(), "kruskal finished");
    if tree.len() + 1 == n {
        Ok(Some(tree))
    } else {
        Ok(None)
    }
}
