//! Dijkstra's and A* shortest-path searches over any heap backend
//!
//! Every search here is one loop: pop the vertex with the smallest tentative
//! priority, settle it, and relax its out-edges by pushing improved priorities
//! back through a [`PriorityQueue`]. Because the queue turns a repeated push
//! into `decrease_key`, each vertex has at most one live heap entry and the
//! heap stays at most `size()` large.
//!
//! Dijkstra and A* are the same loop: A* adds a heuristic `h(v)` to the
//! pushed priority while `distance[]` keeps tracking the true cost `g(v)`.
//!
//! Edge weights must be non-negative; a negative weight found while relaxing
//! aborts the search with [`SearchError::NegativeWeight`]. Vertices the search
//! never settles report the graph's `max_weight()` sentinel, and so do
//! vertices whose only paths cost more than the weight type can hold.
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::fibonacci::FibonacciHeap;
//! use graph_heaps::graph::AdjacencyList;
//! use graph_heaps::pathfinding::{dijkstra, dijkstra_path};
//!
//! let g = AdjacencyList::from_edges(
//!     4,
//!     u32::MAX,
//!     true,
//!     &[(0, 1, 1), (0, 2, 4), (1, 2, 1), (1, 3, 5), (2, 3, 1)],
//! )
//! .unwrap();
//!
//! assert_eq!(dijkstra::<_, FibonacciHeap<_>>(&g, 0, 3).unwrap(), 3);
//! let path = dijkstra_path::<_, FibonacciHeap<_>>(&g, 0, 3).unwrap().unwrap();
//! assert_eq!(path.vertices, vec![0, 1, 2, 3]);
//! ```

use crate::graph::{check_vertex, GraphError, WeightedGraph};
use crate::priority_queue::PriorityQueue;
use crate::traits::{Heap, HeapError, VertexId, Weight};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that abort a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error("edge {from} -> {to} has a negative weight")]
    NegativeWeight { from: VertexId, to: VertexId },
}

/// A shortest path: `vertices` runs from the source to the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<W> {
    pub vertices: Vec<VertexId>,
    pub cost: W,
}

type Accept<'g, W> = Box<dyn Fn(VertexId, W) -> bool + 'g>;
type Heuristic<'g, W> = Box<dyn Fn(VertexId) -> W + 'g>;

/// Builder for shortest-path queries with more configuration options.
///
/// ```rust
/// use graph_heaps::binary::BinaryHeap;
/// use graph_heaps::graph::AdjacencyList;
/// use graph_heaps::pathfinding::ShortestPaths;
///
/// let g = AdjacencyList::from_edges(3, u64::MAX, true, &[(0, 1, 2), (1, 2, 2), (0, 2, 9)]).unwrap();
///
/// // Forbid entering vertex 1.
/// let d = ShortestPaths::new(&g, 0)
///     .accept(|v, _| v != 1)
///     .distance::<BinaryHeap<_>>(2)
///     .unwrap();
/// assert_eq!(d, 9);
/// ```
pub struct ShortestPaths<'g, G: WeightedGraph> {
    graph: &'g G,
    source: VertexId,
    accept: Option<Accept<'g, G::Weight>>,
    heuristic: Option<Heuristic<'g, G::Weight>>,
    max_cost: Option<G::Weight>,
    max_settled: Option<usize>,
}

/// What a finished run knows about each vertex.
struct Settled<W> {
    distance: Vec<W>,
    previous: Vec<Option<VertexId>>,
    visited: Vec<bool>,
}

impl<W: Copy> Settled<W> {
    fn distance_or(&self, vertex: VertexId, max: W) -> W {
        if self.visited[vertex] {
            self.distance[vertex]
        } else {
            max
        }
    }
}

impl<'g, G: WeightedGraph> ShortestPaths<'g, G> {
    pub fn new(graph: &'g G, source: VertexId) -> Self {
        ShortestPaths {
            graph,
            source,
            accept: None,
            heuristic: None,
            max_cost: None,
            max_settled: None,
        }
    }

    /// Only relax into `v` at tentative cost `d` when `accept(v, d)` holds.
    pub fn accept(mut self, accept: impl Fn(VertexId, G::Weight) -> bool + 'g) -> Self {
        self.accept = Some(Box::new(accept));
        self
    }

    /// Turns the search into A*. The heuristic must never overestimate.
    pub fn heuristic(mut self, heuristic: impl Fn(VertexId) -> G::Weight + 'g) -> Self {
        self.heuristic = Some(Box::new(heuristic));
        self
    }

    /// Sets the maximum cost to explore.
    pub fn max_cost(mut self, cost: G::Weight) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Sets the maximum number of vertices to settle.
    pub fn max_settled(mut self, count: usize) -> Self {
        self.max_settled = Some(count);
        self
    }

    /// Distance to `destination`, or `max_weight()` if it is not reached.
    pub fn distance<H>(self, destination: VertexId) -> Result<G::Weight, SearchError>
    where
        H: Heap<G::Weight>,
    {
        let max = self.graph.max_weight();
        let run = self.run::<H>(Some(std::slice::from_ref(&destination)))?;
        Ok(run.distance_or(destination, max))
    }

    /// Shortest path to `destination`, or `None` if it is not reached.
    pub fn path<H>(self, destination: VertexId) -> Result<Option<Path<G::Weight>>, SearchError>
    where
        H: Heap<G::Weight>,
    {
        let run = self.run::<H>(Some(std::slice::from_ref(&destination)))?;
        if !run.visited[destination] {
            return Ok(None);
        }
        let mut vertices = vec![destination];
        let mut current = destination;
        while let Some(prev) = run.previous[current] {
            vertices.push(prev);
            current = prev;
        }
        vertices.reverse();
        Ok(Some(Path {
            vertices,
            cost: run.distance[destination],
        }))
    }

    /// Distances to each of `destinations` (duplicates collapse). The search
    /// stops as soon as all of them are settled.
    pub fn distances_to<H>(
        self,
        destinations: &[VertexId],
    ) -> Result<FxHashMap<VertexId, G::Weight>, SearchError>
    where
        H: Heap<G::Weight>,
    {
        let mut result = FxHashMap::default();
        if destinations.is_empty() {
            check_vertex(self.source, self.graph.size())?;
            return Ok(result);
        }
        let max = self.graph.max_weight();
        let run = self.run::<H>(Some(destinations))?;
        for &v in destinations {
            result.insert(v, run.distance_or(v, max));
        }
        Ok(result)
    }

    /// Distance to every vertex, indexed by vertex id.
    pub fn all<H>(self) -> Result<Vec<G::Weight>, SearchError>
    where
        H: Heap<G::Weight>,
    {
        let max = self.graph.max_weight();
        let run = self.run::<H>(None)?;
        Ok((0..run.visited.len()).map(|v| run.distance_or(v, max)).collect())
    }

    /// Internal search implementation. `targets == None` settles everything reachable.
    fn run<H>(self, targets: Option<&[VertexId]>) -> Result<Settled<G::Weight>, SearchError>
    where
        H: Heap<G::Weight>,
    {
        let graph = self.graph;
        let n = graph.size();
        check_vertex(self.source, n)?;

        let mut pending = vec![false; n];
        let mut remaining = 0usize;
        if let Some(targets) = targets {
            for &t in targets {
                check_vertex(t, n)?;
                if !pending[t] {
                    pending[t] = true;
                    remaining += 1;
                }
            }
        }

        let zero = G::Weight::default();
        let max = graph.max_weight();
        let h = |v: VertexId| match &self.heuristic {
            Some(heuristic) => heuristic(v),
            None => zero,
        };

        let mut state = Settled {
            distance: vec![max; n],
            previous: vec![None; n],
            visited: vec![false; n],
        };
        state.distance[self.source] = zero;

        let mut pq: PriorityQueue<G::Weight, H> = PriorityQueue::with_capacity(n);
        pq.push(self.source, h(self.source))?;
        let mut settled = 0usize;

        debug!(source = self.source, vertices = n, targets = remaining, "search started");

        while !pq.is_empty() {
            let (u, _) = pq.pop()?;
            state.visited[u] = true;
            settled += 1;
            trace!(vertex = u, settled, "vertex settled");

            if pending[u] {
                pending[u] = false;
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
            if self.max_settled.is_some_and(|limit| settled >= limit) {
                break;
            }

            let d = state.distance[u];
            for (v, w) in graph.weighted_neighbors(u)? {
                check_vertex(v, n)?;
                if w < zero {
                    return Err(SearchError::NegativeWeight { from: u, to: v });
                }
                if state.visited[v] {
                    continue;
                }
                let Some(tentative) = d.checked_add(w) else {
                    trace!(from = u, to = v, "path cost overflows; edge skipped");
                    continue;
                };
                if !(tentative < state.distance[v]) {
                    continue;
                }
                if self.max_cost.is_some_and(|limit| tentative > limit) {
                    continue;
                }
                if let Some(accept) = &self.accept {
                    if !accept(v, tentative) {
                        continue;
                    }
                }
                state.distance[v] = tentative;
                state.previous[v] = Some(u);

                let priority = tentative.checked_add(h(v)).unwrap_or(max);
                match pq.priority(v) {
                    // g dropped but g + h rounded to the queued value
                    Some(queued) if !(priority < queued) => {}
                    _ => pq.push(v, priority)?,
                }
            }
        }

        debug!(source = self.source, settled, "search finished");
        Ok(state)
    }
}

/// Distance from `source` to `destination`, `max_weight()` if unreachable.
///
/// # Example
///
/// ```rust
/// use graph_heaps::binomial::BinomialHeap;
/// use graph_heaps::graph::AdjacencyList;
/// use graph_heaps::pathfinding::dijkstra;
///
/// let mut g = AdjacencyList::directed(3, i32::MAX);
/// g.add_edge(0, 1, 7).unwrap();
///
/// assert_eq!(dijkstra::<_, BinomialHeap<_>>(&g, 0, 1).unwrap(), 7);
/// assert_eq!(dijkstra::<_, BinomialHeap<_>>(&g, 0, 2).unwrap(), i32::MAX);
/// ```
pub fn dijkstra<G, H>(graph: &G, source: VertexId, destination: VertexId) -> Result<G::Weight, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
{
    ShortestPaths::new(graph, source).distance::<H>(destination)
}

/// [`dijkstra`] that only relaxes into `v` at cost `d` when `accept(v, d)` holds.
pub fn dijkstra_filtered<'g, G, H, F>(
    graph: &'g G,
    source: VertexId,
    destination: VertexId,
    accept: F,
) -> Result<G::Weight, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
    F: Fn(VertexId, G::Weight) -> bool + 'g,
{
    ShortestPaths::new(graph, source)
        .accept(accept)
        .distance::<H>(destination)
}

/// Shortest path from `source` to `destination`, `None` if unreachable.
pub fn dijkstra_path<G, H>(
    graph: &G,
    source: VertexId,
    destination: VertexId,
) -> Result<Option<Path<G::Weight>>, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
{
    ShortestPaths::new(graph, source).path::<H>(destination)
}

/// Distances to a set of destinations.
pub fn dijkstra_many<G, H>(
    graph: &G,
    source: VertexId,
    destinations: &[VertexId],
) -> Result<FxHashMap<VertexId, G::Weight>, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
{
    ShortestPaths::new(graph, source).distances_to::<H>(destinations)
}

/// Distances from `source` to every vertex.
pub fn dijkstra_all<G, H>(graph: &G, source: VertexId) -> Result<Vec<G::Weight>, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
{
    ShortestPaths::new(graph, source).all::<H>()
}

/// A* distance; `heuristic` must be admissible for the result to be optimal.
pub fn astar<'g, G, H, F>(
    graph: &'g G,
    source: VertexId,
    destination: VertexId,
    heuristic: F,
) -> Result<G::Weight, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
    F: Fn(VertexId) -> G::Weight + 'g,
{
    ShortestPaths::new(graph, source)
        .heuristic(heuristic)
        .distance::<H>(destination)
}

/// A* path; `None` if `destination` is unreachable.
pub fn astar_path<'g, G, H, F>(
    graph: &'g G,
    source: VertexId,
    destination: VertexId,
    heuristic: F,
) -> Result<Option<Path<G::Weight>>, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
    F: Fn(VertexId) -> G::Weight + 'g,
{
    ShortestPaths::new(graph, source)
        .heuristic(heuristic)
        .path::<H>(destination)
}

/// Every vertex whose distance from `source` is at most `max_cost`, nearest
/// first.
pub fn reachable_within<G, H>(
    graph: &G,
    source: VertexId,
    max_cost: G::Weight,
) -> Result<Vec<(VertexId, G::Weight)>, SearchError>
where
    G: WeightedGraph,
    H: Heap<G::Weight>,
{
    let max = graph.max_weight();
    let distances = ShortestPaths::new(graph, source)
        .max_cost(max_cost)
        .all::<H>()?;
    let mut reached: Vec<(VertexId, G::Weight)> = distances
        .into_iter()
        .enumerate()
        .filter(|&(v, d)| v == source || d != max)
        .collect();
    reached.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(reached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryHeap;
    use crate::fibonacci::FibonacciHeap;
    use crate::graph::AdjacencyList;

    /// 0 - 1 - 2 - ... - (n-1), unit weights, undirected
    fn line(n: usize) -> AdjacencyList<u32> {
        let mut g = AdjacencyList::undirected(n, u32::MAX);
        for v in 1..n {
            g.add_edge(v - 1, v, 1).unwrap();
        }
        g
    }

    #[test]
    fn test_builder_max_cost() {
        let g = line(11);
        let d = ShortestPaths::new(&g, 0)
            .max_cost(3)
            .distance::<FibonacciHeap<_>>(10)
            .unwrap();
        assert_eq!(d, u32::MAX);
    }

    #[test]
    fn test_builder_max_settled() {
        let g = line(11);
        let all = ShortestPaths::new(&g, 0)
            .max_settled(5)
            .all::<FibonacciHeap<_>>()
            .unwrap();
        assert_eq!(&all[..5], &[0, 1, 2, 3, 4]);
        // The search stopped after settling vertex 4.
        assert_eq!(all[5], u32::MAX);
    }

    #[test]
    fn test_builder_success_within_limits() {
        let g = line(6);
        let d = ShortestPaths::new(&g, 0)
            .max_cost(10)
            .max_settled(20)
            .distance::<BinaryHeap<_>>(5)
            .unwrap();
        assert_eq!(d, 5);
    }

    #[test]
    fn test_reachable_within() {
        let g = line(10);
        let reached = reachable_within::<_, FibonacciHeap<_>>(&g, 4, 2).unwrap();
        let mut vertices: Vec<_> = reached.iter().map(|&(v, _)| v).collect();
        vertices.sort();
        assert_eq!(vertices, vec![2, 3, 4, 5, 6]);
        assert_eq!(reached[0], (4, 0));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let g = AdjacencyList::from_edges(3, i32::MAX, true, &[(0, 1, 2), (1, 2, -1)]).unwrap();
        assert_eq!(
            dijkstra::<_, BinaryHeap<_>>(&g, 0, 2),
            Err(SearchError::NegativeWeight { from: 1, to: 2 })
        );
    }

    #[test]
    fn test_overflowing_path_is_unreachable() {
        let g = AdjacencyList::from_edges(3, u32::MAX, true, &[(0, 1, 3_000_000_000), (1, 2, 3_000_000_000)])
            .unwrap();
        assert_eq!(dijkstra::<_, BinaryHeap<_>>(&g, 0, 1).unwrap(), 3_000_000_000);
        assert_eq!(dijkstra::<_, BinaryHeap<_>>(&g, 0, 2).unwrap(), u32::MAX);
        assert_eq!(dijkstra_path::<_, FibonacciHeap<_>>(&g, 0, 2).unwrap(), None);
    }

    #[test]
    fn test_overflow_skips_only_the_long_route() {
        let g = AdjacencyList::from_edges(
            4,
            u32::MAX,
            true,
            &[(0, 1, 3_000_000_000), (1, 3, 3_000_000_000), (0, 2, 5), (2, 3, 5)],
        )
        .unwrap();
        assert_eq!(dijkstra::<_, BinaryHeap<_>>(&g, 0, 3).unwrap(), 10);
    }

    #[test]
    fn test_astar_priority_overflow_still_finds_path() {
        // Dead end 2: g(2) fits in u32 but g(2) + h(2) does not.
        let g = AdjacencyList::from_edges(3, u32::MAX, true, &[(0, 2, 4_000_000_000), (0, 1, 10)]).unwrap();
        let d = astar::<_, BinaryHeap<_>, _>(&g, 0, 1, |v| if v == 2 { 1_000_000_000 } else { 0 }).unwrap();
        assert_eq!(d, 10);
        let all = ShortestPaths::new(&g, 0)
            .heuristic(|v| if v == 2 { 1_000_000_000 } else { 0 })
            .all::<FibonacciHeap<_>>()
            .unwrap();
        assert_eq!(all, vec![0, 10, 4_000_000_000]);
    }

    #[test]
    fn test_out_of_range_reported_before_search() {
        let g = line(3);
        assert_eq!(
            dijkstra::<_, BinaryHeap<_>>(&g, 0, 3),
            Err(SearchError::Graph(GraphError::VertexOutOfRange { vertex: 3, size: 3 }))
        );
        assert!(dijkstra_all::<_, BinaryHeap<_>>(&g, 9).is_err());
    }

    #[test]
    fn test_float_weights_with_heuristic() {
        let g = AdjacencyList::from_edges(
            3,
            f64::INFINITY,
            false,
            &[(0, 1, 0.5), (1, 2, 0.25), (0, 2, 1.0)],
        )
        .unwrap();
        let d = astar::<_, FibonacciHeap<_>, _>(&g, 0, 2, |v| if v == 2 { 0.0 } else { 0.1 }).unwrap();
        assert_eq!(d, 0.75);
    }
}
