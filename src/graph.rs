//! The graph interface the searches consume, plus a reference adjacency list
//!
//! Searches only need to ask a graph for its size, its "infinite" weight, and
//! the weighted neighbours of a vertex. Any storage that can answer those
//! implements [`WeightedGraph`]; [`AdjacencyList`] is a small, unoptimized
//! implementation for tests and examples.

use crate::traits::{VertexId, Weight};
use thiserror::Error;

/// Precondition violations reported by graph queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {vertex} is out of range for a graph of {size} vertices")]
    VertexOutOfRange { vertex: VertexId, size: usize },
}

/// An edge `((from, to), weight)`.
pub type Edge<W> = ((VertexId, VertexId), W);

/// Weighted graph collaborator used by the searches.
pub trait WeightedGraph {
    type Weight: Weight;

    /// Number of vertices; ids are `0..size()`.
    fn size(&self) -> usize;

    fn is_directed(&self) -> bool;

    /// Sentinel used as "no edge" and "infinite distance".
    fn max_weight(&self) -> Self::Weight;

    /// Out-neighbours of `vertex` with edge weights.
    fn weighted_neighbors(
        &self,
        vertex: VertexId,
    ) -> Result<Vec<(VertexId, Self::Weight)>, GraphError>;

    /// Every edge once. Undirected graphs report each edge as `(u, v)` with `u <= v`.
    fn edges(&self) -> Vec<Edge<Self::Weight>>;

    /// The graph with every edge reversed.
    fn transpose(&self) -> Self
    where
        Self: Sized;
}

/// Returns `VertexOutOfRange` unless `vertex < size`.
pub fn check_vertex(vertex: VertexId, size: usize) -> Result<(), GraphError> {
    if vertex < size {
        Ok(())
    } else {
        Err(GraphError::VertexOutOfRange { vertex, size })
    }
}

/// Weighted adjacency-list graph, directed or undirected.
///
/// # Example
///
/// ```rust
/// use graph_heaps::graph::{AdjacencyList, WeightedGraph};
///
/// let mut g = AdjacencyList::undirected(3, u32::MAX);
/// g.add_edge(0, 1, 4).unwrap();
/// g.add_edge(1, 2, 1).unwrap();
///
/// assert_eq!(g.weighted_neighbors(1).unwrap(), vec![(0, 4), (2, 1)]);
/// assert_eq!(g.weight(0, 2), u32::MAX);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyList<W> {
    adjacency: Vec<Vec<(VertexId, W)>>,
    directed: bool,
    max: W,
}

impl<W: Weight> AdjacencyList<W> {
    pub fn directed(size: usize, max: W) -> Self {
        Self::with_direction(size, max, true)
    }

    pub fn undirected(size: usize, max: W) -> Self {
        Self::with_direction(size, max, false)
    }

    fn with_direction(size: usize, max: W, directed: bool) -> Self {
        AdjacencyList {
            adjacency: vec![Vec::new(); size],
            directed,
            max,
        }
    }

    /// Builds a graph from an edge list.
    pub fn from_edges(
        size: usize,
        max: W,
        directed: bool,
        edges: &[(VertexId, VertexId, W)],
    ) -> Result<Self, GraphError> {
        let mut g = Self::with_direction(size, max, directed);
        for &(u, v, w) in edges {
            g.add_edge(u, v, w)?;
        }
        Ok(g)
    }

    /// Appends an isolated vertex and returns its id.
    pub fn add_vertex(&mut self) -> VertexId {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Adds `from -> to` (and `to -> from` when undirected). Parallel edges are kept.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: W) -> Result<(), GraphError> {
        let size = self.adjacency.len();
        check_vertex(from, size)?;
        check_vertex(to, size)?;
        self.adjacency[from].push((to, weight));
        if !self.directed && from != to {
            self.adjacency[to].push((from, weight));
        }
        Ok(())
    }

    /// Lightest edge weight `from -> to`, or the max sentinel if none.
    pub fn weight(&self, from: VertexId, to: VertexId) -> W {
        let mut best = self.max;
        if let Some(list) = self.adjacency.get(from) {
            for &(v, w) in list {
                if v == to && w < best {
                    best = w;
                }
            }
        }
        best
    }

    pub fn edge_count(&self) -> usize {
        let arcs: usize = self.adjacency.iter().map(Vec::len).sum();
        if self.directed {
            arcs
        } else {
            let loops = self
                .adjacency
                .iter()
                .enumerate()
                .map(|(u, list)| list.iter().filter(|(v, _)| *v == u).count())
                .sum::<usize>();
            (arcs - loops) / 2 + loops
        }
    }
}

impl<W: Weight> WeightedGraph for AdjacencyList<W> {
    type Weight = W;

    fn size(&self) -> usize {
        self.adjacency.len()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn max_weight(&self) -> W {
        self.max
    }

    fn weighted_neighbors(&self, vertex: VertexId) -> Result<Vec<(VertexId, W)>, GraphError> {
        check_vertex(vertex, self.adjacency.len())?;
        Ok(self.adjacency[vertex].clone())
    }

    fn edges(&self) -> Vec<Edge<W>> {
        let mut edges = Vec::new();
        for (u, list) in self.adjacency.iter().enumerate() {
            for &(v, w) in list {
                if self.directed || u <= v {
                    edges.push(((u, v), w));
                }
            }
        }
        edges
    }

    fn transpose(&self) -> Self {
        if !self.directed {
            return self.clone();
        }
        let mut t = Self::with_direction(self.adjacency.len(), self.max, true);
        for (u, list) in self.adjacency.iter().enumerate() {
            for &(v, w) in list {
                t.adjacency[v].push((u, w));
            }
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range() {
        let mut g = AdjacencyList::directed(2, i32::MAX);
        assert_eq!(
            g.add_edge(0, 2, 1),
            Err(GraphError::VertexOutOfRange { vertex: 2, size: 2 })
        );
        assert!(g.weighted_neighbors(7).is_err());
        let v = g.add_vertex();
        assert_eq!(v, 2);
        assert!(g.add_edge(0, 2, 1).is_ok());
    }

    #[test]
    fn test_undirected_edges_listed_once() {
        let g = AdjacencyList::from_edges(3, 100, false, &[(0, 1, 5), (2, 1, 3), (2, 2, 1)]).unwrap();
        let mut edges = g.edges();
        edges.sort();
        assert_eq!(edges, vec![((0, 1), 5), ((1, 2), 3), ((2, 2), 1)]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_weight_picks_lightest_parallel_edge() {
        let g = AdjacencyList::from_edges(2, 100, true, &[(0, 1, 9), (0, 1, 4)]).unwrap();
        assert_eq!(g.weight(0, 1), 4);
        assert_eq!(g.weight(1, 0), 100);
    }

    #[test]
    fn test_transpose() {
        let g = AdjacencyList::from_edges(3, 100, true, &[(0, 1, 2), (1, 2, 3)]).unwrap();
        let t = g.transpose();
        assert_eq!(t.weighted_neighbors(2).unwrap(), vec![(1, 3)]);
        assert_eq!(t.weighted_neighbors(1).unwrap(), vec![(0, 2)]);
        assert!(t.weighted_neighbors(0).unwrap().is_empty());
    }
}
