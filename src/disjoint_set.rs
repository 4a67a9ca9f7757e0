//! Union-find over dense vertex ids, with path compression and union by rank.

use crate::graph::{check_vertex, GraphError};
use crate::rank::{checked_increment, Rank};
use crate::traits::VertexId;

/// Disjoint-set forest.
///
/// # Example
///
/// ```rust
/// use graph_heaps::disjoint_set::DisjointSet;
///
/// let mut ds = DisjointSet::new(4);
/// assert!(ds.union(0, 1).unwrap());
/// assert!(!ds.union(1, 0).unwrap());
/// assert!(ds.same_set(0, 1).unwrap());
/// assert_eq!(ds.set_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<VertexId>,
    rank: Vec<Rank>,
    sets: usize,
}

impl DisjointSet {
    /// `n` singleton sets `{0}, {1}, ..., {n-1}`.
    pub fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Representative of `v`'s set. Compresses the path it walks.
    pub fn find(&mut self, v: VertexId) -> Result<VertexId, GraphError> {
        check_vertex(v, self.parent.len())?;
        let mut root = v;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = v;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        Ok(root)
    }

    /// Merges the sets of `a` and `b`. Returns false if they were already one set.
    pub fn union(&mut self, a: VertexId, b: VertexId) -> Result<bool, GraphError> {
        let ra = self.find(a)?;
        let rb = self.find(b)?;
        if ra == rb {
            return Ok(false);
        }
        let (low, high) = if self.rank[ra] < self.rank[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[low] = high;
        if self.rank[low] == self.rank[high] {
            self.rank[high] = checked_increment(self.rank[high]);
        }
        self.sets -= 1;
        Ok(true)
    }

    pub fn same_set(&mut self, a: VertexId, b: VertexId) -> Result<bool, GraphError> {
        Ok(self.find(a)? == self.find(b)?)
    }
}
