//! Decrease-key heaps and the graph searches built on them
//!
//! This crate provides three interchangeable min-heaps with handle-based
//! `decrease_key` and union, and the shortest-path and spanning-tree
//! algorithms whose running time depends on them.
//!
//! # Features
//!
//! - **Binary Heap**: O(log n) insert, extract_min and decrease_key
//! - **Binomial Heap**: O(log n) insert, extract_min, decrease_key and merge
//! - **Fibonacci Heap**: O(1) insert and merge; O(1) amortized decrease_key; O(log n) amortized extract_min
//! - **Searches**: Dijkstra (single target, path, target set, all vertices, filtered), A*, Prim, Kruskal
//! - **Relaxation**: Bellman-Ford and Floyd-Warshall for graphs with negative weights
//! - **Structure checks**: weak and strong connectivity, bipartiteness
//!
//! Searches take the heap backend as a type parameter and the graph through the
//! [`WeightedGraph`] trait.
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::fibonacci::FibonacciHeap;
//! use graph_heaps::graph::AdjacencyList;
//! use graph_heaps::pathfinding::dijkstra;
//! use graph_heaps::Heap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(0, 5).unwrap();
//! heap.insert(1, 3).unwrap();
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.peek_min(), Ok((0, 1)));
//!
//! let mut g = AdjacencyList::undirected(3, u64::MAX);
//! g.add_edge(0, 1, 2).unwrap();
//! g.add_edge(1, 2, 2).unwrap();
//! assert_eq!(dijkstra::<_, FibonacciHeap<_>>(&g, 0, 2).unwrap(), 4);
//! ```

pub mod binary;
pub mod binomial;
pub mod connectivity;
pub mod disjoint_set;
pub mod fibonacci;
pub mod graph;
pub mod mst;
pub mod pathfinding;
pub mod priority_queue;
pub mod rank;
pub mod relaxation;
pub mod storage;
pub mod traits;

// Re-export the main traits and types for convenience
pub use graph::{AdjacencyList, GraphError, WeightedGraph};
pub use pathfinding::SearchError;
pub use priority_queue::PriorityQueue;
pub use traits::{Handle, Heap, HeapError, Priority, VertexId, Weight};
