//! Tests for minimum spanning trees and the disjoint-set forest

use graph_heaps::binary::BinaryHeap;
use graph_heaps::binomial::BinomialHeap;
use graph_heaps::disjoint_set::DisjointSet;
use graph_heaps::fibonacci::FibonacciHeap;
use graph_heaps::graph::{AdjacencyList, GraphError};
use graph_heaps::mst::{kruskal, prim, total_weight, MstEdge};
use graph_heaps::SearchError;

/// Classic 7-vertex example; the unique MST weighs 39.
fn textbook() -> AdjacencyList<u32> {
    AdjacencyList::from_edges(
        7,
        u32::MAX,
        false,
        &[
            (0, 1, 7),
            (0, 3, 5),
            (1, 2, 8),
            (1, 3, 9),
            (1, 4, 7),
            (2, 4, 5),
            (3, 4, 15),
            (3, 5, 6),
            (4, 5, 8),
            (4, 6, 9),
            (5, 6, 11),
        ],
    )
    .unwrap()
}

fn normalized(tree: &[MstEdge<u32>]) -> Vec<(usize, usize, u32)> {
    let mut edges: Vec<_> = tree
        .iter()
        .map(|e| (e.from.min(e.to), e.from.max(e.to), e.weight))
        .collect();
    edges.sort();
    edges
}

macro_rules! test_prim_with_heap {
    ($heap_type:ty, $test_name:ident) => {
        mod $test_name {
            use super::*;

            #[test]
            fn textbook_tree() {
                let g = textbook();
                let tree = prim::<_, $heap_type>(&g, 0).unwrap().unwrap();
                assert_eq!(tree.len(), 6);
                assert_eq!(total_weight(&tree), 39);
                assert_eq!(tree[0], MstEdge { from: 0, to: 3, weight: 5 });
            }

            #[test]
            fn any_start_same_tree() {
                let g = textbook();
                let expected = normalized(&kruskal(&g).unwrap().unwrap());
                for start in 0..7 {
                    let tree = prim::<_, $heap_type>(&g, start).unwrap().unwrap();
                    assert_eq!(normalized(&tree), expected);
                }
            }

            #[test]
            fn disconnected() {
                let g = AdjacencyList::from_edges(4, u32::MAX, false, &[(0, 1, 1), (2, 3, 1)]).unwrap();
                assert_eq!(prim::<_, $heap_type>(&g, 0).unwrap(), None);
            }

            #[test]
            fn start_out_of_range() {
                let g = textbook();
                assert_eq!(
                    prim::<_, $heap_type>(&g, 7),
                    Err(SearchError::Graph(GraphError::VertexOutOfRange { vertex: 7, size: 7 }))
                );
            }
        }
    };
}

test_prim_with_heap!(BinaryHeap<u32>, prim_binary);
test_prim_with_heap!(BinomialHeap<u32>, prim_binomial);
test_prim_with_heap!(FibonacciHeap<u32>, prim_fibonacci);

#[test]
fn test_kruskal_textbook() {
    let tree = kruskal(&textbook()).unwrap().unwrap();
    assert_eq!(tree.len(), 6);
    assert_eq!(total_weight(&tree), 39);
    // Lightest edges come first
    assert!(tree.windows(2).all(|w| w[0].weight <= w[1].weight));
}

#[test]
fn test_kruskal_disconnected() {
    let g = AdjacencyList::from_edges(4, u32::MAX, false, &[(0, 1, 1), (2, 3, 1)]).unwrap();
    assert_eq!(kruskal(&g).unwrap(), None);
}

#[test]
fn test_parallel_edges_and_loops() {
    let g = AdjacencyList::from_edges(
        3,
        u32::MAX,
        false,
        &[(0, 0, 1), (0, 1, 9), (0, 1, 2), (1, 2, 4), (1, 2, 3)],
    )
    .unwrap();
    let p = prim::<_, FibonacciHeap<_>>(&g, 0).unwrap().unwrap();
    let k = kruskal(&g).unwrap().unwrap();
    assert_eq!(normalized(&p), vec![(0, 1, 2), (1, 2, 3)]);
    assert_eq!(normalized(&k), vec![(0, 1, 2), (1, 2, 3)]);
}

#[test]
fn test_float_weights() {
    let g = AdjacencyList::from_edges(3, f64::INFINITY, false, &[(0, 1, 0.5), (1, 2, 1.5), (0, 2, 0.25)])
        .unwrap();
    let p = prim::<_, BinaryHeap<_>>(&g, 1).unwrap().unwrap();
    let k = kruskal(&g).unwrap().unwrap();
    assert_eq!(total_weight(&p), 0.75);
    assert_eq!(total_weight(&k), 0.75);
}

#[test]
fn test_disjoint_set_tracks_components() {
    let mut ds = DisjointSet::new(5);
    assert_eq!(ds.len(), 5);
    assert!(ds.union(0, 4).unwrap());
    assert!(ds.union(4, 2).unwrap());
    assert!(!ds.union(2, 0).unwrap());
    assert_eq!(ds.set_count(), 3);
    assert!(ds.same_set(0, 2).unwrap());
    assert!(!ds.same_set(1, 3).unwrap());
    assert_eq!(ds.find(5), Err(GraphError::VertexOutOfRange { vertex: 5, size: 5 }));

    let empty = DisjointSet::new(0);
    assert!(empty.is_empty());
    assert_eq!(empty.set_count(), 0);
}
