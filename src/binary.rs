//! Binary Heap implementation
//!
//! An array-backed binary min-heap with decrease-key. The array holds node
//! references ordered so that every parent's priority is `<=` its children's;
//! each node records its current array position, which is kept in sync on
//! every swap so a handle can find its slot in O(1).
//!
//! # Time Complexity
//!
//! | Operation      | Complexity |
//! |----------------|------------|
//! | `insert`       | O(log n)   |
//! | `extract_min`  | O(log n)   |
//! | `peek_min`     | O(1)       |
//! | `decrease_key` | O(log n)   |
//! | `merge`        | O(n + m)   |
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::Heap;
//! use graph_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! heap.insert(0, 3).unwrap();
//! heap.insert(1, 1).unwrap();
//! let h = heap.insert(2, 2).unwrap();
//! heap.decrease_key(&h, 0).unwrap();
//!
//! assert_eq!(heap.extract_min(), Ok((2, 0)));
//! assert_eq!(heap.extract_min(), Ok((1, 1)));
//! assert_eq!(heap.extract_min(), Ok((0, 3)));
//! assert!(heap.extract_min().is_err());
//! ```

use crate::storage::{NodeArena, NodeRef, VertexIndex};
use crate::traits::{Heap, HeapError, Priority, VertexId};

/// Handle to an element in a binary heap
pub type BinaryHandle = NodeRef;

#[derive(Debug)]
struct BinaryNode<P> {
    vertex: VertexId,
    priority: P,
    position: usize,
}

/// A binary min-heap with handle-based decrease-key
#[derive(Debug)]
pub struct BinaryHeap<P: Priority> {
    slots: Vec<NodeRef>,
    nodes: NodeArena<BinaryNode<P>>,
    index: VertexIndex,
}

impl<P: Priority> Heap<P> for BinaryHeap<P> {
    type Handle = BinaryHandle;

    fn new() -> Self {
        BinaryHeap {
            slots: Vec::new(),
            nodes: NodeArena::new(),
            index: VertexIndex::new(),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn contains(&self, vertex: VertexId) -> bool {
        self.index.contains(vertex)
    }

    fn insert(&mut self, vertex: VertexId, priority: P) -> Result<BinaryHandle, HeapError> {
        if self.index.contains(vertex) {
            return Err(HeapError::DuplicateVertex(vertex));
        }
        let position = self.slots.len();
        let node = self.nodes.insert(BinaryNode {
            vertex,
            priority,
            position,
        });
        self.slots.push(node);
        self.index.insert(vertex, node);
        self.sift_up(position);
        Ok(node)
    }

    fn peek_min(&self) -> Result<(VertexId, P), HeapError> {
        let root = self.slots.first().ok_or(HeapError::Empty)?;
        let node = &self.nodes[*root];
        Ok((node.vertex, node.priority))
    }

    fn extract_min(&mut self) -> Result<(VertexId, P), HeapError> {
        if self.slots.is_empty() {
            return Err(HeapError::Empty);
        }
        let root = self.slots.swap_remove(0);
        if let Some(&moved) = self.slots.first() {
            self.nodes[moved].position = 0;
            self.sift_down(0);
        }
        let node = self.nodes.remove(root).ok_or(HeapError::InvalidHandle)?;
        self.index.remove(node.vertex);
        Ok((node.vertex, node.priority))
    }

    fn decrease_key(&mut self, handle: &BinaryHandle, priority: P) -> Result<(), HeapError> {
        let node = self.nodes.get_mut(*handle).ok_or(HeapError::InvalidHandle)?;
        if !(priority < node.priority) {
            return Err(HeapError::PriorityNotDecreased);
        }
        node.priority = priority;
        let position = node.position;
        self.sift_up(position);
        Ok(())
    }

    fn get(&self, handle: &BinaryHandle) -> Option<(VertexId, P)> {
        self.nodes.get(*handle).map(|n| (n.vertex, n.priority))
    }

    fn merge(&mut self, other: Self) -> Result<(), HeapError> {
        if other.slots.is_empty() {
            return Ok(());
        }
        if cfg!(feature = "merge-check") {
            if let Some(vertex) = self.index.overlap(&other.index) {
                return Err(HeapError::DuplicateVertex(vertex));
            }
        }
        let BinaryHeap {
            slots,
            nodes,
            index,
        } = other;
        self.nodes.absorb(nodes);
        self.index.absorb(index);
        for node in slots {
            self.nodes[node].position = self.slots.len();
            self.slots.push(node);
        }
        // Bottom-up heapify over the combined array.
        for i in (0..self.slots.len() / 2).rev() {
            self.sift_down(i);
        }
        Ok(())
    }
}

impl<P: Priority> BinaryHeap<P> {
    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut heap = Self::new();
        heap.slots.reserve(capacity);
        heap
    }

    fn priority_at(&self, i: usize) -> P {
        self.nodes[self.slots[i]].priority
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.slots.swap(i, j);
        let (a, b) = (self.slots[i], self.slots[j]);
        self.nodes[a].position = i;
        self.nodes[b].position = j;
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.priority_at(index) < self.priority_at(parent) {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.priority_at(left) < self.priority_at(smallest) {
                smallest = left;
            }
            if right < len && self.priority_at(right) < self.priority_at(smallest) {
                smallest = right;
            }

            if smallest != index {
                self.swap(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }

    #[cfg(test)]
    fn assert_valid(&self) {
        for (i, &r) in self.slots.iter().enumerate() {
            assert_eq!(self.nodes[r].position, i, "position out of sync at {}", i);
            if i > 0 {
                assert!(self.priority_at((i - 1) / 2) <= self.priority_at(i));
            }
        }
        assert_eq!(self.nodes.len(), self.slots.len());
        assert_eq!(self.index.len(), self.slots.len());
    }
}

impl<P: Priority> Default for BinaryHeap<P> {
    fn default() -> Self {
        Self::new()
    }
}
