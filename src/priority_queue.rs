//! Vertex-keyed priority queue over any [`Heap`] backend
//!
//! The searches never hold heap handles themselves. They `push` a vertex with
//! a priority and the queue decides between insert (vertex not queued) and
//! decrease-key (vertex queued), using a handle table indexed by vertex id.
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::binary::BinaryHeap;
//! use graph_heaps::priority_queue::PriorityQueue;
//!
//! let mut pq: PriorityQueue<u32, BinaryHeap<u32>> = PriorityQueue::with_capacity(4);
//! pq.push(2, 10).unwrap();
//! pq.push(3, 7).unwrap();
//! pq.push(2, 4).unwrap(); // decrease-key
//!
//! assert_eq!(pq.top(), Ok((2, 4)));
//! assert_eq!(pq.pop(), Ok((2, 4)));
//! assert_eq!(pq.pop(), Ok((3, 7)));
//! assert!(pq.is_empty());
//! ```

use crate::traits::{Heap, HeapError, Priority, VertexId};
use std::marker::PhantomData;

/// Priority queue adapter that turns `push` into insert-or-decrease.
#[derive(Debug)]
pub struct PriorityQueue<P: Priority, H: Heap<P>> {
    heap: H,
    handles: Vec<Option<H::Handle>>,
    _priority: PhantomData<P>,
}

impl<P: Priority, H: Heap<P>> PriorityQueue<P, H> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-sizes the handle table for vertex ids `0..vertices`.
    pub fn with_capacity(vertices: usize) -> Self {
        PriorityQueue {
            heap: H::new(),
            handles: vec![None; vertices],
            _priority: PhantomData,
        }
    }

    /// Inserts `vertex`, or lowers its priority if it is already queued.
    ///
    /// # Errors
    /// [`HeapError::PriorityNotDecreased`] if the vertex is queued with a
    /// priority that is not larger than `priority`.
    pub fn push(&mut self, vertex: VertexId, priority: P) -> Result<(), HeapError> {
        if vertex >= self.handles.len() {
            self.handles.resize(vertex + 1, None);
        }
        match self.handles[vertex] {
            Some(handle) => self.heap.decrease_key(&handle, priority),
            None => {
                let handle = self.heap.insert(vertex, priority)?;
                self.handles[vertex] = Some(handle);
                Ok(())
            }
        }
    }

    /// The minimum entry, without removing it.
    pub fn top(&self) -> Result<(VertexId, P), HeapError> {
        self.heap.peek_min()
    }

    /// Removes and returns the minimum entry.
    pub fn pop(&mut self) -> Result<(VertexId, P), HeapError> {
        let (vertex, priority) = self.heap.extract_min()?;
        if let Some(slot) = self.handles.get_mut(vertex) {
            *slot = None;
        }
        Ok((vertex, priority))
    }

    /// Current priority of a queued vertex.
    pub fn priority(&self, vertex: VertexId) -> Option<P> {
        let handle = self.handles.get(vertex).copied().flatten()?;
        self.heap.get(&handle).map(|(_, p)| p)
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        matches!(self.handles.get(vertex), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<P: Priority, H: Heap<P>> Default for PriorityQueue<P, H> {
    fn default() -> Self {
        Self::new()
    }
}
