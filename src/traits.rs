//! Common traits for the decrease-key heaps
//!
//! Every heap in this crate stores `(vertex, priority)` pairs, keeps at most one
//! live entry per vertex, and hands out a [`Handle`] on insert that later
//! identifies the entry for [`Heap::decrease_key`]. The graph searches are
//! written once against [`Heap`] and pick a backend by type parameter.
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::fibonacci::FibonacciHeap;
//! use graph_heaps::Heap;
//!
//! let mut heap = FibonacciHeap::new();
//! let a = heap.insert(7, 40).unwrap();
//! heap.insert(3, 25).unwrap();
//! heap.decrease_key(&a, 10).unwrap();
//! assert_eq!(heap.peek_min(), Ok((7, 10)));
//! ```

use std::fmt::Debug;
use std::ops::Add;
use thiserror::Error;

/// Dense vertex identifier in `0..graph.size()`.
pub type VertexId = usize;

/// Types usable as heap priorities.
///
/// Only a partial order is required so that floating point distances work.
/// NaN is not a meaningful priority: every comparison with it fails, so a
/// NaN decrease is rejected as [`HeapError::PriorityNotDecreased`].
pub trait Priority: Copy + PartialOrd + Debug {}

impl<T> Priority for T where T: Copy + PartialOrd + Debug {}

/// Edge weights and accumulated distances.
///
/// `Default::default()` is the zero distance. Searches extend path costs with
/// [`Weight::checked_add`]; a sum that does not fit is treated as unreachable
/// instead of wrapping into a small, wrong distance.
pub trait Weight: Priority + Add<Output = Self> + Default {
    /// `self + rhs`, or `None` on overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_integer_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_integer_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_float_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                /// Floats saturate to infinity, which compares as unreachable.
                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }
            }
        )*
    };
}

impl_float_weight!(f32, f64);

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// peek or extract on an empty heap
    #[error("heap is empty")]
    Empty,
    /// The vertex already has a live entry in this heap
    #[error("vertex {0} is already in the heap")]
    DuplicateVertex(VertexId),
    /// The new priority is not less than the current priority
    #[error("new priority is not less than current priority")]
    PriorityNotDecreased,
    /// The handle is no longer valid (element was removed) or belongs to another heap
    #[error("handle is no longer valid (element was removed)")]
    InvalidHandle,
}

/// A handle to an element in the heap, used for decrease_key operations
///
/// Handles are plain copyable tokens. They never borrow the heap, and a handle
/// whose element has been extracted is detected and rejected rather than
/// dereferenced.
pub trait Handle: Copy + Eq + Debug {}

/// Min-heap of vertices keyed by priority, with decrease-key and union.
pub trait Heap<P: Priority>: Sized {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `vertex` has a live entry
    fn contains(&self, vertex: VertexId) -> bool;

    /// Inserts `vertex` with the given priority, returning a handle
    ///
    /// # Errors
    /// [`HeapError::DuplicateVertex`] if the vertex is already present.
    ///
    /// # Time Complexity
    /// - Binary Heap: O(log n)
    /// - Binomial Heap: O(log n)
    /// - Fibonacci Heap: O(1)
    fn insert(&mut self, vertex: VertexId, priority: P) -> Result<Self::Handle, HeapError>;

    /// Returns the minimum entry without removing it
    fn peek_min(&self) -> Result<(VertexId, P), HeapError>;

    /// Removes and returns the minimum entry
    ///
    /// # Time Complexity
    /// O(log n), amortized for the Fibonacci heap.
    fn extract_min(&mut self) -> Result<(VertexId, P), HeapError>;

    /// Decreases the priority of an element identified by the handle
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the element was already extracted.
    /// - [`HeapError::PriorityNotDecreased`] unless `priority` is strictly
    ///   smaller than the current one. The heap is left unchanged.
    ///
    /// # Time Complexity
    /// - Binary Heap: O(log n)
    /// - Binomial Heap: O(log n)
    /// - Fibonacci Heap: O(1) amortized
    fn decrease_key(&mut self, handle: &Self::Handle, priority: P) -> Result<(), HeapError>;

    /// Returns the entry a live handle refers to
    fn get(&self, handle: &Self::Handle) -> Option<(VertexId, P)>;

    /// Merges another heap into this one, consuming the other heap
    ///
    /// Handles issued by `other` stay valid on `self`. The two heaps must hold
    /// disjoint vertex sets. With the `merge-check` feature this is verified and
    /// overlap returns [`HeapError::DuplicateVertex`] with both heaps intact;
    /// without it, merging overlapping heaps leaves the vertex index
    /// inconsistent (still memory safe).
    ///
    /// # Time Complexity
    /// - Binary Heap: O(n + m)
    /// - Binomial Heap: O(log n)
    /// - Fibonacci Heap: O(1)
    fn merge(&mut self, other: Self) -> Result<(), HeapError>;
}
