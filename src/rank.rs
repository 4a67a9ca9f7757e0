//! Degree type for binomial and Fibonacci tree nodes.
//!
//! A node's degree (number of children) is bounded by `log_φ(n)` in a
//! Fibonacci heap and `log₂(n)` in a binomial heap, so it never comes close to
//! 255 for any heap that fits in memory. Storing it as `u8` keeps the node
//! structs small, and the per-degree tables used during consolidation and
//! root-list merging are indexed by it directly.

/// Type alias for node degree.
pub type Rank = u8;

/// Largest representable degree.
pub const MAX_RANK: Rank = u8::MAX;

/// Increment a degree, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`, which would need more than 2²⁵⁵ nodes and so
/// signals a corrupted tree.
///
/// # Example
///
/// ```rust
/// use graph_heaps::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    match rank.checked_add(1) {
        Some(r) => r,
        None => panic!("node degree overflow; tree structure is corrupted"),
    }
}

/// Decrement a degree, stopping at 0 (a leaf).
#[inline]
pub fn saturating_decrement(rank: Rank) -> Rank {
    rank.saturating_sub(1)
}

/// Slot in a per-degree table for a node of the given degree.
#[inline]
pub fn table_index(rank: Rank) -> usize {
    usize::from(rank)
}

/// Upper bound on distinct root degrees for `len` nodes, used to size
/// per-degree tables: `floor(log₂ len) + 2`.
#[inline]
pub fn degree_bound(len: usize) -> usize {
    (usize::BITS - len.leading_zeros()) as usize + 1
}
