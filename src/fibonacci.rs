//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert, merge and (amortized) decrease_key
//! - O(log n) amortized extract_min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list and the heap keeps a pointer to the minimum
//! root. Work is deferred: insert and merge only splice rings, and the trees are
//! consolidated (equal-degree roots linked) during extract_min.
//!
//! Nodes live in a generational arena and link to one another by [`NodeRef`],
//! so there is no `unsafe` and a stale handle is reported instead of followed.
//!
//! # Marking
//!
//! A non-root node is marked when it loses a child. Losing a second child cuts
//! it from its parent as well (cascading cut), which bounds the size of every
//! subtree exponentially in its degree.

use crate::rank::{checked_increment, degree_bound, saturating_decrement, table_index, Rank};
use crate::storage::{NodeArena, NodeRef, VertexIndex};
use crate::traits::{Heap, HeapError, Priority, VertexId};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

/// Handle to an element in a Fibonacci heap
pub type FibonacciHandle = NodeRef;

#[derive(Debug)]
struct FibNode<P> {
    vertex: VertexId,
    priority: P,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    left: NodeRef,
    right: NodeRef,
    degree: Rank,
    marked: bool,
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use graph_heaps::fibonacci::FibonacciHeap;
/// use graph_heaps::Heap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(0, 5).unwrap();
/// heap.insert(1, 3).unwrap();
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.peek_min(), Ok((0, 1)));
/// ```
#[derive(Debug)]
pub struct FibonacciHeap<P: Priority> {
    min: Option<NodeRef>,
    nodes: NodeArena<FibNode<P>>,
    index: VertexIndex,
}

impl<P: Priority> Heap<P> for FibonacciHeap<P> {
    type Handle = FibonacciHandle;

    fn new() -> Self {
        FibonacciHeap {
            min: None,
            nodes: NodeArena::new(),
            index: VertexIndex::new(),
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, vertex: VertexId) -> bool {
        self.index.contains(vertex)
    }

    fn insert(&mut self, vertex: VertexId, priority: P) -> Result<FibonacciHandle, HeapError> {
        if self.index.contains(vertex) {
            return Err(HeapError::DuplicateVertex(vertex));
        }
        let node = self.nodes.insert_with(|this| FibNode {
            vertex,
            priority,
            parent: None,
            child: None,
            left: this,
            right: this,
            degree: 0,
            marked: false,
        });
        self.index.insert(vertex, node);
        self.add_root(node);
        Ok(node)
    }

    fn peek_min(&self) -> Result<(VertexId, P), HeapError> {
        let min = self.min.ok_or(HeapError::Empty)?;
        let node = &self.nodes[min];
        Ok((node.vertex, node.priority))
    }

    /// Removes the minimum root, promotes its children to roots, and
    /// consolidates until no two roots share a degree.
    fn extract_min(&mut self) -> Result<(VertexId, P), HeapError> {
        let z = self.min.ok_or(HeapError::Empty)?;

        if let Some(child) = self.nodes[z].child.take() {
            let mut current = child;
            loop {
                let c = &mut self.nodes[current];
                c.parent = None;
                c.marked = false;
                current = c.right;
                if current == child {
                    break;
                }
            }
            self.splice(z, child);
        }

        let next = self.nodes[z].right;
        if next == z {
            self.min = None;
        } else {
            self.unlink(z);
            self.min = Some(next);
            self.consolidate();
        }

        let node = self.nodes.remove(z).ok_or(HeapError::InvalidHandle)?;
        self.index.remove(node.vertex);
        Ok((node.vertex, node.priority))
    }

    /// Lowers a priority in place. If that breaks heap order the node is cut
    /// to the root list and its ancestors are cut while they are marked.
    fn decrease_key(&mut self, handle: &FibonacciHandle, priority: P) -> Result<(), HeapError> {
        let x = *handle;
        let node = self.nodes.get_mut(x).ok_or(HeapError::InvalidHandle)?;
        if !(priority < node.priority) {
            return Err(HeapError::PriorityNotDecreased);
        }
        node.priority = priority;

        if let Some(parent) = node.parent {
            if priority < self.nodes[parent].priority {
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }
        if let Some(min) = self.min {
            if priority < self.nodes[min].priority {
                self.min = Some(x);
            }
        }
        Ok(())
    }

    fn get(&self, handle: &FibonacciHandle) -> Option<(VertexId, P)> {
        self.nodes.get(*handle).map(|n| (n.vertex, n.priority))
    }

    /// Splices the two root lists together. No consolidation happens here.
    fn merge(&mut self, other: Self) -> Result<(), HeapError> {
        let Some(other_min) = other.min else {
            return Ok(());
        };
        if cfg!(feature = "merge-check") {
            if let Some(vertex) = self.index.overlap(&other.index) {
                return Err(HeapError::DuplicateVertex(vertex));
            }
        }
        self.nodes.absorb(other.nodes);
        self.index.absorb(other.index);

        match self.min {
            None => self.min = Some(other_min),
            Some(min) => {
                self.splice(min, other_min);
                if self.nodes[other_min].priority < self.nodes[min].priority {
                    self.min = Some(other_min);
                }
            }
        }
        Ok(())
    }
}

impl<P: Priority> FibonacciHeap<P> {
    /// Number of trees in the root list.
    pub fn root_count(&self) -> usize {
        self.roots().len()
    }

    /// Degree of every root, in root-list order starting at the minimum.
    pub fn root_degrees(&self) -> Vec<Rank> {
        self.roots()
            .into_iter()
            .map(|r| self.nodes[r].degree)
            .collect()
    }

    fn roots(&self) -> Vec<NodeRef> {
        let mut roots = Vec::new();
        if let Some(start) = self.min {
            let mut current = start;
            loop {
                roots.push(current);
                current = self.nodes[current].right;
                if current == start {
                    break;
                }
            }
        }
        roots
    }

    /// Adds a singleton node to the root list, updating min.
    fn add_root(&mut self, node: NodeRef) {
        match self.min {
            None => self.min = Some(node),
            Some(min) => {
                self.splice(min, node);
                if self.nodes[node].priority < self.nodes[min].priority {
                    self.min = Some(node);
                }
            }
        }
    }

    /// Concatenates the ring containing `b` into the ring containing `a`,
    /// right after `a`.
    fn splice(&mut self, a: NodeRef, b: NodeRef) {
        let a_right = self.nodes[a].right;
        let b_left = self.nodes[b].left;
        self.nodes[a].right = b;
        self.nodes[b].left = a;
        self.nodes[b_left].right = a_right;
        self.nodes[a_right].left = b_left;
    }

    /// Removes `x` from its ring and makes it a singleton ring.
    fn unlink(&mut self, x: NodeRef) {
        let (left, right) = (self.nodes[x].left, self.nodes[x].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        let n = &mut self.nodes[x];
        n.left = x;
        n.right = x;
    }

    /// Makes root `child` a child of root `parent`.
    fn link(&mut self, child: NodeRef, parent: NodeRef) {
        {
            let c = &mut self.nodes[child];
            c.left = child;
            c.right = child;
            c.parent = Some(parent);
            c.marked = false;
        }
        match self.nodes[parent].child {
            Some(first) => self.splice(first, child),
            None => self.nodes[parent].child = Some(child),
        }
        let p = &mut self.nodes[parent];
        p.degree = checked_increment(p.degree);
    }

    /// Links roots of equal degree until all root degrees are distinct, then
    /// rebuilds the root list from the degree table and rescans for min.
    fn consolidate(&mut self) {
        let roots = self.roots();
        let mut table: SmallVec<[Option<NodeRef>; 64]> = smallvec![None; degree_bound(self.len())];

        for root in roots {
            let mut x = root;
            let mut d = table_index(self.nodes[x].degree);
            loop {
                if d >= table.len() {
                    table.resize(d + 1, None);
                }
                let Some(mut y) = table[d].take() else {
                    break;
                };
                if self.nodes[y].priority < self.nodes[x].priority {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }
            table[d] = Some(x);
        }

        self.min = None;
        let mut trees = 0usize;
        for root in table.into_iter().flatten() {
            let n = &mut self.nodes[root];
            n.left = root;
            n.right = root;
            self.add_root(root);
            trees += 1;
        }
        trace!(trees, len = self.len(), "fibonacci heap consolidated");
    }

    /// Moves `x` from its parent's child ring to the root list.
    fn cut(&mut self, x: NodeRef, parent: NodeRef) {
        let right = self.nodes[x].right;
        let p = &mut self.nodes[parent];
        if right == x {
            p.child = None;
        } else if p.child == Some(x) {
            p.child = Some(right);
        }
        p.degree = saturating_decrement(p.degree);
        self.unlink(x);

        let n = &mut self.nodes[x];
        n.parent = None;
        n.marked = false;
        if let Some(min) = self.min {
            self.splice(min, x);
        }
    }

    /// Walks up from `y`: an unmarked node gets marked and the walk stops; a
    /// marked non-root node is cut and the walk continues with its parent.
    fn cascading_cut(&mut self, mut y: NodeRef) {
        while let Some(z) = self.nodes[y].parent {
            if !self.nodes[y].marked {
                self.nodes[y].marked = true;
                return;
            }
            self.cut(y, z);
            y = z;
        }
    }
}

impl<P: Priority> Default for FibonacciHeap<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<P: Priority> FibonacciHeap<P> {
    fn node_of(&self, vertex: VertexId) -> NodeRef {
        self.index.get(vertex).expect("vertex not in heap")
    }

    fn children_of(&self, vertex: VertexId) -> Vec<VertexId> {
        let mut out = Vec::new();
        if let Some(first) = self.nodes[self.node_of(vertex)].child {
            let mut current = first;
            loop {
                out.push(self.nodes[current].vertex);
                current = self.nodes[current].right;
                if current == first {
                    break;
                }
            }
        }
        out
    }

    fn is_marked(&self, vertex: VertexId) -> bool {
        self.nodes[self.node_of(vertex)].marked
    }

    /// Checks ring symmetry, parent links, degrees, marks, and heap order.
    fn assert_valid(&self) {
        fn check_ring<P: Priority>(heap: &FibonacciHeap<P>, start: NodeRef, parent: Option<NodeRef>) -> usize {
            let mut size = 0;
            let mut current = start;
            loop {
                let n = &heap.nodes[current];
                assert_eq!(heap.nodes[n.right].left, current, "ring not symmetric");
                assert_eq!(n.parent, parent);
                match parent {
                    Some(p) => assert!(heap.nodes[p].priority <= n.priority, "heap order violated"),
                    None => assert!(!n.marked, "root is marked"),
                }
                let mut children = 0;
                if let Some(child) = n.child {
                    let mut c = child;
                    loop {
                        children += 1;
                        c = heap.nodes[c].right;
                        if c == child {
                            break;
                        }
                    }
                    size += check_ring(heap, child, Some(current));
                }
                assert_eq!(children, usize::from(n.degree));
                size += 1;
                current = n.right;
                if current == start {
                    break;
                }
            }
            size
        }

        match self.min {
            None => assert_eq!(self.len(), 0),
            Some(min) => {
                assert_eq!(check_ring(self, min, None), self.len());
                for r in self.roots() {
                    assert!(self.nodes[min].priority <= self.nodes[r].priority);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_insert_is_lazy() {
        let mut heap = FibonacciHeap::new();
        for v in 0..10 {
            heap.insert(v, 10 - v as i32).unwrap();
        }
        heap.assert_valid();
        assert_eq!(heap.root_count(), 10);
        assert_eq!(heap.peek_min(), Ok((9, 1)));
    }

    #[test]
    fn test_extract_min_leaves_distinct_root_degrees() {
        let mut heap = FibonacciHeap::new();
        for v in 0..50 {
            heap.insert(v, (v * 37 % 50) as i32).unwrap();
        }
        for expected in 0..20 {
            let (_, p) = heap.extract_min().unwrap();
            assert_eq!(p, expected);
            heap.assert_valid();

            let degrees = heap.root_degrees();
            let distinct: HashSet<_> = degrees.iter().collect();
            assert_eq!(distinct.len(), degrees.len(), "duplicate root degree in {:?}", degrees);
        }
    }

    #[test]
    fn test_consolidate_builds_binomial_tree() {
        let mut heap = FibonacciHeap::new();
        for v in 0..9 {
            heap.insert(v, v as i32).unwrap();
        }
        assert_eq!(heap.extract_min(), Ok((0, 0)));
        heap.assert_valid();
        assert_eq!(heap.root_degrees(), vec![3]);
        assert_eq!(heap.peek_min(), Ok((1, 1)));
    }

    #[test]
    fn test_cascading_cut() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..9).map(|v| heap.insert(v, v as i32).unwrap()).collect();
        heap.extract_min().unwrap();

        // Single B3 rooted at vertex 1; pick its degree-2 child and that
        // child's two children.
        let c2 = heap
            .children_of(1)
            .into_iter()
            .find(|&c| heap.children_of(c).len() == 2)
            .unwrap();
        let grandchildren = heap.children_of(c2);
        let (g_a, g_b) = (grandchildren[0], grandchildren[1]);

        heap.decrease_key(&handles[g_a], -1).unwrap();
        heap.assert_valid();
        assert!(heap.is_marked(c2));
        assert_eq!(heap.root_count(), 2);

        heap.decrease_key(&handles[g_b], -2).unwrap();
        heap.assert_valid();
        // c2 lost its second child, so it was cut too and is now an unmarked root.
        assert!(!heap.is_marked(c2));
        assert_eq!(heap.root_count(), 4);
        assert_eq!(heap.peek_min(), Ok((g_b, -2)));
    }

    #[test]
    fn test_decrease_key_root_updates_min() {
        let mut heap = FibonacciHeap::new();
        heap.insert(0, 5).unwrap();
        let h = heap.insert(1, 9).unwrap();
        heap.decrease_key(&h, 2).unwrap();
        assert_eq!(heap.peek_min(), Ok((1, 2)));
        assert_eq!(heap.root_count(), 2);
    }

    #[test]
    fn test_decrease_key_rejections_leave_heap_untouched() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(0, 5).unwrap();
        heap.insert(1, 7).unwrap();

        assert_eq!(heap.decrease_key(&h, 5), Err(HeapError::PriorityNotDecreased));
        assert_eq!(heap.decrease_key(&h, 8), Err(HeapError::PriorityNotDecreased));
        assert_eq!(heap.peek_min(), Ok((0, 5)));
        heap.assert_valid();

        heap.extract_min().unwrap();
        assert_eq!(heap.decrease_key(&h, 1), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_union_splices_root_lists() {
        let mut a = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        for v in 0..3 {
            a.insert(v, v as i32 + 10).unwrap();
        }
        let mut hb = Vec::new();
        for v in 3..7 {
            hb.push(b.insert(v, v as i32).unwrap());
        }
        let (ra, rb) = (a.root_count(), b.root_count());

        a.merge(b).unwrap();
        a.assert_valid();
        assert_eq!(a.len(), 7);
        assert_eq!(a.root_count(), ra + rb);
        assert_eq!(a.peek_min(), Ok((3, 3)));

        // Handles from the absorbed heap still work.
        a.decrease_key(&hb[3], 0).unwrap();
        assert_eq!(a.extract_min(), Ok((6, 0)));
        a.assert_valid();
    }

    #[test]
    fn test_union_adopts_arena_without_copying() {
        let mut a = FibonacciHeap::new();
        for v in 0..1025 {
            a.insert(v, v as i64).unwrap();
        }
        a.extract_min().unwrap();
        let mut b = FibonacciHeap::new();
        let hb: Vec<_> = (1025..2049).map(|v| b.insert(v, v as i64).unwrap()).collect();
        let (ra, rb) = (a.root_count(), b.root_count());
        assert_eq!(ra, 1);
        assert_eq!(rb, 1024);

        a.merge(b).unwrap();
        assert_eq!(a.len(), 2048);
        assert_eq!(a.root_count(), ra + rb);
        assert_eq!(a.nodes.block_count(), 2);
        assert_eq!(a.get(&hb[0]), Some((1025, 1025)));
        a.assert_valid();
    }

    #[test]
    #[cfg(not(feature = "merge-check"))]
    fn test_union_does_not_visit_vertices() {
        // Only the root rings are spliced, so a shared vertex goes unnoticed.
        let mut a = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        a.insert(0, 1).unwrap();
        b.insert(0, 2).unwrap();
        b.insert(1, 0).unwrap();
        assert_eq!(a.merge(b), Ok(()));
        assert_eq!(a.len(), 3);
        assert_eq!(a.root_count(), 3);
        assert_eq!(a.peek_min(), Ok((1, 0)));
    }

    #[test]
    #[cfg(feature = "merge-check")]
    fn test_union_rejects_overlap_when_checked() {
        let mut a = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        a.insert(0, 1).unwrap();
        b.insert(0, 2).unwrap();
        assert_eq!(a.merge(b), Err(HeapError::DuplicateVertex(0)));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_union_with_empty() {
        let mut a: FibonacciHeap<i32> = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        b.insert(0, 1).unwrap();
        a.merge(b).unwrap();
        assert_eq!(a.peek_min(), Ok((0, 1)));
        a.merge(FibonacciHeap::new()).unwrap();
        assert_eq!(a.len(), 1);
    }
}
