//! Binomial Heap implementation
//!
//! A binomial heap is a collection of binomial trees with:
//! - O(log n) insert and extract_min
//! - O(log n) decrease_key
//! - O(log n) merge
//!
//! # Algorithm Overview
//!
//! The heap keeps at most one heap-ordered binomial tree per degree, indexed
//! by degree in `trees`, so the forest mirrors the binary representation of
//! `len`. Inserting or merging adds forests like binary numbers: two trees of
//! degree k are linked into one of degree k + 1 that carries into the next
//! slot. Linking makes the root with the smaller priority the parent.
//!
//! Decrease-key does not cut. It bubbles the payload `(priority, vertex)` up
//! the parent chain by swapping it with the parent's payload. Handles therefore
//! cannot point at tree nodes directly: each handle names a *cell*, and the
//! cell records which tree node currently carries its payload. Every payload
//! swap rewrites the two affected cells.

use crate::rank::{checked_increment, Rank};
use crate::storage::{NodeArena, NodeRef, VertexIndex};
use crate::traits::{Heap, HeapError, Priority, VertexId};

/// Handle to an element in a binomial heap
///
/// Refers to the element's cell, which follows the payload as it moves
/// between tree nodes.
pub type BinomialHandle = NodeRef;

#[derive(Debug)]
struct Cell {
    vertex: VertexId,
    node: NodeRef,
}

#[derive(Debug)]
struct BinomialNode<P> {
    cell: NodeRef,
    priority: P,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    sibling: Option<NodeRef>,
    degree: Rank,
}

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use graph_heaps::binomial::BinomialHeap;
/// use graph_heaps::Heap;
///
/// let mut heap = BinomialHeap::new();
/// let handle = heap.insert(1, 5).unwrap();
/// heap.insert(2, 3).unwrap();
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.peek_min(), Ok((1, 1)));
/// ```
#[derive(Debug)]
pub struct BinomialHeap<P: Priority> {
    trees: Vec<Option<NodeRef>>,
    min: Option<NodeRef>,
    nodes: NodeArena<BinomialNode<P>>,
    cells: NodeArena<Cell>,
    index: VertexIndex,
}

impl<P: Priority> Heap<P> for BinomialHeap<P> {
    type Handle = BinomialHandle;

    fn new() -> Self {
        BinomialHeap {
            trees: Vec::new(),
            min: None,
            nodes: NodeArena::new(),
            cells: NodeArena::new(),
            index: VertexIndex::new(),
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn contains(&self, vertex: VertexId) -> bool {
        self.index.contains(vertex)
    }

    /// Inserts a single-node tree and carries it up like binary increment.
    fn insert(&mut self, vertex: VertexId, priority: P) -> Result<BinomialHandle, HeapError> {
        if self.index.contains(vertex) {
            return Err(HeapError::DuplicateVertex(vertex));
        }
        let nodes = &mut self.nodes;
        let cell = self.cells.insert_with(|cell| Cell {
            vertex,
            node: nodes.insert(BinomialNode {
                cell,
                priority,
                parent: None,
                child: None,
                sibling: None,
                degree: 0,
            }),
        });
        self.index.insert(vertex, cell);

        let mut carry = self.cells[cell].node;
        let mut degree = 0;
        loop {
            if degree == self.trees.len() {
                self.trees.push(None);
            }
            match self.trees[degree].take() {
                Some(tree) => {
                    carry = self.link_trees(carry, tree);
                    degree += 1;
                }
                None => {
                    self.trees[degree] = Some(carry);
                    break;
                }
            }
        }
        self.refresh_min();
        Ok(cell)
    }

    fn peek_min(&self) -> Result<(VertexId, P), HeapError> {
        let min = self.min.ok_or(HeapError::Empty)?;
        let node = &self.nodes[min];
        Ok((self.cells[node.cell].vertex, node.priority))
    }

    /// Removes the minimum root; its children form a second forest that is
    /// merged back in.
    fn extract_min(&mut self) -> Result<(VertexId, P), HeapError> {
        let min = self.min.take().ok_or(HeapError::Empty)?;
        let node = self.nodes.remove(min).ok_or(HeapError::InvalidHandle)?;
        self.trees[usize::from(node.degree)] = None;

        // Children hang off the root in decreasing degree order.
        let mut orphans: Vec<Option<NodeRef>> = vec![None; usize::from(node.degree)];
        let mut next = node.child;
        while let Some(child) = next {
            let c = &mut self.nodes[child];
            next = c.sibling.take();
            c.parent = None;
            orphans[usize::from(c.degree)] = Some(child);
        }
        self.merge_trees(orphans);
        self.refresh_min();

        let cell = self.cells.remove(node.cell).ok_or(HeapError::InvalidHandle)?;
        self.index.remove(cell.vertex);
        Ok((cell.vertex, node.priority))
    }

    fn decrease_key(&mut self, handle: &BinomialHandle, priority: P) -> Result<(), HeapError> {
        let node = self.cells.get(*handle).ok_or(HeapError::InvalidHandle)?.node;
        if !(priority < self.nodes[node].priority) {
            return Err(HeapError::PriorityNotDecreased);
        }
        self.nodes[node].priority = priority;
        self.bubble_up(node);
        Ok(())
    }

    fn get(&self, handle: &BinomialHandle) -> Option<(VertexId, P)> {
        let cell = self.cells.get(*handle)?;
        Some((cell.vertex, self.nodes[cell.node].priority))
    }

    fn merge(&mut self, other: Self) -> Result<(), HeapError> {
        if other.is_empty() {
            return Ok(());
        }
        if cfg!(feature = "merge-check") {
            if let Some(vertex) = self.index.overlap(&other.index) {
                return Err(HeapError::DuplicateVertex(vertex));
            }
        }
        let BinomialHeap {
            trees,
            nodes,
            cells,
            index,
            ..
        } = other;
        self.nodes.absorb(nodes);
        self.cells.absorb(cells);
        self.index.absorb(index);
        self.merge_trees(trees);
        self.refresh_min();
        Ok(())
    }
}

impl<P: Priority> BinomialHeap<P> {
    /// Degrees of the trees currently in the forest, ascending.
    pub fn tree_degrees(&self) -> Vec<Rank> {
        self.trees
            .iter()
            .flatten()
            .map(|&root| self.nodes[root].degree)
            .collect()
    }

    /// Links two trees of equal degree; the smaller root becomes the parent.
    fn link_trees(&mut self, a: NodeRef, b: NodeRef) -> NodeRef {
        let (parent, child) = if self.nodes[a].priority <= self.nodes[b].priority {
            (a, b)
        } else {
            (b, a)
        };
        let first = self.nodes[parent].child;
        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.sibling = first;
        let p = &mut self.nodes[parent];
        p.child = Some(child);
        p.degree = checked_increment(p.degree);
        parent
    }

    /// Adds another forest into this one with carry propagation.
    ///
    /// At each degree there are up to three trees (ours, theirs, carry): one
    /// stays, a pair is linked and carried to the next degree.
    fn merge_trees(&mut self, other: Vec<Option<NodeRef>>) {
        let width = self.trees.len().max(other.len());
        self.trees.resize(width, None);

        let mut carry: Option<NodeRef> = None;
        for degree in 0..width {
            let ours = self.trees[degree].take();
            let theirs = other.get(degree).copied().flatten();
            let (keep, next) = match (ours, theirs, carry) {
                (None, None, None) => (None, None),
                (Some(x), None, None) | (None, Some(x), None) | (None, None, Some(x)) => {
                    (Some(x), None)
                }
                (Some(x), Some(y), None) | (Some(x), None, Some(y)) | (None, Some(x), Some(y)) => {
                    (None, Some(self.link_trees(x, y)))
                }
                (Some(x), Some(y), Some(z)) => (Some(z), Some(self.link_trees(x, y))),
            };
            self.trees[degree] = keep;
            carry = next;
        }
        if let Some(c) = carry {
            self.trees.push(Some(c));
        }
        while let Some(None) = self.trees.last() {
            self.trees.pop();
        }
    }

    /// Swaps the payload at `node` upward until the parent is not larger.
    fn bubble_up(&mut self, node: NodeRef) {
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            if !(self.nodes[current].priority < self.nodes[parent].priority) {
                break;
            }
            let (cur_cell, cur_priority) = (self.nodes[current].cell, self.nodes[current].priority);
            let (par_cell, par_priority) = (self.nodes[parent].cell, self.nodes[parent].priority);

            let c = &mut self.nodes[current];
            c.cell = par_cell;
            c.priority = par_priority;
            let p = &mut self.nodes[parent];
            p.cell = cur_cell;
            p.priority = cur_priority;

            self.cells[par_cell].node = current;
            self.cells[cur_cell].node = parent;
            current = parent;
        }

        if self.nodes[current].parent.is_none() {
            let smaller = match self.min {
                Some(min) => self.nodes[current].priority < self.nodes[min].priority,
                None => true,
            };
            if smaller {
                self.min = Some(current);
            }
        }
    }

    /// Finds and updates the minimum pointer by scanning all roots
    fn refresh_min(&mut self) {
        self.min = None;
        for &root in self.trees.iter().flatten() {
            let smaller = match self.min {
                Some(min) => self.nodes[root].priority < self.nodes[min].priority,
                None => true,
            };
            if smaller {
                self.min = Some(root);
            }
        }
    }

    /// Walks every tree checking heap order, degrees, and cell back-links.
    #[cfg(test)]
    fn assert_valid(&self) {
        fn walk<P: Priority>(heap: &BinomialHeap<P>, node: NodeRef) -> usize {
            let n = &heap.nodes[node];
            assert_eq!(heap.cells[n.cell].node, node, "cell does not follow payload");
            let mut size = 1;
            let mut children = 0;
            let mut next = n.child;
            while let Some(child) = next {
                let c = &heap.nodes[child];
                assert_eq!(c.parent, Some(node));
                assert!(n.priority <= c.priority, "heap order violated");
                size += walk(heap, child);
                children += 1;
                next = c.sibling;
            }
            assert_eq!(children, usize::from(n.degree));
            size
        }

        let mut total = 0;
        for (degree, slot) in self.trees.iter().enumerate() {
            if let Some(root) = *slot {
                assert_eq!(usize::from(self.nodes[root].degree), degree);
                assert!(self.nodes[root].parent.is_none());
                let size = walk(self, root);
                assert_eq!(size, 1 << degree);
                total += size;
            }
        }
        assert_eq!(total, self.len());
        assert_eq!(self.nodes.len(), self.len());
    }
}

impl<P: Priority> Default for BinomialHeap<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_mirrors_binary_representation() {
        let mut heap = BinomialHeap::new();
        for v in 0..13 {
            heap.insert(v, v as i32).unwrap();
        }
        heap.assert_valid();
        // 13 = 0b1101
        assert_eq!(heap.tree_degrees(), vec![0, 2, 3]);

        heap.extract_min().unwrap();
        heap.assert_valid();
        // 12 = 0b1100
        assert_eq!(heap.tree_degrees(), vec![2, 3]);
    }

    #[test]
    fn test_handle_follows_payload() {
        let mut heap = BinomialHeap::new();
        let handles: Vec<_> = (0..16).map(|v| heap.insert(v, 100 + v as i32).unwrap()).collect();

        // Vertex 15 sits deep in the single B4; bubbling it to the root
        // displaces every payload on its path.
        heap.decrease_key(&handles[15], 0).unwrap();
        heap.assert_valid();
        assert_eq!(heap.peek_min(), Ok((15, 0)));

        for (v, h) in handles.iter().enumerate() {
            let (vertex, _) = heap.get(h).unwrap();
            assert_eq!(vertex, v);
        }

        heap.decrease_key(&handles[7], 1).unwrap();
        heap.assert_valid();
        assert_eq!(heap.extract_min(), Ok((15, 0)));
        assert_eq!(heap.extract_min(), Ok((7, 1)));
        assert_eq!(heap.extract_min(), Ok((0, 100)));
        heap.assert_valid();
    }

    #[test]
    fn test_decrease_key_rejections() {
        let mut heap = BinomialHeap::new();
        let h = heap.insert(0, 10).unwrap();
        heap.insert(1, 20).unwrap();

        assert_eq!(heap.decrease_key(&h, 10), Err(HeapError::PriorityNotDecreased));
        assert_eq!(heap.get(&h), Some((0, 10)));

        heap.extract_min().unwrap();
        assert_eq!(heap.decrease_key(&h, 1), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_merge_carries() {
        let mut a = BinomialHeap::new();
        let mut b = BinomialHeap::new();
        for v in 0..7 {
            a.insert(v, v as i32 * 2).unwrap();
        }
        let mut handles = Vec::new();
        for v in 7..14 {
            handles.push(b.insert(v, v as i32 * 2 - 15).unwrap());
        }

        a.merge(b).unwrap();
        a.assert_valid();
        // 7 + 7 = 14 = 0b1110
        assert_eq!(a.tree_degrees(), vec![1, 2, 3]);
        assert_eq!(a.peek_min(), Ok((7, -1)));

        a.decrease_key(&handles[6], -5).unwrap();
        assert_eq!(a.extract_min(), Ok((13, -5)));
        a.assert_valid();
    }

    #[test]
    #[cfg(feature = "merge-check")]
    fn test_merge_rejects_overlap_when_checked() {
        let mut a = BinomialHeap::new();
        let mut b = BinomialHeap::new();
        a.insert(3, 1).unwrap();
        b.insert(3, 2).unwrap();
        assert_eq!(a.merge(b), Err(HeapError::DuplicateVertex(3)));
        assert_eq!(a.len(), 1);
    }
}
