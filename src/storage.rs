//! Arena node storage shared by the heaps
//!
//! Heap nodes live in [`SlotMap`] arenas and refer to one another by
//! [`NodeRef`] instead of by pointer. A `NodeRef` pairs the id of the arena
//! that allocated the node with a generational slot key, so:
//!
//! - a reference to a removed node is detected (the slot generation moved on)
//!   instead of reading freed or reused memory;
//! - a reference minted by one heap is never mistaken for a node of another;
//! - merging two heaps adopts the other arena's slot map wholesale
//!   ([`NodeArena::absorb`]) without rewriting a single link, which keeps
//!   Fibonacci union O(1).
//!
//! [`VertexIndex`] maps vertex ids to their live node and is merged the same
//! way.

use crate::traits::{Handle, VertexId};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// SlotMap key type for arena storage
    pub struct SlotKey;
}

/// Identity of one arena allocation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable reference to a heap node, also used as the public heap handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    arena: ArenaId,
    key: SlotKey,
}

impl Handle for NodeRef {}

/// Generational node arena that can adopt other arenas in O(1) per block.
#[derive(Debug)]
pub struct NodeArena<N> {
    home: ArenaId,
    nodes: SlotMap<SlotKey, N>,
    absorbed: FxHashMap<ArenaId, SlotMap<SlotKey, N>>,
    len: usize,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeArena<N> {
    pub fn new() -> Self {
        NodeArena {
            home: ArenaId::fresh(),
            nodes: SlotMap::with_key(),
            absorbed: FxHashMap::default(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slot maps backing this arena (1 + adopted blocks still in use).
    #[cfg(test)]
    pub(crate) fn block_count(&self) -> usize {
        1 + self.absorbed.len()
    }

    pub fn insert(&mut self, node: N) -> NodeRef {
        self.insert_with(|_| node)
    }

    /// Insert a node that needs to know its own reference (e.g. a one-element ring).
    pub fn insert_with(&mut self, f: impl FnOnce(NodeRef) -> N) -> NodeRef {
        let home = self.home;
        let key = self.nodes.insert_with_key(|key| f(NodeRef { arena: home, key }));
        self.len += 1;
        NodeRef { arena: home, key }
    }

    pub fn get(&self, r: NodeRef) -> Option<&N> {
        if r.arena == self.home {
            self.nodes.get(r.key)
        } else {
            self.absorbed.get(&r.arena)?.get(r.key)
        }
    }

    pub fn get_mut(&mut self, r: NodeRef) -> Option<&mut N> {
        if r.arena == self.home {
            self.nodes.get_mut(r.key)
        } else {
            self.absorbed.get_mut(&r.arena)?.get_mut(r.key)
        }
    }

    pub fn contains(&self, r: NodeRef) -> bool {
        self.get(r).is_some()
    }

    pub fn remove(&mut self, r: NodeRef) -> Option<N> {
        let node = if r.arena == self.home {
            self.nodes.remove(r.key)
        } else {
            let block = self.absorbed.get_mut(&r.arena)?;
            let node = block.remove(r.key);
            if block.is_empty() {
                self.absorbed.remove(&r.arena);
            }
            node
        };
        if node.is_some() {
            self.len -= 1;
        }
        node
    }

    /// Adopt every node of `other`. References into `other` stay valid here.
    pub fn absorb(&mut self, other: NodeArena<N>) {
        let NodeArena {
            home,
            nodes,
            absorbed,
            len,
        } = other;
        if !nodes.is_empty() {
            self.absorbed.insert(home, nodes);
        }
        self.absorbed.extend(absorbed);
        self.len += len;
    }
}

impl<N> Index<NodeRef> for NodeArena<N> {
    type Output = N;

    fn index(&self, r: NodeRef) -> &N {
        match self.get(r) {
            Some(node) => node,
            None => panic!("dangling node reference {:?}", r),
        }
    }
}

impl<N> IndexMut<NodeRef> for NodeArena<N> {
    fn index_mut(&mut self, r: NodeRef) -> &mut N {
        match self.get_mut(r) {
            Some(node) => node,
            None => panic!("dangling node reference {:?}", r),
        }
    }
}

/// Vertex id to live node map, mergeable without rehashing.
#[derive(Debug, Default)]
pub struct VertexIndex {
    blocks: SmallVec<[FxHashMap<VertexId, NodeRef>; 1]>,
}

impl VertexIndex {
    pub fn new() -> Self {
        VertexIndex {
            blocks: SmallVec::new(),
        }
    }

    pub fn get(&self, vertex: VertexId) -> Option<NodeRef> {
        self.blocks.iter().find_map(|b| b.get(&vertex).copied())
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.get(vertex).is_some()
    }

    /// Record `vertex -> r`. The caller checks for duplicates first.
    pub fn insert(&mut self, vertex: VertexId, r: NodeRef) {
        if self.blocks.is_empty() {
            self.blocks.push(FxHashMap::default());
        }
        self.blocks[0].insert(vertex, r);
    }

    pub fn remove(&mut self, vertex: VertexId) -> Option<NodeRef> {
        let pos = self.blocks.iter().position(|b| b.contains_key(&vertex))?;
        let r = self.blocks[pos].remove(&vertex);
        if pos > 0 && self.blocks[pos].is_empty() {
            self.blocks.remove(pos);
        }
        r
    }

    /// Some vertex present in both indexes, if any.
    pub fn overlap(&self, other: &VertexIndex) -> Option<VertexId> {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .blocks
            .iter()
            .flat_map(|b| b.keys())
            .copied()
            .find(|&v| large.contains(v))
    }

    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_empty())
    }

    pub fn absorb(&mut self, other: VertexIndex) {
        self.blocks
            .extend(other.blocks.into_iter().filter(|b| !b.is_empty()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena: NodeArena<i32> = NodeArena::new();

        let r = arena.insert(42);
        assert_eq!(arena.get(r), Some(&42));
        arena[r] = 100;
        assert_eq!(arena[r], 100);
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.remove(r), Some(100));
        assert!(!arena.contains(r));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_stale_ref_not_confused_with_reused_slot() {
        let mut arena: NodeArena<&str> = NodeArena::new();
        let old = arena.insert("old");
        arena.remove(old);
        let new = arena.insert("new");

        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&"new"));
    }

    #[test]
    fn test_foreign_ref_rejected() {
        let mut a: NodeArena<i32> = NodeArena::new();
        let mut b: NodeArena<i32> = NodeArena::new();
        a.insert(1);
        let rb = b.insert(2);
        assert_eq!(a.get(rb), None);
    }

    #[test]
    fn test_absorb_keeps_refs_valid() {
        let mut a: NodeArena<i32> = NodeArena::new();
        let mut b: NodeArena<i32> = NodeArena::new();
        let ra = a.insert(1);
        let rb = b.insert(2);
        let rb2 = b.insert(3);

        a.absorb(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a[ra], 1);
        assert_eq!(a[rb], 2);
        assert_eq!(a.block_count(), 2);

        a.remove(rb);
        a.remove(rb2);
        assert_eq!(a.block_count(), 1);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_insert_with_sees_own_ref() {
        let mut arena: NodeArena<Option<NodeRef>> = NodeArena::new();
        let r = arena.insert_with(Some);
        assert_eq!(arena[r], Some(r));
    }

    #[test]
    fn test_vertex_index_merge() {
        let mut arena: NodeArena<()> = NodeArena::new();
        let r1 = arena.insert(());
        let r2 = arena.insert(());

        let mut a = VertexIndex::new();
        a.insert(1, r1);
        let mut b = VertexIndex::new();
        b.insert(2, r2);
        assert_eq!(a.overlap(&b), None);

        a.absorb(b);
        assert_eq!(a.get(2), Some(r2));
        assert_eq!(a.len(), 2);

        assert_eq!(a.remove(2), Some(r2));
        assert!(!a.contains(2));

        let mut c = VertexIndex::new();
        c.insert(1, r2);
        assert_eq!(a.overlap(&c), Some(1));
    }
}
