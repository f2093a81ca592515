//! Slab of tree nodes addressed by [`NodeId`].
//!
//! The arena is the sole owner of every node. Parent pointers and leaf-chain
//! links are plain ids, so the tree has no reference cycles. Freed slots go
//! on a free list and are handed out again by the next allocation.

use crate::common::NodeId;
use crate::index::btree::node::Node;

#[derive(Debug)]
pub(crate) struct NodeArena<K> {
    /// Node slots; `None` marks a freed slot.
    slots: Vec<Option<Node<K>>>,

    /// Stack of freed slot ids (LIFO).
    free_list: Vec<NodeId>,
}

impl<K> NodeArena<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store a node and return its handle.
    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            debug_assert!(self.slots[id.0].is_none());
            self.slots[id.0] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId::new(self.slots.len() - 1)
        }
    }

    /// Remove a node from the arena, returning it.
    ///
    /// # Panics
    /// Panics if `id` does not refer to a live node.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K> {
        let node = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("free of dangling handle {}", id));
        self.free_list.push(id);
        node
    }

    /// # Panics
    /// Panics if `id` does not refer to a live node.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {}", id),
        }
    }

    /// # Panics
    /// Panics if `id` does not refer to a live node.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {}", id),
        }
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// Number of live nodes.
    pub(crate) fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_get() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let a = arena.alloc(Node::empty_leaf());
        let b = arena.alloc(Node::empty_leaf());

        assert_ne!(a, b);
        assert!(arena.contains(a));
        assert_eq!(arena.live_count(), 2);

        arena.get_mut(a).keys.push(7);
        assert_eq!(arena.get(a).keys, vec![7]);
    }

    #[test]
    fn test_free_recycles_slot() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let a = arena.alloc(Node::empty_leaf());
        let _b = arena.alloc(Node::empty_leaf());

        let freed = arena.free(a);
        assert!(freed.keys.is_empty());
        assert!(!arena.contains(a));
        assert_eq!(arena.live_count(), 1);

        let c = arena.alloc(Node::empty_leaf());
        assert_eq!(c, a);
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    #[should_panic(expected = "dangling node handle")]
    fn test_get_freed_panics() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let a = arena.alloc(Node::empty_leaf());
        arena.free(a);
        arena.get(a);
    }
}
