//! Deletion with underflow repair.
//!
//! A node that drops below its minimum occupancy repairs itself against its
//! siblings under the same parent, trying in order: borrow from the right,
//! borrow from the left, merge the right sibling in, merge into the left
//! sibling. It reports what it did as a [`Rebalance`], and the parent applies
//! the matching separator change. A parent that underflows because of a
//! merge repeats the same protocol against its own siblings.

use tracing::{debug, trace};

use crate::common::NodeId;
use crate::index::btree::stats::TreeStats;
use crate::index::btree::tree::BPlusTree;

/// Underflow repair performed by a child, with the boundary key the parent
/// needs.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Rebalance<K> {
    /// Nothing for the parent to do.
    None,

    /// Took one entry from the right sibling. The separator between this
    /// child and its right sibling becomes the boundary.
    BorrowedRight(K),

    /// Took one entry from the left sibling. The separator between the left
    /// sibling and this child becomes the boundary.
    BorrowedLeft(K),

    /// Absorbed the right sibling, which has been freed. The boundary is the
    /// first key of the merged node.
    MergedRight(K),

    /// Was absorbed into the left sibling and freed. The boundary is the
    /// first key of the surviving sibling.
    MergedLeft(K),
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Delete `key`. Returns `false` if it was not present, in which case the
    /// tree is left untouched.
    pub fn delete(&mut self, key: &K) -> bool {
        let before = self.len;
        let outcome = self.delete_from(self.root, key);
        // The root is exempt from minimum occupancy and never repairs itself.
        debug_assert!(outcome == Rebalance::None);
        self.collapse_root();
        self.len != before
    }

    fn delete_from(&mut self, id: NodeId, key: &K) -> Rebalance<K> {
        self.stats.record_node_read();
        if self.arena.get(id).is_leaf() {
            self.delete_from_leaf(id, key)
        } else {
            self.delete_from_internal(id, key)
        }
    }

    fn delete_from_leaf(&mut self, id: NodeId, key: &K) -> Rebalance<K> {
        let node = self.arena.get_mut(id);
        let Ok(pos) = node.keys.binary_search(key) else {
            return Rebalance::None;
        };
        node.keys.remove(pos);
        self.len -= 1;

        if node.is_root() || node.keys.len() >= self.config.min_leaf_keys() {
            return Rebalance::None;
        }
        self.rebalance_leaf(id)
    }

    fn delete_from_internal(&mut self, id: NodeId, key: &K) -> Rebalance<K> {
        let node = self.arena.get(id);
        let idx = node.child_index(key);
        let child = node.children()[idx];

        match self.delete_from(child, key) {
            Rebalance::None => Rebalance::None,
            Rebalance::BorrowedRight(boundary) => {
                self.arena.get_mut(id).keys[idx] = boundary;
                Rebalance::None
            }
            Rebalance::BorrowedLeft(boundary) => {
                self.arena.get_mut(id).keys[idx - 1] = boundary;
                Rebalance::None
            }
            Rebalance::MergedRight(_) => {
                let node = self.arena.get_mut(id);
                node.keys.remove(idx);
                node.children_mut().remove(idx + 1);
                self.after_child_merge(id)
            }
            Rebalance::MergedLeft(_) => {
                let node = self.arena.get_mut(id);
                node.keys.remove(idx - 1);
                node.children_mut().remove(idx);
                self.after_child_merge(id)
            }
        }
    }

    /// Check an internal node that just lost a separator and a child.
    fn after_child_merge(&mut self, id: NodeId) -> Rebalance<K> {
        let node = self.arena.get(id);
        assert_eq!(
            node.children().len(),
            node.keys.len() + 1,
            "{} lost track of its children during a merge",
            id
        );
        if node.is_root() || node.keys.len() >= self.config.min_internal_keys() {
            return Rebalance::None;
        }
        self.rebalance_internal(id)
    }

    /// Repair an underflowing leaf using its chain neighbours that share its
    /// parent.
    fn rebalance_leaf(&mut self, id: NodeId) -> Rebalance<K> {
        let min = self.config.min_leaf_keys();
        let node = self.arena.get(id);
        let parent = node.parent;
        let same_parent = |sibling: &NodeId| self.arena.get(*sibling).parent == parent;
        let right = node.next().filter(same_parent);
        let left = node.prev().filter(same_parent);

        if let Some(right) = right {
            let sibling = self.arena.get_mut(right);
            if sibling.keys.len() > min {
                let moved = sibling.keys.remove(0);
                let boundary = sibling.keys[0].clone();
                self.arena.get_mut(id).keys.push(moved);
                self.record_borrow(id, right, "right");
                return Rebalance::BorrowedRight(boundary);
            }
        }

        if let Some(left) = left {
            let sibling = self.arena.get_mut(left);
            let count = sibling.keys.len();
            if count > min {
                let moved = sibling.keys.remove(count - 1);
                let node = self.arena.get_mut(id);
                node.keys.insert(0, moved);
                let boundary = node.keys[0].clone();
                self.record_borrow(id, left, "left");
                return Rebalance::BorrowedLeft(boundary);
            }
        }

        if let Some(right) = right {
            self.absorb_leaf(id, right);
            self.record_merge(id, right, "right");
            return Rebalance::MergedRight(self.arena.get(id).keys[0].clone());
        }

        if let Some(left) = left {
            self.absorb_leaf(left, id);
            self.record_merge(left, id, "left");
            return Rebalance::MergedLeft(self.arena.get(left).keys[0].clone());
        }

        Rebalance::None
    }

    /// Move every key of `right` into `left`, unlink `right` from the leaf
    /// chain and free it.
    fn absorb_leaf(&mut self, left: NodeId, right: NodeId) {
        let removed = self.arena.free(right);
        let after = removed.next();

        let survivor = self.arena.get_mut(left);
        survivor.keys.extend(removed.keys);
        survivor.set_next(after);
        if let Some(after) = after {
            self.arena.get_mut(after).set_prev(Some(left));
        }
    }

    /// Repair an underflowing internal node using its neighbours in the
    /// parent's child list. Borrows rotate an entry through the parent
    /// separator; merges pull the separator down between the two halves.
    fn rebalance_internal(&mut self, id: NodeId) -> Rebalance<K> {
        let min = self.config.min_internal_keys();
        let Some(parent) = self.arena.get(id).parent else {
            return Rebalance::None;
        };
        let parent_node = self.arena.get(parent);
        let siblings = parent_node.children();
        let pos = siblings
            .iter()
            .position(|&child| child == id)
            .unwrap_or_else(|| panic!("{} is missing from its parent {}", id, parent));
        let left = pos.checked_sub(1).map(|i| siblings[i]);
        let right = siblings.get(pos + 1).copied();
        let left_separator = left.map(|_| parent_node.keys[pos - 1].clone());
        let right_separator = right.map(|_| parent_node.keys[pos].clone());

        if let (Some(right), Some(separator)) = (right, right_separator.clone()) {
            let sibling = self.arena.get_mut(right);
            if sibling.keys.len() > min {
                let boundary = sibling.keys.remove(0);
                let moved = sibling.children_mut().remove(0);

                let node = self.arena.get_mut(id);
                node.keys.push(separator);
                node.children_mut().push(moved);
                self.arena.get_mut(moved).parent = Some(id);
                self.record_borrow(id, right, "right");
                return Rebalance::BorrowedRight(boundary);
            }
        }

        if let (Some(left), Some(separator)) = (left, left_separator.clone()) {
            let sibling = self.arena.get_mut(left);
            let count = sibling.keys.len();
            if count > min {
                let boundary = sibling.keys.remove(count - 1);
                let moved = sibling.children_mut().remove(count);

                let node = self.arena.get_mut(id);
                node.keys.insert(0, separator);
                node.children_mut().insert(0, moved);
                self.arena.get_mut(moved).parent = Some(id);
                self.record_borrow(id, left, "left");
                return Rebalance::BorrowedLeft(boundary);
            }
        }

        if let (Some(right), Some(separator)) = (right, right_separator) {
            self.absorb_internal(id, right, separator);
            self.record_merge(id, right, "right");
            return Rebalance::MergedRight(self.arena.get(id).keys[0].clone());
        }

        if let (Some(left), Some(separator)) = (left, left_separator) {
            self.absorb_internal(left, id, separator);
            self.record_merge(left, id, "left");
            return Rebalance::MergedLeft(self.arena.get(left).keys[0].clone());
        }

        Rebalance::None
    }

    /// Concatenate `left`, the parent separator and `right` into `left`,
    /// reparent the moved children and free `right`.
    fn absorb_internal(&mut self, left: NodeId, right: NodeId, separator: K) {
        let mut removed = self.arena.free(right);
        let moved = std::mem::take(removed.children_mut());

        let survivor = self.arena.get_mut(left);
        survivor.keys.push(separator);
        survivor.keys.extend(removed.keys);
        survivor.children_mut().extend_from_slice(&moved);
        for child in moved {
            self.arena.get_mut(child).parent = Some(left);
        }
    }

    /// Replace an internal root that has a single child with that child.
    fn collapse_root(&mut self) {
        let root = self.arena.get(self.root);
        if root.is_leaf() || root.children().len() != 1 {
            return;
        }
        let child = root.children()[0];
        self.arena.free(self.root);
        self.arena.get_mut(child).parent = None;
        self.root = child;

        TreeStats::record(&self.stats.root_collapses);
        debug!(root = child.0, depth = self.depth(), "collapsed root");
    }

    fn record_borrow(&self, node: NodeId, sibling: NodeId, direction: &'static str) {
        TreeStats::record(&self.stats.borrows);
        trace!(
            target: "bplustree::borrow",
            node = node.0,
            sibling = sibling.0,
            direction,
            "borrowed from sibling"
        );
    }

    fn record_merge(&self, survivor: NodeId, removed: NodeId, direction: &'static str) {
        TreeStats::record(&self.stats.merges);
        trace!(
            target: "bplustree::merge",
            survivor = survivor.0,
            removed = removed.0,
            direction,
            "merged siblings"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TreeConfig;

    fn tree(order: usize, keys: impl IntoIterator<Item = u32>) -> BPlusTree<u32> {
        BPlusTree::from_keys(TreeConfig::dense(order).unwrap(), keys)
    }

    fn root_keys(tree: &BPlusTree<u32>) -> Vec<u32> {
        tree.arena.get(tree.root).keys.clone()
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let mut tree = tree(5, 1..=10);
        let live = tree.arena.live_count();
        assert!(!tree.delete(&42));
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.arena.live_count(), live);
    }

    #[test]
    fn test_delete_from_root_leaf_never_rebalances() {
        let mut tree = tree(5, [1, 2, 3]);
        assert!(tree.delete(&2));
        assert!(tree.delete(&1));
        assert!(tree.delete(&3));
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 1);
        assert!(tree.arena.get(tree.root).keys.is_empty());
    }

    #[test]
    fn test_borrow_from_right_updates_separator() {
        // Leaves [1 2 3] [4 5 6 7] under root [4].
        let mut tree = tree(5, 1..=7);
        assert_eq!(root_keys(&tree), vec![4]);

        tree.delete(&1);

        assert_eq!(root_keys(&tree), vec![5]);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.stats().snapshot().borrows, 1);
    }

    #[test]
    fn test_borrow_from_left_updates_separator() {
        // Leaves [0 1 2 3] [4 5 6] under root [4].
        let mut tree = tree(5, 1..=6);
        tree.insert(0);
        assert_eq!(root_keys(&tree), vec![4]);

        tree.delete(&6);

        assert_eq!(root_keys(&tree), vec![3]);
        assert!(tree.search(&3));
        assert!(tree.search(&4));
        assert_eq!(tree.stats().snapshot().borrows, 1);
    }

    #[test]
    fn test_merge_collapses_root() {
        // Leaves [1 2 3] [4 5 6]: neither sibling can lend a key.
        let mut tree = tree(5, 1..=6);
        assert_eq!(tree.depth(), 2);

        tree.delete(&6);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        let snapshot = tree.stats().snapshot();
        assert_eq!(snapshot.merges, 1);
        assert_eq!(snapshot.root_collapses, 1);
        assert_eq!(tree.arena.live_count(), 1);
    }

    #[test]
    fn test_merge_right_when_leftmost_underflows() {
        let mut tree = tree(5, 1..=6);
        tree.delete(&1);

        let root = tree.arena.get(tree.root);
        assert!(root.is_leaf());
        assert_eq!(root.keys, vec![2, 3, 4, 5, 6]);
        assert_eq!(root.prev(), None);
        assert_eq!(root.next(), None);
    }

    #[test]
    fn test_internal_underflow_propagates() {
        let mut tree = tree(3, 1..=40);
        let depth = tree.depth();
        assert!(depth >= 3);

        for key in 1..=40 {
            tree.delete(&key);
            tree.check_invariants().unwrap();
        }

        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.arena.live_count(), 1);
        assert!(tree.stats().snapshot().root_collapses >= (depth - 1) as u64);
    }

    #[test]
    fn test_delete_twice_is_idempotent() {
        let mut once = tree(4, 1..=30);
        let mut twice = tree(4, 1..=30);

        once.delete(&17);
        twice.delete(&17);
        assert!(!twice.delete(&17));

        assert_eq!(once.to_string(), twice.to_string());
    }
}
