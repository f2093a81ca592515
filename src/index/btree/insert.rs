//! Insertion with leaf and internal node splitting.

use tracing::{debug, trace};

use crate::common::NodeId;
use crate::index::btree::node::Node;
use crate::index::btree::stats::TreeStats;
use crate::index::btree::tree::BPlusTree;

/// A node overflowed and split in two.
///
/// The caller must insert `separator` into its keys and `sibling` into its
/// children immediately to the right of the node that split.
#[derive(Debug)]
pub(crate) struct Split<K> {
    pub(crate) separator: K,
    pub(crate) sibling: NodeId,
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Insert `key`. Returns `false` if it was already present, in which case
    /// the tree is left untouched.
    pub fn insert(&mut self, key: K) -> bool {
        let before = self.len;
        if let Some(split) = self.insert_into(self.root, key) {
            self.promote_root(split);
        }
        self.len != before
    }

    fn insert_into(&mut self, id: NodeId, key: K) -> Option<Split<K>> {
        self.stats.record_node_read();
        if self.arena.get(id).is_leaf() {
            self.insert_into_leaf(id, key)
        } else {
            self.insert_into_internal(id, key)
        }
    }

    fn insert_into_leaf(&mut self, id: NodeId, key: K) -> Option<Split<K>> {
        let threshold = self.config.threshold();
        let node = self.arena.get_mut(id);
        let pos = match node.keys.binary_search(&key) {
            Ok(_) => return None,
            Err(pos) => pos,
        };
        node.keys.insert(pos, key);
        self.len += 1;

        if node.keys.len() <= threshold {
            return None;
        }
        Some(self.split_leaf(id))
    }

    fn insert_into_internal(&mut self, id: NodeId, key: K) -> Option<Split<K>> {
        let node = self.arena.get(id);
        let idx = node.child_index(&key);
        let child = node.children()[idx];

        let Split { separator, sibling } = self.insert_into(child, key)?;

        let node = self.arena.get_mut(id);
        debug_assert!(idx == 0 || node.keys[idx - 1] < separator);
        debug_assert!(idx == node.keys.len() || separator < node.keys[idx]);
        node.keys.insert(idx, separator);
        node.children_mut().insert(idx + 1, sibling);
        let overflow = node.keys.len() > self.config.threshold();
        self.arena.get_mut(sibling).parent = Some(id);

        if overflow {
            Some(self.split_internal(id))
        } else {
            None
        }
    }

    /// Move the upper half of a leaf into a new leaf spliced in after it.
    fn split_leaf(&mut self, id: NodeId) -> Split<K> {
        let node = self.arena.get_mut(id);
        let mid = node.keys.len() / 2;
        let right_keys = node.keys.split_off(mid);
        let parent = node.parent;
        let next = node.next();

        let separator = right_keys[0].clone();
        let sibling = self
            .arena
            .alloc(Node::leaf(right_keys, parent, Some(id), next));
        if let Some(next) = next {
            self.arena.get_mut(next).set_prev(Some(sibling));
        }
        self.arena.get_mut(id).set_next(Some(sibling));

        TreeStats::record(&self.stats.leaf_splits);
        trace!(
            target: "bplustree::split",
            left = id.0,
            right = sibling.0,
            left_keys = mid,
            "split leaf"
        );
        Split { separator, sibling }
    }

    /// Split an internal node around its middle key, which is promoted.
    fn split_internal(&mut self, id: NodeId) -> Split<K> {
        let node = self.arena.get_mut(id);
        let mid = node.keys.len() / 2;
        let right_keys = node.keys.split_off(mid + 1);
        let separator = node.keys.remove(mid);
        let right_children = node.children_mut().split_off(mid + 1);
        let parent = node.parent;

        let moved = right_children.clone();
        let sibling = self
            .arena
            .alloc(Node::internal(right_keys, right_children, parent));
        for child in moved {
            self.arena.get_mut(child).parent = Some(sibling);
        }

        TreeStats::record(&self.stats.internal_splits);
        trace!(
            target: "bplustree::split",
            left = id.0,
            right = sibling.0,
            left_keys = mid,
            "split internal node"
        );
        Split { separator, sibling }
    }

    /// Grow the tree by one level after the root split.
    fn promote_root(&mut self, split: Split<K>) {
        let old_root = self.root;
        let Split { separator, sibling } = split;
        let new_root = self
            .arena
            .alloc(Node::internal(vec![separator], vec![old_root, sibling], None));
        self.arena.get_mut(old_root).parent = Some(new_root);
        self.arena.get_mut(sibling).parent = Some(new_root);
        self.root = new_root;

        TreeStats::record(&self.stats.root_promotions);
        debug!(root = new_root.0, depth = self.depth(), "promoted new root");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TreeConfig;

    fn dense(order: usize) -> BPlusTree<u32> {
        BPlusTree::new(TreeConfig::dense(order).unwrap())
    }

    fn leaves(tree: &BPlusTree<u32>) -> Vec<Vec<u32>> {
        let mut out = Vec::new();
        let mut cursor = Some(tree.leftmost_leaf());
        while let Some(id) = cursor {
            let node = tree.arena.get(id);
            out.push(node.keys.clone());
            cursor = node.next();
        }
        out
    }

    #[test]
    fn test_insert_without_split() {
        let mut tree = dense(5);
        for key in [3, 1, 5, 2, 4] {
            assert!(tree.insert(key));
        }
        assert_eq!(tree.depth(), 1);
        assert_eq!(leaves(&tree), vec![vec![1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut tree = dense(5);
        assert!(tree.insert(7));
        assert!(!tree.insert(7));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.stats().snapshot().splits(), 0);
    }

    #[test]
    fn test_leaf_split_promotes_root() {
        let mut tree = dense(5);
        tree.build(1..=6);

        // Six keys overflow a threshold of five: mid = 3.
        assert_eq!(leaves(&tree), vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let root = tree.arena.get(tree.root);
        assert_eq!(root.keys, vec![4]);
        assert!(root.is_root());
        for &child in root.children() {
            assert_eq!(tree.arena.get(child).parent, Some(tree.root));
        }

        let snapshot = tree.stats().snapshot();
        assert_eq!(snapshot.leaf_splits, 1);
        assert_eq!(snapshot.root_promotions, 1);
    }

    #[test]
    fn test_split_in_middle_of_chain_relinks_neighbours() {
        let mut tree = dense(3);
        tree.build([10, 20, 30, 40, 50, 60]);
        // Fill the first leaf until it splits between two existing leaves.
        tree.build([11, 12]);

        let flat: Vec<u32> = leaves(&tree).into_iter().flatten().collect();
        assert_eq!(flat, vec![10, 11, 12, 20, 30, 40, 50, 60]);

        let mut cursor = Some(tree.leftmost_leaf());
        let mut prev = None;
        while let Some(id) = cursor {
            assert_eq!(tree.arena.get(id).prev(), prev);
            prev = Some(id);
            cursor = tree.arena.get(id).next();
        }
    }

    #[test]
    fn test_internal_split_promotes_middle_key() {
        let mut tree = dense(3);
        tree.build(1..=20);

        assert!(tree.depth() >= 3);
        assert!(tree.stats().snapshot().internal_splits >= 1);

        // A promoted key moves up; it does not stay in the node that split.
        let root = tree.arena.get(tree.root);
        for &child in root.children() {
            let child = tree.arena.get(child);
            assert!(!child.is_leaf());
            assert!(child.keys.iter().all(|key| !root.keys.contains(key)));
        }
    }
}
