//! Ascending key iterator over the leaf chain.

use crate::common::NodeId;
use crate::index::btree::arena::NodeArena;

/// Iterator returned by [`BPlusTree::iter`](crate::BPlusTree::iter).
pub struct Iter<'a, K> {
    arena: &'a NodeArena<K>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(arena: &'a NodeArena<K>, first_leaf: NodeId) -> Self {
        Self {
            arena,
            leaf: Some(first_leaf),
            pos: 0,
        }
    }
}

impl<'a, K: Ord> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.leaf {
            let node = self.arena.get(id);
            if let Some(key) = node.keys.get(self.pos) {
                self.pos += 1;
                return Some(key);
            }
            self.leaf = node.next();
            self.pos = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::common::TreeConfig;
    use crate::index::btree::tree::BPlusTree;

    #[test]
    fn test_iter_crosses_leaves_in_order() {
        let keys = [9u32, 2, 7, 4, 1, 8, 3, 6, 5, 10, 12, 11];
        let tree = BPlusTree::from_keys(TreeConfig::sparse(3).unwrap(), keys);

        assert!(tree.leaf_count() > 1);
        let collected: Vec<u32> = tree.iter().copied().collect();
        assert_eq!(collected, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_empty_tree() {
        let tree: BPlusTree<u32> = BPlusTree::default();
        assert_eq!(tree.iter().next(), None);
    }
}
