//! Point lookup and range scan.

use crate::common::NodeId;
use crate::index::btree::tree::BPlusTree;

impl<K: Ord + Clone> BPlusTree<K> {
    /// Return `true` if `key` is stored in the tree.
    pub fn search(&self, key: &K) -> bool {
        let leaf = self.find_leaf(key);
        self.arena.get(leaf).keys.binary_search(key).is_ok()
    }

    /// Return every stored key in `[low, high]`, ascending.
    ///
    /// An inverted range (`low > high`) yields an empty vector.
    pub fn range_search(&self, low: &K, high: &K) -> Vec<K> {
        let mut out = Vec::new();
        if low > high {
            return out;
        }

        let mut cursor = Some(self.find_leaf(low));
        let mut first = true;
        while let Some(id) = cursor {
            if !first {
                self.stats.record_node_read();
            }
            first = false;

            let node = self.arena.get(id);
            for key in &node.keys {
                if key > high {
                    return out;
                }
                if key >= low {
                    out.push(key.clone());
                }
            }
            cursor = node.next();
        }
        out
    }

    /// Descend from the root to the leaf whose range covers `key`.
    fn find_leaf(&self, key: &K) -> NodeId {
        let mut id = self.root;
        loop {
            self.stats.record_node_read();
            let node = self.arena.get(id);
            if node.is_leaf() {
                return id;
            }
            id = node.children()[node.child_index(key)];
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::common::TreeConfig;
    use crate::index::btree::tree::BPlusTree;

    fn scenario_tree() -> BPlusTree<u32> {
        BPlusTree::from_keys(TreeConfig::dense(5).unwrap(), 1..22)
    }

    #[test]
    fn test_search_present_and_absent() {
        let tree = scenario_tree();
        for key in 1..22 {
            assert!(tree.search(&key), "missing {}", key);
        }
        assert!(!tree.search(&0));
        assert!(!tree.search(&22));
    }

    #[test]
    fn test_search_separator_keys() {
        // Every separator equals the first key of the leaf to its right.
        let tree = scenario_tree();
        let root = tree.arena.get(tree.root);
        for key in &root.keys {
            assert!(tree.search(key));
        }
    }

    #[test]
    fn test_range_search() {
        let tree = scenario_tree();
        assert_eq!(tree.range_search(&13, &100), (13..22).collect::<Vec<_>>());
        assert_eq!(tree.range_search(&0, &3), vec![1, 2, 3]);
        assert_eq!(tree.range_search(&7, &7), vec![7]);
        assert_eq!(tree.range_search(&1, &21).len(), 21);
    }

    #[test]
    fn test_range_search_empty_cases() {
        let tree = scenario_tree();
        assert!(tree.range_search(&10, &5).is_empty());
        assert!(tree.range_search(&30, &40).is_empty());

        let empty: BPlusTree<u32> = BPlusTree::default();
        assert!(empty.range_search(&0, &100).is_empty());
    }

    #[test]
    fn test_search_counts_one_read_per_level() {
        let tree = scenario_tree();
        tree.stats().reset();

        tree.search(&17);

        assert_eq!(tree.stats().snapshot().node_reads, tree.depth() as u64);
    }
}
