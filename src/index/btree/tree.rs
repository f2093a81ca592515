//! The tree handle: owns the arena and the current root.

use std::fmt;

use tracing::debug;

use crate::common::{NodeId, Result, TreeConfig};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::iter::Iter;
use crate::index::btree::node::Node;
use crate::index::btree::stats::TreeStats;

/// An ordered set of keys stored as a B+ tree.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                        BPlusTree                         │
/// │   root ─▶ [ 13 | 17 ]                    (internal)      │
/// │          ╱     │     ╲                                   │
/// │   [1 .. 12] ⇄ [13 .. 16] ⇄ [17 .. 21]    (leaf chain)    │
/// │                                                          │
/// │   arena: Vec<Option<Node>> + free list   (sole owner)    │
/// │   stats: TreeStats                       (atomic)        │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// Every operation enters here and recurses into the nodes. Nodes report
/// structural changes back up (a split to absorb, a borrow or merge to
/// apply to the separators), and the tree handles the root: a split root
/// gets a new parent, and an internal root left with one child is replaced
/// by it.
///
/// # Example
/// ```
/// use bplustree::{BPlusTree, TreeConfig};
///
/// let mut tree = BPlusTree::new(TreeConfig::dense(5).unwrap());
/// tree.build(1..22);
///
/// assert!(!tree.search(&0));
/// assert_eq!(tree.range_search(&13, &100), (13..22).collect::<Vec<_>>());
///
/// tree.delete(&21);
/// assert_eq!(tree.len(), 20);
/// ```
#[derive(Debug)]
pub struct BPlusTree<K> {
    pub(crate) arena: NodeArena<K>,
    pub(crate) root: NodeId,
    pub(crate) config: TreeConfig,
    pub(crate) len: usize,
    pub(crate) stats: TreeStats,
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Create an empty tree. The root starts as an empty leaf.
    pub fn new(config: TreeConfig) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::empty_leaf());
        debug!(
            order = config.order(),
            sparse = config.is_sparse(),
            threshold = config.threshold(),
            "created B+ tree"
        );
        Self {
            arena,
            root,
            config,
            len: 0,
            stats: TreeStats::new(),
        }
    }

    /// Create an empty tree from raw parameters.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) if
    /// `order < 3`.
    pub fn with_order(order: usize, sparse: bool) -> Result<Self> {
        Ok(Self::new(TreeConfig::new(order, sparse)?))
    }

    /// Create a tree and insert `keys` in the given order.
    pub fn from_keys<I>(config: TreeConfig, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::new(config);
        tree.build(keys);
        tree
    }

    /// Insert every key in iteration order.
    ///
    /// This is a sequence of ordinary inserts, not a bulk load.
    pub fn build<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.insert(key);
        }
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Number of levels, counting the leaf level. An empty tree has depth 1.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut id = self.root;
        while let Some(&first) = self.arena.get(id).children().first() {
            depth += 1;
            id = first;
        }
        depth
    }

    /// Number of leaves in the leaf chain.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = Some(self.leftmost_leaf());
        while let Some(id) = cursor {
            count += 1;
            cursor = self.arena.get(id).next();
        }
        count
    }

    /// Ascending iterator over all keys, following the leaf chain.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.arena, self.leftmost_leaf())
    }

    pub(crate) fn leftmost_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Some(&first) = self.arena.get(id).children().first() {
            id = first;
        }
        id
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, level: usize) -> fmt::Result
    where
        K: fmt::Display,
    {
        let node = self.arena.get(id);
        write!(f, "{:indent$}[", "", indent = level * 2)?;
        for (i, key) in node.keys.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", key)?;
        }
        writeln!(f, "]")?;
        for &child in node.children() {
            self.fmt_node(f, child, level + 1)?;
        }
        Ok(())
    }
}

impl<K: Ord + Clone> Default for BPlusTree<K> {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl<K: Ord + Clone> Extend<K> for BPlusTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        self.build(keys);
    }
}

impl<'a, K: Ord + Clone> IntoIterator for &'a BPlusTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Preorder dump, one node per line, indented by level.
impl<K: Ord + Clone + fmt::Display> fmt::Display for BPlusTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_new_tree_is_empty() {
        let tree: BPlusTree<u32> = BPlusTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_with_order_validates() {
        assert!(matches!(
            BPlusTree::<u32>::with_order(2, false),
            Err(Error::InvalidOrder { order: 2, .. })
        ));
        assert!(BPlusTree::<u32>::with_order(3, true).is_ok());
    }

    #[test]
    fn test_display_preorder() {
        let tree = BPlusTree::from_keys(TreeConfig::dense(3).unwrap(), 1..=4u32);
        // Leaf [1 2 3 4] splits at mid 2.
        assert_eq!(tree.to_string(), "[3]\n  [1 2]\n  [3 4]\n");
    }

    #[test]
    fn test_extend_and_into_iter() {
        let mut tree = BPlusTree::new(TreeConfig::dense(4).unwrap());
        tree.extend([5u32, 1, 3]);
        let keys: Vec<u32> = (&tree).into_iter().copied().collect();
        assert_eq!(keys, vec![1, 3, 5]);
    }
}
