//! A B+ tree behind a single reader/writer lock.
//!
//! The tree itself is single-threaded. `SharedBPlusTree` serializes writers
//! and lets readers run in parallel by wrapping the whole tree in one
//! `parking_lot::RwLock`; no latch is ever taken inside the rebalancing code.

use parking_lot::RwLock;

use crate::common::{Result, TreeConfig};
use crate::index::btree::stats::StatsSnapshot;
use crate::index::btree::tree::BPlusTree;

/// Thread-safe handle to a [`BPlusTree`].
///
/// # Thread Safety
/// - `search`, `range_search`, `len`, `keys`: shared lock
/// - `insert`, `delete`, `build`: exclusive lock
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use bplustree::{SharedBPlusTree, TreeConfig};
///
/// let tree = Arc::new(SharedBPlusTree::new(TreeConfig::dense(4).unwrap()));
/// let writer = Arc::clone(&tree);
/// std::thread::spawn(move || writer.build(0..100u32)).join().unwrap();
///
/// assert!(tree.search(&42));
/// assert_eq!(tree.len(), 100);
/// ```
#[derive(Debug)]
pub struct SharedBPlusTree<K> {
    inner: RwLock<BPlusTree<K>>,
}

impl<K: Ord + Clone> SharedBPlusTree<K> {
    pub fn new(config: TreeConfig) -> Self {
        Self::from_tree(BPlusTree::new(config))
    }

    /// # Errors
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) if
    /// `order < 3`.
    pub fn with_order(order: usize, sparse: bool) -> Result<Self> {
        Ok(Self::from_tree(BPlusTree::with_order(order, sparse)?))
    }

    pub fn from_tree(tree: BPlusTree<K>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    pub fn insert(&self, key: K) -> bool {
        self.inner.write().insert(key)
    }

    pub fn delete(&self, key: &K) -> bool {
        self.inner.write().delete(key)
    }

    /// Insert every key under one exclusive lock.
    pub fn build<I>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.inner.write().build(keys);
    }

    pub fn search(&self, key: &K) -> bool {
        self.inner.read().search(key)
    }

    pub fn range_search(&self, low: &K, high: &K) -> Vec<K> {
        self.inner.read().range_search(low, high)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// All keys in ascending order, copied out under one shared lock.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().iter().cloned().collect()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats().snapshot()
    }

    /// Run the invariant checker under a shared lock.
    pub fn check_invariants(&self) -> Result<()> {
        self.inner.read().check_invariants()
    }

    /// Consume the handle and return the tree.
    pub fn into_inner(self) -> BPlusTree<K> {
        self.inner.into_inner()
    }
}
