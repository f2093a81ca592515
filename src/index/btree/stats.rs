//! Tree operation statistics.
//!
//! `node_reads` is the I/O-cost proxy: every node a descent or leaf-chain
//! scan touches would be one page read in a disk-resident tree. Comparing it
//! between a dense and a sparse tree over the same keys shows the cost of
//! the extra levels.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by tree operations.
///
/// All fields are atomic so that read-only operations (`search`,
/// `range_search`) can count node visits through `&self`.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations: the counters are
/// independent and only need atomicity.
///
/// # Example
/// ```
/// use bplustree::TreeStats;
///
/// let stats = TreeStats::new();
/// stats.record_node_read();
/// assert_eq!(stats.snapshot().node_reads, 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Nodes visited by descents and leaf-chain scans.
    pub node_reads: AtomicU64,

    /// Leaves split by an overflowing insert.
    pub leaf_splits: AtomicU64,

    /// Internal nodes split by an overflowing insert.
    pub internal_splits: AtomicU64,

    /// Underflows repaired by moving one key from a sibling.
    pub borrows: AtomicU64,

    /// Underflows repaired by merging two siblings.
    pub merges: AtomicU64,

    /// Times the root split and a new root was created above it.
    pub root_promotions: AtomicU64,

    /// Times an internal root with a single child was replaced by that child.
    pub root_collapses: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            node_reads: AtomicU64::new(0),
            leaf_splits: AtomicU64::new(0),
            internal_splits: AtomicU64::new(0),
            borrows: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            root_promotions: AtomicU64::new(0),
            root_collapses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_node_read(&self) {
        self.node_reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            node_reads: self.node_reads.load(Ordering::Relaxed),
            leaf_splits: self.leaf_splits.load(Ordering::Relaxed),
            internal_splits: self.internal_splits.load(Ordering::Relaxed),
            borrows: self.borrows.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            root_promotions: self.root_promotions.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.node_reads.store(0, Ordering::Relaxed);
        self.leaf_splits.store(0, Ordering::Relaxed);
        self.internal_splits.store(0, Ordering::Relaxed);
        self.borrows.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);
        self.root_promotions.store(0, Ordering::Relaxed);
        self.root_collapses.store(0, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`TreeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub node_reads: u64,
    pub leaf_splits: u64,
    pub internal_splits: u64,
    pub borrows: u64,
    pub merges: u64,
    pub root_promotions: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Total splits of either node kind.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.internal_splits
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ node_reads: {}, splits: {}, borrows: {}, merges: {}, root_promotions: {}, root_collapses: {} }}",
            self.node_reads,
            self.splits(),
            self.borrows,
            self.merges,
            self.root_promotions,
            self.root_collapses
        )
    }
}
