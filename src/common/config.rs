//! Configuration for B+ tree construction.

use crate::common::{Error, Result};

/// Smallest order a tree may be built with.
///
/// A node needs at least two keys of slack between its minimum and maximum
/// occupancy so that borrow and merge can both repair an underflow.
pub const MIN_ORDER: usize = 3;

/// Order used by [`TreeConfig::default`].
pub const DEFAULT_ORDER: usize = 5;

/// Shape parameters of a B+ tree.
///
/// The `order` is the maximum fan-out hint. A dense tree lets every node hold
/// up to `order` keys; a sparse tree splits at `ceil(order / 2)` keys, which
/// produces a deeper tree over the same key set.
///
/// # Example
/// ```
/// use bplustree::TreeConfig;
///
/// let dense = TreeConfig::dense(5).unwrap();
/// assert_eq!(dense.threshold(), 5);
/// assert_eq!(dense.min_leaf_keys(), 3);
///
/// let sparse = TreeConfig::sparse(5).unwrap();
/// assert_eq!(sparse.threshold(), 3);
///
/// assert!(TreeConfig::dense(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    order: usize,
    sparse: bool,
}

impl TreeConfig {
    /// Create a configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOrder`] if `order < MIN_ORDER`.
    pub fn new(order: usize, sparse: bool) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder {
                order,
                min: MIN_ORDER,
            });
        }
        Ok(Self { order, sparse })
    }

    /// Dense configuration: nodes split above `order` keys.
    pub fn dense(order: usize) -> Result<Self> {
        Self::new(order, false)
    }

    /// Sparse configuration: nodes split above `ceil(order / 2)` keys.
    pub fn sparse(order: usize) -> Result<Self> {
        Self::new(order, true)
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    /// Maximum number of keys a node may hold before it must split.
    #[inline]
    pub fn threshold(&self) -> usize {
        if self.sparse {
            self.order.div_ceil(2)
        } else {
            self.order
        }
    }

    /// Minimum number of keys a non-root leaf keeps after a delete.
    ///
    /// A leaf split of `threshold + 1` keys leaves this many on the left,
    /// and merging an underflowing leaf with one at the minimum never
    /// exceeds `threshold`.
    #[inline]
    pub fn min_leaf_keys(&self) -> usize {
        (self.threshold() + 1) / 2
    }

    /// Minimum number of keys a non-root internal node keeps after a delete.
    ///
    /// An internal split promotes its middle key, so the right half ends up
    /// with `floor(threshold / 2)` keys.
    #[inline]
    pub fn min_internal_keys(&self) -> usize {
        self.threshold() / 2
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            sparse: false,
        }
    }
}
