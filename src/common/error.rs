//! Error types for the B+ tree index.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the index can report.
///
/// Tree operations themselves never fail once a tree is constructed:
/// duplicate inserts, deletes of absent keys and empty ranges are all
/// well-defined no-ops.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested order leaves no room for borrow/merge repair.
    #[error("Invalid order {order}: must be at least {min}")]
    InvalidOrder { order: usize, min: usize },

    /// A structural check found the tree in an inconsistent state.
    ///
    /// This indicates a bug in the rebalancing code, never bad input.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}
