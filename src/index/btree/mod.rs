//! B+ tree index.
//!
//! # Components
//! - [`BPlusTree`] - The tree handle (insert, delete, search, range scan)
//! - [`SharedBPlusTree`] - The same tree behind a reader/writer lock
//! - [`TreeStats`] - Node-read and restructuring counters
//! - [`Iter`] - Ascending iterator over the leaf chain
//!
//! Nodes live in an arena and refer to each other by [`NodeId`], so parent
//! and sibling links never own anything. Insert and delete recurse from the
//! root and hand structural changes back up as tagged results: a split for
//! the parent to absorb, or a borrow/merge whose separator update the parent
//! must apply.
//!
//! [`NodeId`]: crate::common::NodeId

mod arena;
mod delete;
mod insert;
mod iter;
mod node;
mod search;
mod shared;
mod stats;
mod tree;
mod validate;

pub use iter::Iter;
pub use shared::SharedBPlusTree;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BPlusTree;
