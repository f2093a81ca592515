//! bplustree - An in-memory B+ tree index with dense and sparse fan-out.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           bplustree                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │          SharedBPlusTree (index/btree/shared)            │   │
//! │  │        one RwLock: many readers or one writer            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               BPlusTree (index/btree/tree)               │   │
//! │  │   insert · delete · search · range_search · build        │   │
//! │  │   root promotion on split, root collapse on merge        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Nodes (index/btree/node)                │   │
//! │  │   Leaf: keys + prev/next chain   Internal: separators    │   │
//! │  │   split / borrow / merge signals bubble up to the parent │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 NodeArena (index/btree/arena)            │   │
//! │  │        slab of nodes addressed by NodeId + free list     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (TreeConfig, NodeId, Error)
//! - [`index`] - Index structures (B+ tree)
//!
//! # Quick Start
//! ```
//! use bplustree::{BPlusTree, TreeConfig};
//!
//! let mut dense = BPlusTree::new(TreeConfig::dense(5).unwrap());
//! let mut sparse = BPlusTree::new(TreeConfig::sparse(5).unwrap());
//! dense.build(1..=200u32);
//! sparse.build(1..=200u32);
//!
//! // Sparse nodes split earlier, so the tree is at least as deep.
//! assert!(sparse.depth() >= dense.depth());
//! assert_eq!(dense.range_search(&10, &20), sparse.range_search(&10, &20));
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, NodeId, Result, TreeConfig};

pub use index::btree::{BPlusTree, Iter, SharedBPlusTree, StatsSnapshot, TreeStats};
