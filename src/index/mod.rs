//! Index structures.
//!
//! - [`btree`] - B+ tree over totally ordered keys

pub mod btree;
