//! Common types shared across the crate.
//!
//! - Configuration (`TreeConfig`, order constants)
//! - Error types
//! - Identifiers (`NodeId`)

pub mod config;
pub mod error;
mod node_id;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;
