//! System Architect Storage Layer
//!
//! Implements the [`ModelStore`](sysarch_domain::ModelStore) trait with an
//! in-memory arena and JSON snapshots on disk.
//!
//! # Architecture
//!
//! - One id-ordered table per entity kind; rows reference each other by id
//! - An edge index keyed by (node, kind) answers outgoing/incoming queries
//! - Snapshots serialize the tables only; the index is rebuilt on load
//!
//! # Examples
//!
//! ```no_run
//! use sysarch_store::MemoryStore;
//!
//! let store = MemoryStore::open("model.json").unwrap();
//! store.save("model.json").unwrap();
//! ```

#![warn(missing_docs)]

mod index;
mod memory;
mod snapshot;

pub use memory::MemoryStore;

use sysarch_domain::ModelError;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Validation, lookup or scoring failure from the model
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not a valid model
    #[error("Snapshot format error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// The model error behind this failure, if any
    pub fn as_model(&self) -> Option<&ModelError> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}
