//! Gedgraph Storage - Dataset storage backends
//!
//! This crate persists the node and connection lists produced by
//! `gedgraph-core`, grouped into named datasets. Backends are constructed
//! by the caller and passed to whatever needs them.

#![allow(clippy::result_large_err)]

pub mod dataset;
pub mod error;
pub mod memory;
pub mod migration;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use dataset::{Dataset, DatasetId, GraphStats};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use migration::{Migratable, SchemaVersion, CURRENT_VERSION};
pub use traits::StorageBackend;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;
