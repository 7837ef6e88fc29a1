//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Duplicate dataset: {0}")]
    DuplicateDataset(String),

    #[error("Invalid dataset name: {0}")]
    InvalidDatasetName(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] ::rusqlite::Error),
}
