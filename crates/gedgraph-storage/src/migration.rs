//! Schema versioning for persistent backends
//!
//! Each backend records the version its schema is at and knows how to apply
//! one numbered step. Steps run in order and are recorded one at a time, so an
//! interrupted upgrade resumes where it stopped.

use crate::{StorageError, StorageResult};

/// Version a freshly opened store is brought up to
pub const CURRENT_VERSION: u32 = 1;

/// One numbered schema step
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    pub version: u32,
    pub description: &'static str,
}

/// Every schema step, oldest first
pub fn get_migrations() -> Vec<SchemaVersion> {
    vec![SchemaVersion {
        version: 1,
        description: "datasets, ordered nodes and connections",
    }]
}

/// A store whose schema can be upgraded step by step
pub trait Migratable {
    fn get_schema_version(&self) -> StorageResult<u32>;

    fn set_schema_version(&self, version: u32) -> StorageResult<()>;

    /// Apply the single step that produces `version`
    fn run_migration(&self, version: u32) -> StorageResult<()>;

    /// Apply every step between the stored version and `target`
    ///
    /// A store written by a newer release is refused rather than touched.
    fn migrate_to(&self, target: u32) -> StorageResult<()> {
        let stored = self.get_schema_version()?;
        if stored > target {
            return Err(StorageError::Migration(format!(
                "store is at schema v{} but this build only knows v{}",
                stored, target
            )));
        }

        let pending: Vec<SchemaVersion> = get_migrations()
            .into_iter()
            .filter(|m| m.version > stored && m.version <= target)
            .collect();
        if pending.is_empty() {
            tracing::debug!("Schema at v{}, nothing to apply", stored);
            return Ok(());
        }

        for step in pending {
            tracing::info!("Applying schema v{}: {}", step.version, step.description);
            self.run_migration(step.version)?;
            self.set_schema_version(step.version)?;
        }
        Ok(())
    }

    fn migrate_to_latest(&self) -> StorageResult<()> {
        self.migrate_to(CURRENT_VERSION)
    }
}
