//! Storage backend trait definitions

use crate::dataset::{Dataset, DatasetId, GraphStats};
use crate::error::StorageResult;
use async_trait::async_trait;
use gedgraph_core::{EdgeKind, GraphExport};

/// Trait for storage backend implementations
///
/// Backends receive the parser's node and connection lists and serve them
/// back per dataset. They never parse and never validate references.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Dataset Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a dataset (insert or update by name)
    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()>;

    /// Get a dataset by name
    async fn get_dataset(&self, name: &str) -> StorageResult<Option<Dataset>>;

    /// Get all datasets, ordered by name
    async fn list_datasets(&self) -> StorageResult<Vec<Dataset>>;

    /// Delete a dataset and its graph
    async fn delete_dataset(&self, name: &str) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the graph for a dataset (replaces existing)
    async fn save_graph(&self, dataset_id: &DatasetId, graph: &GraphExport) -> StorageResult<()>;

    /// Save a dataset and replace its graph in one step
    ///
    /// On error neither the dataset record nor the stored graph changes.
    async fn save_dataset_graph(
        &self,
        dataset: &Dataset,
        graph: &GraphExport,
    ) -> StorageResult<()>;

    /// Load the graph for a dataset, in the order it was saved
    async fn load_graph(&self, dataset_id: &DatasetId) -> StorageResult<GraphExport>;

    /// Node and connection counts for a dataset
    async fn graph_stats(&self, dataset_id: &DatasetId) -> StorageResult<GraphStats> {
        let graph = self.load_graph(dataset_id).await?;
        Ok(GraphStats {
            nodes: graph.nodes.len(),
            parent_child: graph.connections_of(EdgeKind::ParentChild).count(),
            spouse: graph.connections_of(EdgeKind::Spouse).count(),
        })
    }
}
