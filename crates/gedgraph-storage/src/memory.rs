//! In-memory storage backend for testing

use crate::dataset::{Dataset, DatasetId};
use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use gedgraph_core::GraphExport;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage backend
///
/// Useful for testing and temporary storage.
pub struct MemoryStorage {
    datasets: RwLock<HashMap<String, Dataset>>,
    graphs: RwLock<HashMap<DatasetId, GraphExport>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            datasets: RwLock::new(HashMap::new()),
            graphs: RwLock::new(HashMap::new()),
        }
    }

    fn has_dataset_id(&self, id: &DatasetId) -> StorageResult<bool> {
        let datasets = self
            .datasets
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        Ok(datasets.values().any(|d| &d.id == id))
    }
}

/// Insert or update by id; a changed name renames the existing entry
fn upsert_dataset(
    datasets: &mut HashMap<String, Dataset>,
    dataset: &Dataset,
) -> StorageResult<()> {
    if let Some(existing) = datasets.get(&dataset.name) {
        if existing.id != dataset.id {
            return Err(StorageError::DuplicateDataset(dataset.name.clone()));
        }
    }
    datasets.retain(|name, d| d.id != dataset.id || name == &dataset.name);
    datasets.insert(dataset.name.clone(), dataset.clone());
    Ok(())
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    // Dataset operations

    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        let mut datasets = self
            .datasets
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        upsert_dataset(&mut datasets, dataset)
    }

    async fn get_dataset(&self, name: &str) -> StorageResult<Option<Dataset>> {
        let datasets = self
            .datasets
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        Ok(datasets.get(name).cloned())
    }

    async fn list_datasets(&self) -> StorageResult<Vec<Dataset>> {
        let datasets = self
            .datasets
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        let mut all: Vec<Dataset> = datasets.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn delete_dataset(&self, name: &str) -> StorageResult<()> {
        let removed = {
            let mut datasets = self
                .datasets
                .write()
                .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
            datasets.remove(name)
        };
        let dataset = removed.ok_or_else(|| StorageError::DatasetNotFound(name.to_string()))?;

        let mut graphs = self
            .graphs
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        graphs.remove(&dataset.id);
        Ok(())
    }

    // Graph operations

    async fn save_graph(&self, dataset_id: &DatasetId, graph: &GraphExport) -> StorageResult<()> {
        if !self.has_dataset_id(dataset_id)? {
            return Err(StorageError::DatasetNotFound(dataset_id.to_string()));
        }
        let mut graphs = self
            .graphs
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        graphs.insert(dataset_id.clone(), graph.clone());
        Ok(())
    }

    async fn save_dataset_graph(
        &self,
        dataset: &Dataset,
        graph: &GraphExport,
    ) -> StorageResult<()> {
        let mut datasets = self
            .datasets
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        let mut graphs = self
            .graphs
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        upsert_dataset(&mut datasets, dataset)?;
        graphs.insert(dataset.id.clone(), graph.clone());
        Ok(())
    }

    async fn load_graph(&self, dataset_id: &DatasetId) -> StorageResult<GraphExport> {
        if !self.has_dataset_id(dataset_id)? {
            return Err(StorageError::DatasetNotFound(dataset_id.to_string()));
        }
        let graphs = self
            .graphs
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        Ok(graphs.get(dataset_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0 @I1@ INDI\n0 @I2@ INDI\n0 @I3@ INDI\n\
                          0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n1 CHIL @I3@\n";

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.initialize().await.unwrap();

        // Create a dataset
        let dataset = Dataset::new("test-dataset");
        storage.save_dataset(&dataset).await.unwrap();

        // Store a parsed graph
        let graph = gedgraph_core::parse(SAMPLE.as_bytes()).unwrap().graph;
        storage.save_graph(&dataset.id, &graph).await.unwrap();

        // Read it back
        let loaded = storage.load_graph(&dataset.id).await.unwrap();
        assert_eq!(loaded, graph);

        let stats = storage.graph_stats(&dataset.id).await.unwrap();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.parent_child, 2);
        assert_eq!(stats.spouse, 1);

        // Delete the dataset
        storage.delete_dataset("test-dataset").await.unwrap();
        assert!(storage.get_dataset("test-dataset").await.unwrap().is_none());
        assert!(storage.load_graph(&dataset.id).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_dataset_name() {
        let storage = MemoryStorage::new();
        storage.save_dataset(&Dataset::new("tree")).await.unwrap();
        let err = storage.save_dataset(&Dataset::new("tree")).await.unwrap_err();
        assert!(matches!(err, StorageError::DuplicateDataset(_)));
    }

    #[tokio::test]
    async fn test_rename_keeps_single_dataset() {
        let storage = MemoryStorage::new();
        let mut dataset = Dataset::new("old");
        storage.save_dataset(&dataset).await.unwrap();
        let graph = gedgraph_core::parse(SAMPLE.as_bytes()).unwrap().graph;
        storage.save_graph(&dataset.id, &graph).await.unwrap();

        dataset.name = "new".to_string();
        storage.save_dataset(&dataset).await.unwrap();

        let names: Vec<_> = storage
            .list_datasets()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["new"]);
        assert!(storage.get_dataset("old").await.unwrap().is_none());
        assert_eq!(storage.load_graph(&dataset.id).await.unwrap(), graph);
    }

    #[tokio::test]
    async fn test_save_dataset_graph_is_all_or_nothing() {
        let storage = MemoryStorage::new();
        let original = Dataset::new("tree").with_description("first import");
        let graph = gedgraph_core::parse(SAMPLE.as_bytes()).unwrap().graph;
        storage.save_dataset_graph(&original, &graph).await.unwrap();
        assert_eq!(storage.load_graph(&original.id).await.unwrap(), graph);

        let clash = Dataset::new("tree").with_description("second import");
        let err = storage
            .save_dataset_graph(&clash, &GraphExport::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateDataset(_)));

        let stored = storage.get_dataset("tree").await.unwrap().unwrap();
        assert_eq!(stored.description.as_deref(), Some("first import"));
        assert_eq!(storage.load_graph(&original.id).await.unwrap(), graph);
        assert!(storage.load_graph(&clash.id).await.is_err());
    }

    #[tokio::test]
    async fn test_save_graph_unknown_dataset() {
        let storage = MemoryStorage::new();
        let err = storage
            .save_graph(&DatasetId::new(), &GraphExport::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DatasetNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_datasets_sorted() {
        let storage = MemoryStorage::new();
        storage.save_dataset(&Dataset::new("b")).await.unwrap();
        storage.save_dataset(&Dataset::new("a")).await.unwrap();
        let names: Vec<_> = storage
            .list_datasets()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
