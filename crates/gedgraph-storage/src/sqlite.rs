//! SQLite storage backend

use crate::dataset::{Dataset, DatasetId};
use crate::error::{StorageError, StorageResult};
use crate::migration::Migratable;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use gedgraph_core::{Connection as GraphConnection, GraphExport, Node};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.migrate_to_latest()?;
        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn dataset_exists(conn: &Connection, dataset_id: &DatasetId) -> StorageResult<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM datasets WHERE id = ?1",
                params![dataset_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert or update by id; fails if another dataset already has the name
    fn upsert_dataset(conn: &Connection, dataset: &Dataset) -> StorageResult<()> {
        let data = serde_json::to_string(dataset)?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM datasets WHERE name = ?1",
                params![dataset.name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            if id != dataset.id.to_string() {
                return Err(StorageError::DuplicateDataset(dataset.name.clone()));
            }
        }

        conn.execute(
            "INSERT INTO datasets (id, name, data) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, data = excluded.data",
            params![dataset.id.to_string(), dataset.name, data],
        )?;
        Ok(())
    }

    /// Swap the stored graph; callers run this inside a transaction
    fn replace_graph(
        conn: &Connection,
        dataset_id: &DatasetId,
        graph: &GraphExport,
    ) -> StorageResult<()> {
        let id = dataset_id.to_string();
        conn.execute("DELETE FROM nodes WHERE dataset_id = ?1", params![id])?;
        conn.execute("DELETE FROM connections WHERE dataset_id = ?1", params![id])?;

        let mut insert_node = conn.prepare(
            "INSERT INTO nodes (dataset_id, seq, node_id, data) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (seq, node) in graph.nodes.iter().enumerate() {
            let data = serde_json::to_string(node)?;
            insert_node.execute(params![id, seq as i64, node.id, data])?;
        }

        let mut insert_connection = conn.prepare(
            "INSERT INTO connections (dataset_id, seq, from_node_id, to_node_id, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (seq, connection) in graph.connections.iter().enumerate() {
            let data = serde_json::to_string(connection)?;
            insert_connection.execute(params![
                id,
                seq as i64,
                connection.from_node_id,
                connection.to_node_id,
                data
            ])?;
        }

        tracing::debug!(
            "Saved {} nodes and {} connections for dataset {}",
            graph.nodes.len(),
            graph.connections.len(),
            dataset_id
        );
        Ok(())
    }
}

impl Migratable for SqliteStorage {
    fn get_schema_version(&self) -> StorageResult<u32> {
        let conn = self.lock()?;
        let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    fn set_schema_version(&self, version: u32) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", version))?;
        Ok(())
    }

    fn run_migration(&self, version: u32) -> StorageResult<()> {
        let conn = self.lock()?;
        match version {
            1 => conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS datasets (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    data TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS nodes (
                    dataset_id TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
                    seq INTEGER NOT NULL,
                    node_id TEXT NOT NULL,
                    data TEXT NOT NULL,
                    PRIMARY KEY (dataset_id, seq)
                );

                CREATE TABLE IF NOT EXISTS connections (
                    dataset_id TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
                    seq INTEGER NOT NULL,
                    from_node_id TEXT NOT NULL,
                    to_node_id TEXT NOT NULL,
                    data TEXT NOT NULL,
                    PRIMARY KEY (dataset_id, seq)
                );

                CREATE INDEX IF NOT EXISTS idx_nodes_node_id ON nodes(dataset_id, node_id);
                CREATE INDEX IF NOT EXISTS idx_connections_from ON connections(dataset_id, from_node_id);
                CREATE INDEX IF NOT EXISTS idx_connections_to ON connections(dataset_id, to_node_id);
                "#,
            )?,
            other => {
                return Err(StorageError::Migration(format!(
                    "No migration defined for version {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn initialize(&self) -> StorageResult<()> {
        self.migrate_to_latest()
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let conn = self.lock()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        let conn = self.lock()?;
        Self::upsert_dataset(&conn, dataset)
    }

    async fn get_dataset(&self, name: &str) -> StorageResult<Option<Dataset>> {
        let conn = self.lock()?;

        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM datasets WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_datasets(&self) -> StorageResult<Vec<Dataset>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT data FROM datasets ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut datasets = Vec::new();
        for row in rows {
            datasets.push(serde_json::from_str(&row?)?);
        }

        Ok(datasets)
    }

    async fn delete_dataset(&self, name: &str) -> StorageResult<()> {
        let conn = self.lock()?;

        let deleted = conn.execute("DELETE FROM datasets WHERE name = ?1", params![name])?;
        if deleted == 0 {
            return Err(StorageError::DatasetNotFound(name.to_string()));
        }

        Ok(())
    }

    async fn save_graph(&self, dataset_id: &DatasetId, graph: &GraphExport) -> StorageResult<()> {
        let mut conn = self.lock()?;
        if !Self::dataset_exists(&conn, dataset_id)? {
            return Err(StorageError::DatasetNotFound(dataset_id.to_string()));
        }

        let tx = conn.transaction()?;
        Self::replace_graph(&tx, dataset_id, graph)?;
        tx.commit()?;
        Ok(())
    }

    async fn save_dataset_graph(
        &self,
        dataset: &Dataset,
        graph: &GraphExport,
    ) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::upsert_dataset(&tx, dataset)?;
        Self::replace_graph(&tx, &dataset.id, graph)?;
        tx.commit()?;
        Ok(())
    }

    async fn load_graph(&self, dataset_id: &DatasetId) -> StorageResult<GraphExport> {
        let conn = self.lock()?;
        if !Self::dataset_exists(&conn, dataset_id)? {
            return Err(StorageError::DatasetNotFound(dataset_id.to_string()));
        }
        let id = dataset_id.to_string();

        let mut stmt = conn.prepare("SELECT data FROM nodes WHERE dataset_id = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
        let mut nodes = Vec::new();
        for row in rows {
            let node: Node = serde_json::from_str(&row?)?;
            nodes.push(node);
        }

        let mut stmt =
            conn.prepare("SELECT data FROM connections WHERE dataset_id = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
        let mut connections = Vec::new();
        for row in rows {
            let connection: GraphConnection = serde_json::from_str(&row?)?;
            connections.push(connection);
        }

        Ok(GraphExport { nodes, connections })
    }
}
