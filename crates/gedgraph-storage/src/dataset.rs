//! Dataset (named graph collection) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(pub Ulid);

impl DatasetId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection of nodes and connections, stored independently of
/// other datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique identifier
    pub id: DatasetId,

    /// Dataset name (unique, alphanumeric with underscores/hyphens)
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Encoding the imported file was decoded with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_encoding: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last import timestamp
    pub updated_at: DateTime<Utc>,
}

impl Dataset {
    /// Create a new dataset
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DatasetId::new(),
            name: name.into(),
            description: None,
            source_encoding: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.source_encoding = Some(encoding.into());
        self
    }

    /// Mark the dataset as freshly imported
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate dataset name (alphanumeric, underscores, hyphens only)
    pub fn validate_name(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= 100
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    }
}

/// Counts for a stored graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub parent_child: usize,
    pub spouse: usize,
}

impl GraphStats {
    pub fn connections(&self) -> usize {
        self.parent_child + self.spouse
    }
}
