//! Family (grouping) records

use serde::{Deserialize, Serialize};

/// A family record linking spouses to children by individual id
///
/// References are never resolved here; an id that names no individual is
/// kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// Identifier with the `@` wrapper removed
    pub id: String,

    /// `HUSB` and `WIFE` references in source order
    #[serde(default)]
    pub spouses: Vec<String>,

    /// `CHIL` references in source order
    #[serde(default)]
    pub children: Vec<String>,
}

impl Family {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            spouses: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_spouse(mut self, id: impl Into<String>) -> Self {
        self.spouses.push(id.into());
        self
    }

    pub fn with_child(mut self, id: impl Into<String>) -> Self {
        self.children.push(id.into());
        self
    }
}
