//! Derived relationship edges

use crate::family::Family;
use serde::{Deserialize, Serialize};

/// Kind of derived relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "Parent-Child")]
    ParentChild,
    #[serde(rename = "Spouse")]
    Spouse,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentChild => "Parent-Child",
            Self::Spouse => "Spouse",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge between two individual ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    pub fn parent_child(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::new(parent, child, EdgeKind::ParentChild)
    }

    pub fn spouse(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::new(first, second, EdgeKind::Spouse)
    }
}

/// Edges contributed by one completed family
///
/// Every spouse gets a parent-child edge to every child, spouse-major. A
/// spouse edge from the first to the second spouse is added only when
/// exactly two spouses were recorded.
pub fn family_edges(family: &Family) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(family.spouses.len() * family.children.len() + 1);
    for spouse in &family.spouses {
        for child in &family.children {
            edges.push(Edge::parent_child(spouse, child));
        }
    }
    if let [first, second] = family.spouses.as_slice() {
        edges.push(Edge::spouse(first, second));
    }
    edges
}

/// Derive all edges from completed families, in family order
pub fn derive_edges<'a>(families: impl IntoIterator<Item = &'a Family>) -> Vec<Edge> {
    families.into_iter().flat_map(family_edges).collect()
}
