//! Exported graph: the node and connection lists handed to storage

use crate::individual::Individual;
use crate::relation::{Edge, EdgeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Node type for every exported individual
pub const PERSON_NODE_TYPE: &str = "Person";

/// Name used for individuals without a `NAME` line
pub const UNKNOWN_NAME: &str = "Unknown";

/// An exported person node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub sex: String,
    #[serde(rename = "birthYear", default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
}

impl From<&Individual> for Node {
    fn from(individual: &Individual) -> Self {
        Self {
            id: individual.id.clone(),
            name: individual
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            node_type: PERSON_NODE_TYPE.to_string(),
            sex: individual.sex.code().to_string(),
            birth_year: individual.birth_year,
        }
    }
}

/// An exported relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(rename = "type")]
    pub connection_type: EdgeKind,
}

impl From<Edge> for Connection {
    fn from(edge: Edge) -> Self {
        Self {
            from_node_id: edge.from,
            to_node_id: edge.to,
            connection_type: edge.kind,
        }
    }
}

/// Nodes plus connections
///
/// Order follows record order in the source and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl GraphExport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn connections_of(&self, kind: EdgeKind) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.connection_type == kind)
    }

    /// Connection endpoints that match no node id, sorted and de-duplicated
    pub fn dangling_references(&self) -> Vec<String> {
        let known: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.connections
            .iter()
            .flat_map(|c| [c.from_node_id.as_str(), c.to_node_id.as_str()])
            .filter(|id| !known.contains(id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Project individuals into nodes and edges into connections
pub fn export_graph<'a>(
    individuals: impl IntoIterator<Item = &'a Individual>,
    edges: Vec<Edge>,
) -> GraphExport {
    GraphExport {
        nodes: individuals.into_iter().map(Node::from).collect(),
        connections: edges.into_iter().map(Connection::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Sex;

    #[test]
    fn test_node_defaults() {
        let node = Node::from(&Individual::new("I1"));
        assert_eq!(node.name, "Unknown");
        assert_eq!(node.node_type, "Person");
        assert_eq!(node.sex, "U");
        assert!(node.birth_year.is_none());
    }

    #[test]
    fn test_node_json_shape() {
        let person = Individual::new("I1")
            .with_name("John Smith")
            .with_sex(Sex::Male)
            .with_birth_year(1950);
        let json = serde_json::to_value(Node::from(&person)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "I1",
                "name": "John Smith",
                "type": "Person",
                "sex": "M",
                "birthYear": 1950
            })
        );

        let json = serde_json::to_value(Node::from(&Individual::new("I2"))).unwrap();
        assert!(json.get("birthYear").is_none());
    }

    #[test]
    fn test_connection_json_shape() {
        let json = serde_json::to_value(Connection::from(Edge::spouse("I1", "I2"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"from_node_id": "I1", "to_node_id": "I2", "type": "Spouse"})
        );
    }

    #[test]
    fn test_export_keeps_unconnected_individuals() {
        let people = vec![Individual::new("I1"), Individual::new("I2")];
        let graph = export_graph(&people, vec![]);
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn test_dangling_references() {
        let people = vec![Individual::new("I1")];
        let graph = export_graph(
            &people,
            vec![
                Edge::parent_child("I1", "I9"),
                Edge::parent_child("I8", "I9"),
                Edge::spouse("I1", "I8"),
            ],
        );
        assert_eq!(graph.dangling_references(), vec!["I8", "I9"]);
        assert_eq!(graph.connections_of(EdgeKind::Spouse).count(), 1);
    }
}
