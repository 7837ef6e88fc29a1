//! Gedgraph Core - GEDCOM parsing and relationship graph derivation
//!
//! This crate turns raw GEDCOM bytes into typed individual and family
//! records, then derives a person graph with parent-child and spouse edges
//! ready to be handed to a storage backend.

pub mod config;
pub mod diagnostic;
pub mod encoding;
pub mod error;
pub mod family;
pub mod graph;
pub mod individual;
pub mod limits;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod relation;
pub mod tokenizer;

pub use config::ParserConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use family::Family;
pub use graph::{Connection, GraphExport, Node};
pub use individual::{Individual, Sex};
pub use limits::LimitError;
pub use parser::{ParseState, RecordSet};
pub use pipeline::{GedcomParser, ParseOutcome, ParseStats, ParsedDocument};
pub use registry::{Handle, Registry};
pub use relation::{Edge, EdgeKind};

/// Parse with the default configuration
pub fn parse(bytes: &[u8]) -> Result<ParseOutcome> {
    GedcomParser::default().parse(bytes)
}
