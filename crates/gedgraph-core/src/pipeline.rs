//! End-to-end parse: bytes in, graph out

use crate::config::ParserConfig;
use crate::diagnostic::Diagnostic;
use crate::encoding::{self, TextEncoding};
use crate::error::Result;
use crate::graph::GraphExport;
use crate::limits::{validate_input_size, validate_line_count};
use crate::parser::{step, ParseState, RecordSet};
use crate::tokenizer::{split_lines, tokenize_line};
use serde::{Deserialize, Serialize};

/// Typed records from one input, before derivation
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub records: RecordSet,
    pub diagnostics: Vec<Diagnostic>,
    /// Encoding that decoded the input
    pub encoding: TextEncoding,
    pub line_count: usize,
}

impl ParsedDocument {
    /// Derive edges and export the graph
    pub fn into_outcome(self) -> ParseOutcome {
        let graph = self.records.to_graph();
        let stats = ParseStats {
            encoding: self.encoding.name().to_string(),
            lines: self.line_count,
            individuals: self.records.individuals.len(),
            families: self.records.families.len(),
            nodes: graph.nodes.len(),
            connections: graph.connections.len(),
            diagnostics: self.diagnostics.len(),
        };
        tracing::info!(
            "Exported {} nodes and {} connections",
            stats.nodes,
            stats.connections
        );
        ParseOutcome {
            graph,
            diagnostics: self.diagnostics,
            stats,
        }
    }
}

/// Summary counts for one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub encoding: String,
    pub lines: usize,
    pub individuals: usize,
    pub families: usize,
    pub nodes: usize,
    pub connections: usize,
    pub diagnostics: usize,
}

/// Best-effort graph plus the diagnostics recorded on the way
///
/// Whether diagnostics block acceptance is the caller's decision.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub graph: GraphExport,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ParseStats,
}

impl ParseOutcome {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parser configured once and reused for any number of inputs
///
/// Every call owns its own records and state; nothing is shared between
/// calls.
#[derive(Debug, Clone, Default)]
pub struct GedcomParser {
    config: ParserConfig,
}

impl GedcomParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decode and parse into typed records
    ///
    /// Fails without partial output when the input is over a limit or no
    /// candidate encoding decodes the whole buffer.
    pub fn parse_records(&self, bytes: &[u8]) -> Result<ParsedDocument> {
        validate_input_size(bytes.len(), self.config.max_input_bytes)?;

        let candidates = encoding::candidates(bytes, &self.config)?;
        let (text, encoding) = encoding::decode_with_fallback(bytes, &candidates)?;

        let mut records = RecordSet::new();
        let mut diagnostics = Vec::new();
        let mut state = ParseState::Idle;
        let mut line_count = 0;

        for (number, raw) in split_lines(&text) {
            validate_line_count(number, self.config.max_lines)?;
            line_count = number;
            match tokenize_line(number, raw) {
                Ok(line) => state = step(state, &line, &mut records),
                Err(diagnostic) => {
                    tracing::warn!("Skipping invalid {}", diagnostic);
                    diagnostics.push(diagnostic);
                }
            }
        }

        tracing::info!(
            "Parsed {} individuals and {} families from {} lines ({})",
            records.individuals.len(),
            records.families.len(),
            line_count,
            encoding
        );

        Ok(ParsedDocument {
            records,
            diagnostics,
            encoding,
            line_count,
        })
    }

    /// Decode, parse, derive edges and export
    pub fn parse(&self, bytes: &[u8]) -> Result<ParseOutcome> {
        Ok(self.parse_records(bytes)?.into_outcome())
    }
}
