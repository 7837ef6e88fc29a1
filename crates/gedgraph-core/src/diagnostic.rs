//! Non-fatal parse diagnostics

use serde::{Deserialize, Serialize};

/// Why a line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Fewer than two whitespace-separated tokens
    TooFewTokens,
    /// Leading token is not a non-negative integer
    InvalidLevel,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooFewTokens => "too few tokens",
            Self::InvalidLevel => "invalid level",
        }
    }
}

/// A skipped line, recorded alongside the best-effort result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub kind: DiagnosticKind,
    /// Offending line, trimmed
    pub text: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, text: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {:?}", self.line, self.kind.as_str(), self.text)
    }
}
