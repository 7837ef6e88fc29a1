//! Parser configuration

use crate::limits::{MAX_INPUT_BYTES, MAX_LINES};
use serde::{Deserialize, Serialize};

/// Settings for one [`crate::GedcomParser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Sniff the input and try the guessed encoding first
    #[serde(default = "default_true")]
    pub detect_encoding: bool,

    /// Encoding labels tried, in order, after the detected one
    #[serde(default = "default_fallback_encodings")]
    pub fallback_encodings: Vec<String>,

    /// Reject inputs larger than this many bytes
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Reject inputs with more lines than this
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            detect_encoding: default_true(),
            fallback_encodings: default_fallback_encodings(),
            max_input_bytes: default_max_input_bytes(),
            max_lines: default_max_lines(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detection(mut self, enabled: bool) -> Self {
        self.detect_encoding = enabled;
        self
    }

    pub fn with_fallback_encodings<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_encodings = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }

    pub fn with_max_lines(mut self, max: usize) -> Self {
        self.max_lines = max;
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_fallback_encodings() -> Vec<String> {
    vec![
        "utf-8".to_string(),
        "latin-1".to_string(),
        "windows-1252".to_string(),
    ]
}

fn default_max_input_bytes() -> usize {
    MAX_INPUT_BYTES
}

fn default_max_lines() -> usize {
    MAX_LINES
}
