//! Error types for Gedgraph Core

use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias using Gedgraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal parse errors
///
/// Anything that can be skipped with a diagnostic is not an `Error`; see
/// [`crate::diagnostic::Diagnostic`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input could not be decoded with any candidate encoding (tried: {})", tried.join(", "))]
    Decode { tried: Vec<String> },

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("Input limit exceeded: {0}")]
    Limit(#[from] LimitError),
}
