//! Input limits for resource protection
//!
//! Memory grows with record count and the parser has no backpressure, so the
//! only controls are an upper bound on the raw input and on the line count.

/// Maximum raw input size (64 MiB)
pub const MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;

/// Maximum number of lines in one input (2 million)
pub const MAX_LINES: usize = 2_000_000;

/// Limit violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
    InputTooLarge { len: usize, max: usize },
    TooManyLines { count: usize, max: usize },
}

impl std::fmt::Display for LimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputTooLarge { len, max } => {
                write!(f, "Input too large: {} bytes (max {})", len, max)
            }
            Self::TooManyLines { count, max } => {
                write!(f, "Too many lines: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for LimitError {}

/// Validate raw input size
pub fn validate_input_size(len: usize, max: usize) -> Result<(), LimitError> {
    if len > max {
        return Err(LimitError::InputTooLarge { len, max });
    }
    Ok(())
}

/// Validate line count
pub fn validate_line_count(count: usize, max: usize) -> Result<(), LimitError> {
    if count > max {
        return Err(LimitError::TooManyLines { count, max });
    }
    Ok(())
}
