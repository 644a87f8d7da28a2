//! Pattern syntax errors

use crate::config::compile_time::patterns::{MAX_PATTERN_LENGTH, MAX_PATTERN_SEGMENTS};
use crate::logging::codes;

/// Rejected pattern or name syntax; the store is never modified on error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern is empty")]
    Empty,

    #[error("Empty segment in '{pattern}'")]
    EmptySegment { pattern: String },

    #[error("Segment '{segment}' in '{pattern}' is not an identifier")]
    InvalidSegment { pattern: String, segment: String },

    #[error("Wildcard must be the last segment in '{pattern}'")]
    MisplacedWildcard { pattern: String },

    #[error("Name '{name}' must not contain a wildcard")]
    WildcardName { name: String },

    #[error("Pattern too long: {length} characters (max {MAX_PATTERN_LENGTH})")]
    TooLong { length: usize },

    #[error("Too many segments: {count} (max {MAX_PATTERN_SEGMENTS})")]
    TooManySegments { count: usize },
}

impl PatternError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PatternError::Empty => codes::patterns::EMPTY_PATTERN,
            PatternError::EmptySegment { .. } | PatternError::InvalidSegment { .. } => {
                codes::patterns::INVALID_SEGMENT
            }
            PatternError::MisplacedWildcard { .. } => codes::patterns::MISPLACED_WILDCARD,
            PatternError::WildcardName { .. } => codes::patterns::WILDCARD_NAME,
            PatternError::TooLong { .. } | PatternError::TooManySegments { .. } => {
                codes::patterns::PATTERN_TOO_LONG
            }
        }
    }
}
