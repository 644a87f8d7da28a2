//! Dotted-name patterns

use super::error::PatternError;
use crate::config::compile_time::patterns::{MAX_PATTERN_LENGTH, MAX_PATTERN_SEGMENTS};
use crate::lexical::chars::is_identifier;
use std::fmt;
use std::str::FromStr;

/// A parsed pattern such as `com.example.Widget` or `com.example.*`
///
/// Segments may be separated by `.` or `/`; both parse to the same pattern
/// and display with `.`. The lone pattern `*` is the root wildcard and
/// matches every name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern {
    segments: Vec<String>,
    wildcard: bool,
}

impl Pattern {
    /// Parse a lookup name: pattern syntax without a wildcard
    pub fn name(text: &str) -> Result<Self, PatternError> {
        let pattern: Pattern = text.parse()?;
        if pattern.wildcard {
            return Err(PatternError::WildcardName {
                name: text.to_string(),
            });
        }
        Ok(pattern)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let length = text.chars().count();
        if length == 0 {
            return Err(PatternError::Empty);
        }
        if length > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong { length });
        }

        let parts: Vec<&str> = text.split(['.', '/']).collect();
        if parts.len() > MAX_PATTERN_SEGMENTS {
            return Err(PatternError::TooManySegments { count: parts.len() });
        }

        let mut segments = Vec::with_capacity(parts.len());
        let mut wildcard = false;
        for (index, part) in parts.iter().enumerate() {
            if *part == "*" {
                if index + 1 != parts.len() {
                    return Err(PatternError::MisplacedWildcard {
                        pattern: text.to_string(),
                    });
                }
                wildcard = true;
            } else if part.is_empty() {
                return Err(PatternError::EmptySegment {
                    pattern: text.to_string(),
                });
            } else if !is_identifier(part) {
                return Err(PatternError::InvalidSegment {
                    pattern: text.to_string(),
                    segment: part.to_string(),
                });
            } else {
                segments.push(part.to_string());
            }
        }

        Ok(Self { segments, wildcard })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))?;
        match (self.wildcard, self.segments.is_empty()) {
            (true, true) => f.write_str("*"),
            (true, false) => f.write_str(".*"),
            (false, _) => Ok(()),
        }
    }
}
