//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes and their metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Character source error codes
pub mod source {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E006");
    pub const INVALID_ENCODING: Code = Code::new("E007");
    pub const IO_ERROR: Code = Code::new("E008");
}

/// Tokenizer error codes
pub mod lexical {
    use super::Code;

    pub const UNTERMINATED_QUOTE: Code = Code::new("E020");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E021");
    pub const END_OF_INPUT: Code = Code::new("E022");
}

/// Delimiter balance error codes
pub mod balance {
    use super::Code;

    pub const UNEXPECTED_CLOSER: Code = Code::new("E040");
    pub const MISMATCHED_CLOSER: Code = Code::new("E041");
    pub const UNCLOSED_DELIMITER: Code = Code::new("E042");
}

/// Token stream usage error codes
pub mod stream {
    use super::Code;

    pub const INVALID_PUSHBACK: Code = Code::new("E050");
}

/// Pattern syntax error codes
pub mod patterns {
    use super::Code;

    pub const EMPTY_PATTERN: Code = Code::new("E060");
    pub const INVALID_SEGMENT: Code = Code::new("E061");
    pub const MISPLACED_WILDCARD: Code = Code::new("E062");
    pub const WILDCARD_NAME: Code = Code::new("E063");
    pub const PATTERN_TOO_LONG: Code = Code::new("E064");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_ERROR: Code = Code::new("E080");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const SOURCE_OPENED: Code = Code::new("I006");
    pub const SCAN_COMPLETE: Code = Code::new("I020");
    pub const RULES_LOADED: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// (code, category, severity, recoverable, description)
const REGISTRY_ENTRIES: &[(&str, &str, Severity, bool, &str)] = &[
    ("ERR001", "System", Severity::Critical, false, "Critical internal error"),
    ("ERR002", "System", Severity::Critical, false, "System initialization failure"),
    ("E005", "Source", Severity::Medium, false, "Source file not found"),
    ("E006", "Source", Severity::Medium, false, "Source file exceeds maximum size"),
    ("E007", "Source", Severity::High, false, "Source is not valid UTF-8"),
    ("E008", "Source", Severity::High, false, "I/O failure while reading source"),
    ("E020", "Lexical", Severity::High, false, "Quoted literal not closed before end of input"),
    ("E021", "Lexical", Severity::High, false, "Block comment not closed before end of input"),
    ("E022", "Lexical", Severity::Low, true, "Token requested after end of input"),
    ("E040", "Balance", Severity::Medium, true, "Closing delimiter without an opener"),
    ("E041", "Balance", Severity::Medium, true, "Closing delimiter does not match its opener"),
    ("E042", "Balance", Severity::Medium, true, "Delimiter still open at end of input"),
    ("E050", "Stream", Severity::Low, true, "Pushed back token was not the last one read"),
    ("E060", "Pattern", Severity::Low, true, "Pattern or name is empty"),
    ("E061", "Pattern", Severity::Low, true, "Pattern segment is not an identifier"),
    ("E062", "Pattern", Severity::Low, true, "Wildcard is only allowed as the last segment"),
    ("E063", "Pattern", Severity::Low, true, "Lookup name must not be a wildcard"),
    ("E064", "Pattern", Severity::Low, true, "Pattern exceeds length limits"),
    ("E080", "Configuration", Severity::Medium, false, "Configuration could not be loaded"),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|&(code, category, severity, recoverable, description)| {
                (
                    code,
                    ErrorMetadata {
                        code,
                        category,
                        severity,
                        recoverable,
                        description,
                    },
                )
            })
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Low)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_category(code: &str) -> &'static str {
    if let Some(metadata) = get_error_metadata(code) {
        return metadata.category;
    }
    match code.chars().next() {
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}
