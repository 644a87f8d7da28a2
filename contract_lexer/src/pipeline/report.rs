//! Scan results

use crate::lexical::LexerError;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A token together with the line it starts on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedToken {
    #[serde(flatten)]
    pub token: Token,
    pub line: u32,
}

/// One error observed while scanning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub offset: Option<usize>,
    pub line: u32,
    pub recoverable: bool,
}

impl Diagnostic {
    pub fn from_error(error: &LexerError, line: u32) -> Self {
        Self {
            code: error.error_code().as_str().to_string(),
            message: error.to_string(),
            offset: error.offset(),
            line,
            recoverable: error.is_recoverable(),
        }
    }

    pub fn format(&self) -> String {
        match self.offset {
            Some(offset) => format!(
                "error[{}]: {} (line {}, offset {})",
                self.code, self.message, self.line, offset
            ),
            None => format!("error[{}]: {} (line {})", self.code, self.message, self.line),
        }
    }
}

/// Outcome of a best-effort scan of one source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Name of the scanned source
    pub source: String,
    /// Recorded tokens; trivia only when requested
    pub tokens: Vec<ScannedToken>,
    /// Tokens produced per kind, trivia included
    pub token_counts: BTreeMap<String, usize>,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics dropped after the report limit was reached
    pub dropped_diagnostics: usize,
    /// Line reached at the end of the scan
    pub lines: u32,
    /// Characters consumed from the source
    pub characters: usize,
    /// False when a fatal error or a stop preference ended the scan early
    pub completed: bool,
    pub elapsed_ms: u64,
}

impl ScanReport {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            lines: 1,
            completed: true,
            ..Default::default()
        }
    }

    pub(crate) fn record_token(&mut self, token: Token, line: u32, keep: bool) {
        *self
            .token_counts
            .entry(token.kind.as_str().to_string())
            .or_insert(0) += 1;
        if keep {
            self.tokens.push(ScannedToken { token, line });
        }
    }

    pub(crate) fn record_diagnostic(&mut self, diagnostic: Diagnostic, limit: usize) {
        if self.diagnostics.len() < limit {
            self.diagnostics.push(diagnostic);
        } else {
            self.dropped_diagnostics += 1;
        }
    }

    /// Total tokens produced, trivia included
    pub fn token_count(&self) -> usize {
        self.token_counts.values().sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty() || self.dropped_diagnostics > 0
    }

    /// The unrecoverable error that ended the scan, if any
    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| !d.recoverable)
    }

    /// Concatenated text of the recorded tokens
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.token.text.as_str()).collect()
    }

    /// Human-readable summary followed by one line per diagnostic
    pub fn format_text(&self) -> String {
        let mut output = format!(
            "{}: {} tokens, {} lines, {} characters",
            self.source,
            self.token_count(),
            self.lines,
            self.characters
        );
        for (kind, count) in &self.token_counts {
            output.push_str(&format!("\n  {:<8} {}", kind, count));
        }
        for diagnostic in &self.diagnostics {
            output.push('\n');
            output.push_str(&diagnostic.format());
        }
        if self.dropped_diagnostics > 0 {
            output.push_str(&format!(
                "\n... {} more diagnostics not shown",
                self.dropped_diagnostics
            ));
        }
        if !self.completed {
            output.push_str("\nscan stopped early");
        }
        output
    }
}
