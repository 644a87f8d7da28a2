//! Best-effort scan of a whole source
//!
//! Stacks a balance checker (and with it a line tracker) over a tokenizer,
//! records every token and every error it raises, and keeps going past
//! recoverable errors. Only a fatal lexing error, or a balance error when
//! the preferences ask for it, ends a scan early.

mod error;
pub mod report;

pub use error::PipelineError;
pub use report::{Diagnostic, ScanReport, ScannedToken};

use crate::config::ScanPreferences;
use crate::lexical::{LexerError, Tokenizer};
use crate::logging::{self, codes};
use crate::source::{open_file, CharSource, StringSource};
use crate::stream::{BalanceChecker, TokenSource};
use crate::{log_info, log_success};
use std::path::Path;
use std::time::Instant;

/// Scan any character source
pub fn scan<S: CharSource>(name: &str, source: S, preferences: &ScanPreferences) -> ScanReport {
    logging::with_source_context(name, || {
        let start_time = Instant::now();
        log_info!("Starting scan", "source" => name);

        let mut checker = BalanceChecker::new(Tokenizer::new(source));
        let mut report = ScanReport::new(name);

        loop {
            match checker.consume() {
                Ok(token) => {
                    // Line tracking has already counted this token's newlines
                    let line = if token.is_trivia() {
                        let newlines = u32::try_from(token.newline_count()).unwrap_or(u32::MAX);
                        checker.line().saturating_sub(newlines)
                    } else {
                        checker.line()
                    };
                    let keep = preferences.include_trivia || !token.is_trivia();
                    report.record_token(token, line, keep);
                }
                Err(LexerError::EndOfInput) => break,
                Err(error) => {
                    report.record_diagnostic(
                        Diagnostic::from_error(&error, checker.line()),
                        preferences.max_reported_diagnostics,
                    );
                    if error.is_fatal()
                        || (error.is_balance_error() && preferences.stop_on_balance_error)
                    {
                        report.completed = false;
                        break;
                    }
                }
            }
        }

        report.lines = checker.line();
        report.characters = checker.offset();
        report.elapsed_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);

        log_success!(codes::success::SCAN_COMPLETE, "Scan complete",
            "tokens" => report.token_count(),
            "diagnostics" => report.diagnostics.len() + report.dropped_diagnostics,
            "completed" => report.completed
        );

        report
    })
}

/// Scan in-memory text
pub fn scan_str(name: &str, text: &str, preferences: &ScanPreferences) -> ScanReport {
    scan(name, StringSource::new(text), preferences)
}

/// Open and scan a file
pub fn scan_file<P: AsRef<Path>>(
    path: P,
    preferences: &ScanPreferences,
) -> Result<ScanReport, PipelineError> {
    let path = path.as_ref();
    let source = open_file(path)?;
    Ok(scan(&path.display().to_string(), source, preferences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_str;
    use crate::source::ReaderSource;
    use crate::stream::{LineTracker, PushbackBuffer};
    use crate::tokens::TokenKind;
    use std::io::Write;

    fn preferences() -> ScanPreferences {
        ScanPreferences {
            include_trivia: true,
            stop_on_balance_error: false,
            max_reported_diagnostics: 100,
        }
    }

    #[test]
    fn test_clean_scan_round_trips() {
        let input = "/** @requires x > 0 */\nvoid f(int x) {\n  g(x['a']);\n}\n";
        let report = scan_str("f.java", input, &preferences());

        assert!(report.completed);
        assert!(!report.has_errors());
        assert_eq!(report.text(), input);
        assert_eq!(report.lines, 5);
        assert_eq!(report.characters, input.chars().count());
    }

    #[test]
    fn test_token_lines_are_start_lines() {
        let report = scan_str("t", "a\n  b // c\nd", &preferences());
        let lines: Vec<(&str, u32)> = report
            .tokens
            .iter()
            .map(|t| (t.token.text.as_str(), t.line))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("a", 1),
                ("\n  ", 1),
                ("b", 2),
                (" ", 2),
                ("// c\n", 2),
                ("d", 3)
            ]
        );
        assert!(lines.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_trivia_excluded_on_request() {
        let mut prefs = preferences();
        prefs.include_trivia = false;
        let report = scan_str("t", "a b // c", &prefs);
        assert!(report.tokens.iter().all(|t| !t.token.is_trivia()));
        assert_eq!(report.token_count(), 5);
    }

    #[test]
    fn test_mismatch_recovery_keeps_token() {
        let report = scan_str("t", "(]", &preferences());

        assert!(report.completed);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].message, "')' expected");
        assert_eq!(report.diagnostics[0].code, "E041");
        assert_eq!(report.text(), "(]");
    }

    #[test]
    fn test_unclosed_delimiters_reported_innermost_first() {
        let report = scan_str("t", "{ (\n[", &preferences());
        let messages: Vec<&str> = report
            .diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(messages, vec!["']' expected", "')' expected", "'}' expected"]);
        assert!(report.diagnostics.iter().all(|d| d.line == 2));
    }

    #[test]
    fn test_stop_on_balance_error() {
        let mut prefs = preferences();
        prefs.stop_on_balance_error = true;
        let report = scan_str("t", "a) b", &prefs);

        assert!(!report.completed);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.text(), "a");
    }

    #[test]
    fn test_fatal_error_ends_scan() {
        let report = scan_str("t", "x = \"open\n(", &preferences());

        assert!(!report.completed);
        let fatal = report.fatal().unwrap();
        assert_eq!(fatal.code, "E020");
        assert_eq!(fatal.offset, Some(4));
        assert_eq!(report.text(), "x = ");
    }

    #[test]
    fn test_invalid_encoding_keeps_position() {
        let bytes: &[u8] = b"class A {\nint x; \xff\n";
        let report = scan("bad.java", ReaderSource::new(bytes), &preferences());

        assert!(!report.completed);
        assert_eq!(report.text(), "class A {\nint x; ");
        let fatal = report.fatal().unwrap();
        assert_eq!(fatal.code, "E007");
        assert_eq!(fatal.offset, Some(17));
        assert_eq!(fatal.line, 2);
        assert_eq!(report.characters, 17);
    }

    #[test]
    fn test_diagnostics_capped() {
        let mut prefs = preferences();
        prefs.max_reported_diagnostics = 2;
        let report = scan_str("t", ")))))", &prefs);
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.dropped_diagnostics, 3);
        assert_eq!(report.token_count(), 5);
    }

    #[test]
    fn test_scan_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "class A {{\n  int[] x;\n}}\n").unwrap();

        let report = scan_file(file.path(), &preferences()).unwrap();
        assert!(!report.has_errors());
        assert_eq!(report.lines, 4);
        assert_eq!(report.text(), "class A {\n  int[] x;\n}\n");
    }

    #[test]
    fn test_scan_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_file(dir.path().join("missing.java"), &preferences());
        assert!(matches!(result, Err(PipelineError::Source(_))));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = scan_str("t", "f()", &preferences());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "t");
        assert_eq!(json["tokens"][0]["kind"], "WORD");
        assert_eq!(json["tokens"][0]["line"], 1);
        assert_eq!(json["token_counts"]["SYMBOL"], 2);
    }

    #[test]
    fn test_layers_compose_in_any_order() {
        // Lookahead over a line tracker over the tokenizer
        let mut stack = PushbackBuffer::new(LineTracker::new(tokenize_str("a\nb c")));
        assert_eq!(stack.peek_nth(2).unwrap().map(|t| t.text.clone()), Some("b".to_string()));
        assert_eq!(stack.get_ref().line(), 2);

        let a = stack.consume().unwrap();
        stack.pushback(a.clone()).unwrap();
        let texts: Vec<String> = stack.into_tokens().map(|t| t.unwrap().text).collect();
        assert_eq!(texts, vec!["a", "\n", "b", " ", "c"]);

        // Balance checking over the tokenizer, with kinds intact
        let kinds: Vec<TokenKind> = BalanceChecker::new(tokenize_str("x('y')"))
            .into_tokens()
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Symbol,
                TokenKind::Quote,
                TokenKind::Symbol
            ]
        );
    }
}
