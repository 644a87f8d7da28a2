//! Delimiter balance checking layer

use super::{LexResult, LineTracker, TokenSource};
use crate::lexical::LexerError;
use crate::logging::Location;
use crate::tokens::{Token, TokenKind};
use crate::log_error;

/// Closing character for an opening delimiter
pub fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closer(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}

/// Tracks nesting of `(`, `[` and `{` across SYMBOL tokens
///
/// A closer without an opener, or one that does not match the innermost
/// opener, is reported as an error while the offending token stays pending:
/// the next request delivers it without checking it again. At end of input
/// every request pops one still-open delimiter and reports it, until the
/// stack is empty.
pub struct BalanceChecker<S: TokenSource> {
    inner: LineTracker<S>,
    pending: Option<Token>,
    open: Vec<char>,
    error: Option<LexerError>,
}

impl<S: TokenSource> BalanceChecker<S> {
    pub fn new(inner: S) -> Self {
        Self::from_tracker(LineTracker::new(inner))
    }

    pub fn from_tracker(inner: LineTracker<S>) -> Self {
        Self {
            inner,
            pending: None,
            open: Vec::new(),
            error: None,
        }
    }

    /// Current line of the wrapped line tracker
    pub fn line(&self) -> u32 {
        self.inner.line()
    }

    /// Number of still-open delimiters
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Still-open delimiters, outermost first
    pub fn open_delimiters(&self) -> &[char] {
        &self.open
    }

    pub fn get_ref(&self) -> &LineTracker<S> {
        &self.inner
    }

    pub fn into_inner(self) -> LineTracker<S> {
        self.inner
    }

    fn fill(&mut self) -> LexResult<()> {
        if self.pending.is_some() {
            return Ok(());
        }

        if !self.inner.has_more()? {
            return match self.open.pop().and_then(closer_for) {
                Some(expected) => Err(self.report(LexerError::UnclosedDelimiter { expected })),
                None => Ok(()),
            };
        }

        let token = self.inner.consume()?;
        let verdict = self.check(&token);
        self.pending = Some(token);
        verdict.map_err(|error| self.report(error))
    }

    fn check(&mut self, token: &Token) -> Result<(), LexerError> {
        if token.kind != TokenKind::Symbol {
            return Ok(());
        }
        let Some(ch) = token.symbol() else {
            return Ok(());
        };

        if closer_for(ch).is_some() {
            self.open.push(ch);
            return Ok(());
        }
        if !is_closer(ch) {
            return Ok(());
        }

        match self.open.pop().and_then(closer_for) {
            None => Err(LexerError::UnexpectedCloser {
                found: ch,
                offset: token.offset,
            }),
            Some(expected) if expected != ch => Err(LexerError::MismatchedCloser {
                expected,
                found: ch,
                offset: token.offset,
            }),
            Some(_) => Ok(()),
        }
    }

    fn report(&mut self, error: LexerError) -> LexerError {
        let location = Location {
            offset: error.offset().unwrap_or_else(|| self.inner.offset()),
            line: Some(self.inner.line()),
        };
        log_error!(error.error_code(), &error.to_string(), at = location,
            "depth" => self.open.len()
        );
        self.error = Some(error.clone());
        error
    }
}

impl<S: TokenSource> TokenSource for BalanceChecker<S> {
    fn peek(&mut self) -> LexResult<Option<&Token>> {
        self.fill()?;
        Ok(self.pending.as_ref())
    }

    fn consume(&mut self) -> LexResult<Token> {
        self.fill()?;
        self.pending.take().ok_or(LexerError::EndOfInput)
    }

    fn offset(&self) -> usize {
        self.inner.offset()
    }

    fn last_error(&self) -> Option<&LexerError> {
        self.inner.last_error().or(self.error.as_ref())
    }
}
