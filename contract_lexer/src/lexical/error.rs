//! Errors raised by the tokenizer and the stream layers stacked on it

use crate::logging::codes;
use crate::source::SourceError;
use crate::tokens::Token;

/// Lexing and token stream errors
///
/// Source failures and unterminated constructs are fatal: a tokenizer that
/// raised one returns it again on every later request. Delimiter imbalance
/// and stream misuse leave the stream usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("{error} (at offset {offset})")]
    Source {
        #[source]
        error: SourceError,
        offset: usize,
    },

    #[error("Unterminated quote starting at offset {offset}")]
    UnterminatedQuote { offset: usize },

    #[error("Unterminated comment starting at offset {offset}")]
    UnterminatedComment { offset: usize },

    #[error("Unexpected end of input")]
    EndOfInput,

    #[error("unexpected '{found}'")]
    UnexpectedCloser { found: char, offset: usize },

    #[error("'{expected}' expected")]
    MismatchedCloser {
        expected: char,
        found: char,
        offset: usize,
    },

    #[error("'{expected}' expected")]
    UnclosedDelimiter { expected: char },

    #[error("Cannot push back {token}: not the last token read")]
    InvalidPushback { token: Token },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Source { error, .. } => error.error_code(),
            LexerError::UnterminatedQuote { .. } => codes::lexical::UNTERMINATED_QUOTE,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::EndOfInput => codes::lexical::END_OF_INPUT,
            LexerError::UnexpectedCloser { .. } => codes::balance::UNEXPECTED_CLOSER,
            LexerError::MismatchedCloser { .. } => codes::balance::MISMATCHED_CLOSER,
            LexerError::UnclosedDelimiter { .. } => codes::balance::UNCLOSED_DELIMITER,
            LexerError::InvalidPushback { .. } => codes::stream::INVALID_PUSHBACK,
        }
    }

    /// Whether the stream can keep delivering tokens after this error
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Source failures and unterminated constructs end lexing for good
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LexerError::Source { .. }
                | LexerError::UnterminatedQuote { .. }
                | LexerError::UnterminatedComment { .. }
        )
    }

    /// Whether this is one of the delimiter balance errors
    pub fn is_balance_error(&self) -> bool {
        matches!(
            self,
            LexerError::UnexpectedCloser { .. }
                | LexerError::MismatchedCloser { .. }
                | LexerError::UnclosedDelimiter { .. }
        )
    }

    /// Character offset the error points at, where one exists
    pub fn offset(&self) -> Option<usize> {
        match self {
            LexerError::Source { offset, .. }
            | LexerError::UnterminatedQuote { offset }
            | LexerError::UnterminatedComment { offset }
            | LexerError::UnexpectedCloser { offset, .. }
            | LexerError::MismatchedCloser { offset, .. } => Some(*offset),
            LexerError::InvalidPushback { token } => Some(token.offset),
            LexerError::EndOfInput | LexerError::UnclosedDelimiter { .. } => None,
        }
    }
}
