//! Token stream layers
//!
//! Every layer implements [`TokenSource`] and wraps another one, so layers
//! compose by delegation: a [`LineTracker`] over a tokenizer, a
//! [`BalanceChecker`] over a line tracker, or a [`PushbackBuffer`] over
//! anything. Each layer keeps at most the tokens it has pulled but not yet
//! delivered; pulled tokens are never dropped.

pub mod balance;
pub mod line_tracker;
pub mod pushback;

use crate::lexical::LexerError;
use crate::tokens::Token;

pub use balance::BalanceChecker;
pub use line_tracker::LineTracker;
pub use pushback::PushbackBuffer;

pub type LexResult<T> = Result<T, LexerError>;

/// A lazy sequence of tokens
pub trait TokenSource {
    /// The next token without consuming it, or `None` at end of input
    fn peek(&mut self) -> LexResult<Option<&Token>>;

    /// Take the next token; at end of input this is `LexerError::EndOfInput`
    fn consume(&mut self) -> LexResult<Token>;

    /// Character offset reached by the underlying tokenizer
    fn offset(&self) -> usize;

    /// Most recent error this stack has raised and still remembers
    fn last_error(&self) -> Option<&LexerError>;

    fn has_more(&mut self) -> LexResult<bool> {
        Ok(self.peek()?.is_some())
    }

    /// Iterate over the remaining tokens and errors
    fn into_tokens(self) -> Tokens<Self>
    where
        Self: Sized,
    {
        Tokens {
            source: self,
            done: false,
        }
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn peek(&mut self) -> LexResult<Option<&Token>> {
        (**self).peek()
    }

    fn consume(&mut self) -> LexResult<Token> {
        (**self).consume()
    }

    fn offset(&self) -> usize {
        (**self).offset()
    }

    fn last_error(&self) -> Option<&LexerError> {
        (**self).last_error()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn peek(&mut self) -> LexResult<Option<&Token>> {
        (**self).peek()
    }

    fn consume(&mut self) -> LexResult<Token> {
        (**self).consume()
    }

    fn offset(&self) -> usize {
        (**self).offset()
    }

    fn last_error(&self) -> Option<&LexerError> {
        (**self).last_error()
    }
}

/// Iterator over a token source
///
/// Recoverable errors are yielded in place and iteration continues. A fatal
/// error is yielded once and ends the iteration.
pub struct Tokens<S> {
    source: S,
    done: bool,
}

impl<S> Tokens<S> {
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: TokenSource> Iterator for Tokens<S> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.has_more() {
            Ok(true) => Some(self.source.consume()),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(error) => {
                if error.is_fatal() {
                    self.done = true;
                }
                Some(Err(error))
            }
        }
    }
}
