//! Lookahead and pushback layer

use super::{LexResult, TokenSource};
use crate::lexical::LexerError;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error};
use std::collections::VecDeque;

/// Multi-token lookahead with single-token un-consume
///
/// Tokens pulled ahead of the reader wait in a queue whose front is the
/// next token to deliver. A pushed back token goes to the front, so it is
/// delivered again before anything queued or still unlexed.
pub struct PushbackBuffer<S: TokenSource> {
    inner: S,
    queue: VecDeque<Token>,
    /// Most recently delivered token, eligible for pushback
    last: Option<Token>,
    error: Option<LexerError>,
}

impl<S: TokenSource> PushbackBuffer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            queue: VecDeque::new(),
            last: None,
            error: None,
        }
    }

    /// The token `n` positions ahead (0 is the next one), without consuming
    ///
    /// Returns `None` once fewer than `n + 1` tokens remain. Tokens pulled
    /// from the wrapped source stay queued even if a later pull fails.
    pub fn peek_nth(&mut self, n: usize) -> LexResult<Option<&Token>> {
        while self.queue.len() <= n {
            if !self.inner.has_more()? {
                return Ok(None);
            }
            let token = self.inner.consume()?;
            self.queue.push_back(token);
        }
        Ok(self.queue.get(n))
    }

    /// Return the most recently delivered token to the stream
    ///
    /// Only the last token read by this buffer can be pushed back, and only
    /// once; anything else is rejected without changing the stream.
    pub fn pushback(&mut self, token: Token) -> LexResult<()> {
        if self.last.as_ref() != Some(&token) {
            let error = LexerError::InvalidPushback { token };
            log_error!(codes::stream::INVALID_PUSHBACK, &error.to_string());
            self.error = Some(error.clone());
            return Err(error);
        }

        log_debug!("Token pushed back", "offset" => token.offset);
        self.last = None;
        self.queue.push_front(token);
        Ok(())
    }

    /// Number of tokens pulled from the wrapped source but not yet delivered
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TokenSource> TokenSource for PushbackBuffer<S> {
    fn peek(&mut self) -> LexResult<Option<&Token>> {
        self.peek_nth(0)
    }

    fn consume(&mut self) -> LexResult<Token> {
        let token = match self.queue.pop_front() {
            Some(token) => token,
            None => self.inner.consume()?,
        };
        self.last = Some(token.clone());
        Ok(token)
    }

    fn offset(&self) -> usize {
        self.inner.offset()
    }

    fn last_error(&self) -> Option<&LexerError> {
        self.inner.last_error().or(self.error.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{tokenize_str, Tokenizer};
    use crate::source::StringSource;
    use crate::stream::BalanceChecker;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;

    fn buffer(text: &str) -> PushbackBuffer<Tokenizer<StringSource>> {
        PushbackBuffer::new(tokenize_str(text))
    }

    fn text_at(buffer: &mut PushbackBuffer<Tokenizer<StringSource>>, n: usize) -> Option<String> {
        buffer.peek_nth(n).unwrap().map(|t| t.text.clone())
    }

    #[test]
    fn test_peek_nth_is_idempotent() {
        let mut buffer = buffer("a b c");
        assert_eq!(text_at(&mut buffer, 2).as_deref(), Some("b"));
        assert_eq!(text_at(&mut buffer, 2).as_deref(), Some("b"));
        assert_eq!(text_at(&mut buffer, 0).as_deref(), Some("a"));
        assert_eq!(text_at(&mut buffer, 4).as_deref(), Some("c"));
        assert_eq!(buffer.buffered(), 5);

        assert_eq!(buffer.consume().unwrap().text, "a");
        assert_eq!(text_at(&mut buffer, 1).as_deref(), Some("b"));
    }

    #[test]
    fn test_peek_beyond_end_is_none() {
        let mut buffer = buffer("x y");
        assert_eq!(text_at(&mut buffer, 3), None);
        assert_eq!(text_at(&mut buffer, 100), None);
        assert_eq!(text_at(&mut buffer, 3), None);
        // Lookahead past the end does not disturb what remains
        assert_eq!(buffer.consume().unwrap().text, "x");
        assert_eq!(text_at(&mut buffer, 1).as_deref(), Some("y"));
    }

    #[test]
    fn test_pushback_redelivers_verbatim() {
        let mut buffer = buffer("if (x)");
        let first = buffer.consume().unwrap();
        buffer.pushback(first.clone()).unwrap();
        assert_eq!(buffer.peek().unwrap(), Some(&first));
        assert_eq!(buffer.consume().unwrap(), first);
        assert_eq!(buffer.consume().unwrap().kind, TokenKind::Space);
    }

    #[test]
    fn test_pushback_goes_ahead_of_lookahead() {
        let mut buffer = buffer("a b");
        let a = buffer.consume().unwrap();
        assert_eq!(text_at(&mut buffer, 1).as_deref(), Some("b"));
        buffer.pushback(a).unwrap();
        let texts: Vec<String> = (&mut buffer)
            .into_tokens()
            .map(|t| t.unwrap().text)
            .collect();
        assert_eq!(texts, vec!["a", " ", "b"]);
    }

    #[test]
    fn test_pushback_of_other_token_rejected() {
        let mut buffer = buffer("a b");
        let a = buffer.consume().unwrap();
        let space = buffer.consume().unwrap();

        let result = buffer.pushback(a.clone());
        assert_matches!(&result, Err(LexerError::InvalidPushback { .. }));
        assert_eq!(buffer.last_error(), result.as_ref().err());

        // Rejected pushback leaves the stream untouched
        assert_eq!(buffer.consume().unwrap().text, "b");
        assert!(buffer.pushback(space).is_err());
    }

    #[test]
    fn test_pushback_before_any_read_rejected() {
        let mut buffer = buffer("a");
        let forged = Token::new(TokenKind::Word, "a", 0);
        assert!(buffer.pushback(forged).is_err());
        assert_eq!(buffer.buffered(), 0);
    }

    #[test]
    fn test_single_pushback_only() {
        let mut buffer = buffer("a");
        let a = buffer.consume().unwrap();
        buffer.pushback(a.clone()).unwrap();
        assert!(buffer.pushback(a.clone()).is_err());
        assert_eq!(buffer.consume().unwrap(), a);
        assert_eq!(buffer.consume(), Err(LexerError::EndOfInput));
    }

    #[test]
    fn test_lookahead_keeps_tokens_before_error() {
        let mut buffer = buffer("a 'open");
        assert_matches!(
            buffer.peek_nth(2),
            Err(LexerError::UnterminatedQuote { .. })
        );
        assert_eq!(buffer.buffered(), 2);
        assert_eq!(buffer.consume().unwrap().text, "a");
        assert_eq!(buffer.consume().unwrap().text, " ");
        assert!(buffer.consume().is_err());
    }

    #[test]
    fn test_over_balance_checker() {
        let mut buffer = PushbackBuffer::new(BalanceChecker::new(tokenize_str("(]")));
        assert_eq!(text_at_any(&mut buffer, 0).as_deref(), Some("("));

        // The balance error surfaces, then the token is delivered after all
        assert_matches!(
            buffer.peek_nth(1),
            Err(LexerError::MismatchedCloser { .. })
        );
        assert_eq!(text_at_any(&mut buffer, 1).as_deref(), Some("]"));
        assert_eq!(buffer.get_ref().depth(), 0);
    }

    fn text_at_any<S: TokenSource>(buffer: &mut PushbackBuffer<S>, n: usize) -> Option<String> {
        buffer.peek_nth(n).unwrap().map(|t| t.text.clone())
    }
}
