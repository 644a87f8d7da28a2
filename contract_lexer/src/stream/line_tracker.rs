//! Line counting layer

use super::{LexResult, TokenSource};
use crate::lexical::LexerError;
use crate::tokens::Token;

/// Derives a line number from the newlines inside SPACE and COMMENT tokens
///
/// The count is updated when a token is pulled from the wrapped source, so
/// `line()` is the line reached after the most recently produced token,
/// whether or not that token has been consumed yet. Tokens pass through
/// unchanged.
pub struct LineTracker<S: TokenSource> {
    inner: S,
    pending: Option<Token>,
    line: u32,
}

impl<S: TokenSource> LineTracker<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: None,
            line: 1,
        }
    }

    /// Current line, starting at 1
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn fill(&mut self) -> LexResult<()> {
        if self.pending.is_some() || !self.inner.has_more()? {
            return Ok(());
        }
        let token = self.inner.consume()?;
        if token.is_trivia() {
            let newlines = u32::try_from(token.newline_count()).unwrap_or(u32::MAX);
            self.line = self.line.saturating_add(newlines);
        }
        self.pending = Some(token);
        Ok(())
    }
}

impl<S: TokenSource> TokenSource for LineTracker<S> {
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
        self.inner.last_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_str;
    use crate::source::StringSource;
    use crate::lexical::Tokenizer;

    fn tracker(text: &str) -> LineTracker<Tokenizer<StringSource>> {
        LineTracker::new(tokenize_str(text))
    }

    #[test]
    fn test_starts_at_line_one() {
        let tracker = tracker("");
        assert_eq!(tracker.line(), 1);
    }

    #[test]
    fn test_counts_space_and_comment_newlines() {
        let mut tracker = tracker("a\n\nb // c\n/* d\n e */ f");
        let mut seen = Vec::new();
        while tracker.has_more().unwrap() {
            let token = tracker.consume().unwrap();
            seen.push((token.text, tracker.line()));
        }

        let lines: Vec<u32> = seen.iter().map(|(_, line)| *line).collect();
        assert_eq!(seen[0], ("a".to_string(), 1));
        assert_eq!(seen[1], ("\n\n".to_string(), 3));
        assert_eq!(seen.last().unwrap(), &("f".to_string(), 5));
        assert!(lines.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_quote_newlines_are_not_counted() {
        let mut tracker = tracker("\"a\nb\" x");
        while tracker.has_more().unwrap() {
            tracker.consume().unwrap();
        }
        assert_eq!(tracker.line(), 1);
    }

    #[test]
    fn test_peek_counts_once() {
        let mut tracker = tracker("x\n");
        tracker.consume().unwrap();
        tracker.peek().unwrap();
        tracker.peek().unwrap();
        assert_eq!(tracker.line(), 2);
        assert_eq!(tracker.consume().unwrap().text, "\n");
        assert_eq!(tracker.line(), 2);
    }

    #[test]
    fn test_tokens_and_offsets_pass_through() {
        let input = "int  x;";
        let direct: Vec<Token> = tokenize_str(input).into_tokens().map(Result::unwrap).collect();
        let tracked: Vec<Token> = tracker(input).into_tokens().map(Result::unwrap).collect();
        assert_eq!(direct, tracked);

        let mut tracker = tracker(input);
        tracker.consume().unwrap();
        assert_eq!(tracker.offset(), 3);
    }

    #[test]
    fn test_errors_propagate() {
        let mut tracker = tracker("/* open");
        let error = tracker.peek().unwrap_err();
        assert!(error.is_fatal());
        assert_eq!(tracker.last_error(), Some(&error));
        assert_eq!(tracker.consume(), Err(error));
    }
}
