//! Lazy tokenizer over a character source

use super::chars::{is_identifier_part, is_identifier_start, is_quote};
use super::error::LexerError;
use crate::logging::Location;
use crate::source::CharSource;
use crate::stream::{LexResult, TokenSource};
use crate::tokens::{Token, TokenKind};
use crate::{log_debug, log_error};

/// Converts a character source into classified tokens, one lex step per
/// request.
///
/// At most one token is buffered. Unterminated quotes or comments and
/// source failures are sticky: once raised, every later request returns
/// the same error. A source failure that ends a word, space or line comment
/// is raised after that token is delivered.
pub struct Tokenizer<S: CharSource> {
    source: S,
    /// Characters consumed minus characters unread
    offset: usize,
    buffered: Option<Token>,
    exhausted: bool,
    /// Source failure waiting for the token it cut short to be delivered
    deferred: Option<LexerError>,
    error: Option<LexerError>,
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            offset: 0,
            buffered: None,
            exhausted: false,
            deferred: None,
            error: None,
        }
    }

    /// The sticky error, if lexing has failed
    pub fn error(&self) -> Option<&LexerError> {
        self.error.as_ref()
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn next_char(&mut self) -> LexResult<Option<char>> {
        let ch = self.source.read().map_err(|error| LexerError::Source {
            error,
            offset: self.offset,
        })?;
        if ch.is_some() {
            self.offset += 1;
        }
        Ok(ch)
    }

    /// Like `next_char`, but a source failure ends the current token and is
    /// raised on the next request
    fn next_char_or_defer(&mut self) -> Option<char> {
        match self.next_char() {
            Ok(ch) => ch,
            Err(error) => {
                self.deferred = Some(error);
                None
            }
        }
    }

    fn unread(&mut self, ch: char) {
        self.source.unread(ch);
        self.offset -= 1;
    }

    fn fill(&mut self) -> LexResult<()> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if self.buffered.is_some() || self.exhausted {
            return Ok(());
        }

        let lexed = match self.deferred.take() {
            Some(error) => Err(error),
            None => self.lex(),
        };
        match lexed {
            Ok(Some(token)) => {
                self.buffered = Some(token);
                Ok(())
            }
            Ok(None) => {
                self.exhausted = true;
                log_debug!("End of input reached", "offset" => self.offset);
                Ok(())
            }
            Err(error) => {
                let location = Location {
                    offset: error.offset().unwrap_or(self.offset),
                    line: None,
                };
                log_error!(error.error_code(), &error.to_string(), at = location);
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn lex(&mut self) -> LexResult<Option<Token>> {
        let start = self.offset;
        let Some(first) = self.next_char()? else {
            return Ok(None);
        };

        let mut text = String::new();
        text.push(first);

        let kind = match first {
            '/' => match self.next_char_or_defer() {
                Some('/') => {
                    text.push('/');
                    self.line_comment(&mut text)?;
                    TokenKind::Comment
                }
                Some('*') => {
                    text.push('*');
                    self.block_comment(&mut text, start)?;
                    TokenKind::Comment
                }
                Some(other) => {
                    self.unread(other);
                    TokenKind::Symbol
                }
                None => TokenKind::Symbol,
            },
            ch if is_quote(ch) => {
                self.quote(ch, &mut text, start)?;
                TokenKind::Quote
            }
            ch if is_identifier_start(ch) => {
                self.take_while(&mut text, is_identifier_part)?;
                TokenKind::Word
            }
            ch if ch.is_whitespace() => {
                self.take_while(&mut text, char::is_whitespace)?;
                TokenKind::Space
            }
            _ => TokenKind::Symbol,
        };

        Ok(Some(Token::new(kind, text, start)))
    }

    /// Maximal munch; the first non-matching character is unread
    fn take_while(&mut self, text: &mut String, accept: fn(char) -> bool) -> LexResult<()> {
        while let Some(ch) = self.next_char_or_defer() {
            if !accept(ch) {
                self.unread(ch);
                break;
            }
            text.push(ch);
        }
        Ok(())
    }

    /// Through and including the newline; end of input also ends it
    fn line_comment(&mut self, text: &mut String) -> LexResult<()> {
        while let Some(ch) = self.next_char_or_defer() {
            text.push(ch);
            if ch == '\n' {
                break;
            }
        }
        Ok(())
    }

    fn block_comment(&mut self, text: &mut String, start: usize) -> LexResult<()> {
        let mut star = false;
        loop {
            let Some(ch) = self.next_char()? else {
                return Err(LexerError::UnterminatedComment { offset: start });
            };
            text.push(ch);
            if star && ch == '/' {
                return Ok(());
            }
            star = ch == '*';
        }
    }

    /// A backslash takes the following character verbatim
    fn quote(&mut self, delimiter: char, text: &mut String, start: usize) -> LexResult<()> {
        loop {
            let Some(ch) = self.next_char()? else {
                return Err(LexerError::UnterminatedQuote { offset: start });
            };
            text.push(ch);
            if ch == delimiter {
                return Ok(());
            }
            if ch == '\\' {
                let Some(escaped) = self.next_char()? else {
                    return Err(LexerError::UnterminatedQuote { offset: start });
                };
                text.push(escaped);
            }
        }
    }
}

impl<S: CharSource> TokenSource for Tokenizer<S> {
    fn peek(&mut self) -> LexResult<Option<&Token>> {
        self.fill()?;
        Ok(self.buffered.as_ref())
    }

    fn consume(&mut self) -> LexResult<Token> {
        self.fill()?;
        self.buffered.take().ok_or(LexerError::EndOfInput)
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn last_error(&self) -> Option<&LexerError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ReaderSource, SourceError, StringSource};
    use assert_matches::assert_matches;

    fn tokenizer(text: &str) -> Tokenizer<StringSource> {
        Tokenizer::new(StringSource::new(text))
    }

    fn lex_all(text: &str) -> Vec<Token> {
        let mut tokenizer = tokenizer(text);
        let mut tokens = Vec::new();
        while tokenizer.has_more().unwrap() {
            tokens.push(tokenizer.consume().unwrap());
        }
        tokens
    }

    fn kinds_and_text(text: &str) -> Vec<(TokenKind, String)> {
        lex_all(text)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_basic_classification() {
        use TokenKind::*;
        let tokens = kinds_and_text("requires(x != null);");
        let expected = vec![
            (Word, "requires"),
            (Symbol, "("),
            (Word, "x"),
            (Space, " "),
            (Symbol, "!"),
            (Symbol, "="),
            (Space, " "),
            (Word, "null"),
            (Symbol, ")"),
            (Symbol, ";"),
        ];
        let expected: Vec<(TokenKind, String)> = expected
            .into_iter()
            .map(|(k, t)| (k, t.to_string()))
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_offsets_count_characters() {
        let tokens = lex_all("é ab");
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
        assert_eq!(tokens[0].kind, TokenKind::Word);
    }

    #[test]
    fn test_round_trip_reproduces_input() {
        let input = "/* head */\nclass A$1 {\n  int x = 'c' + \"s\\\"q\"; // tail\n}\n\t";
        let rebuilt: String = lex_all(input).into_iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_offset_matches_consumed_text() {
        let mut tokenizer = tokenizer("ab  c");
        let first = tokenizer.consume().unwrap();
        assert_eq!(first.text, "ab");
        assert_eq!(tokenizer.offset(), 2);

        // Peeking lexes the next token and moves the offset past it
        let peeked = tokenizer.peek().unwrap().cloned().unwrap();
        assert_eq!(peeked.offset, 2);
        assert_eq!(tokenizer.offset(), 4);
    }

    #[test]
    fn test_line_comment_includes_newline() {
        use TokenKind::*;
        let tokens = kinds_and_text("// note\nx");
        assert_eq!(
            tokens,
            vec![(Comment, "// note\n".to_string()), (Word, "x".to_string())]
        );
    }

    #[test]
    fn test_line_comment_at_end_of_input() {
        let tokens = lex_all("x // done");
        assert_eq!(tokens.last().unwrap().text, "// done");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Comment);
    }

    #[test]
    fn test_block_comments() {
        let tokens = lex_all("/**/a/* x * y **/");
        assert_eq!(tokens[0].text, "/**/");
        assert_eq!(tokens[1].text, "a");
        assert_eq!(tokens[2].text, "/* x * y **/");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
    }

    #[test]
    fn test_lone_slash_is_symbol() {
        use TokenKind::*;
        let tokens = kinds_and_text("a/b/");
        assert_eq!(
            tokens,
            vec![
                (Word, "a".to_string()),
                (Symbol, "/".to_string()),
                (Word, "b".to_string()),
                (Symbol, "/".to_string()),
            ]
        );
    }

    #[test]
    fn test_quotes_with_escapes() {
        let tokens = lex_all(r#"'\'' "a\\" "x'y""#);
        let quotes: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Quote)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(quotes, vec![r"'\''", r#""a\\""#, r#""x'y""#]);
    }

    #[test]
    fn test_whitespace_is_maximal() {
        let tokens = lex_all(" \t\n\r\n x");
        assert_eq!(tokens[0].kind, TokenKind::Space);
        assert_eq!(tokens[0].text, " \t\n\r\n ");
    }

    #[test]
    fn test_identifier_characters() {
        let tokens = lex_all("$tmp _x1 ünï 9");
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, vec!["$tmp", "_x1", "ünï"]);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Symbol);
    }

    #[test]
    fn test_end_of_input() {
        let mut tokenizer = tokenizer("x");
        assert_eq!(tokenizer.consume().unwrap().text, "x");
        assert_eq!(tokenizer.peek().unwrap(), None);
        assert!(!tokenizer.has_more().unwrap());
        assert_eq!(tokenizer.consume(), Err(LexerError::EndOfInput));
        // End of input is not sticky
        assert_eq!(tokenizer.peek().unwrap(), None);
        assert!(tokenizer.error().is_none());
    }

    #[test]
    fn test_empty_input() {
        let mut tokenizer = tokenizer("");
        assert_eq!(tokenizer.peek().unwrap(), None);
        assert_eq!(tokenizer.offset(), 0);
    }

    #[test]
    fn test_unterminated_quote_is_sticky() {
        let mut tokenizer = tokenizer("a \"open");
        assert_eq!(tokenizer.consume().unwrap().text, "a");
        assert_eq!(tokenizer.consume().unwrap().text, " ");

        let error = tokenizer.consume().unwrap_err();
        assert_eq!(error, LexerError::UnterminatedQuote { offset: 2 });
        assert_eq!(tokenizer.peek(), Err(error.clone()));
        assert_eq!(tokenizer.consume(), Err(error.clone()));
        assert_eq!(tokenizer.error(), Some(&error));
        assert_eq!(tokenizer.last_error(), Some(&error));
    }

    #[test]
    fn test_trailing_backslash_in_quote() {
        let mut tokenizer = tokenizer("'\\");
        assert_matches!(
            tokenizer.peek(),
            Err(LexerError::UnterminatedQuote { offset: 0 })
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let mut tokenizer = tokenizer("x /* never closed *");
        tokenizer.consume().unwrap();
        tokenizer.consume().unwrap();
        assert_eq!(
            tokenizer.peek(),
            Err(LexerError::UnterminatedComment { offset: 2 })
        );
        assert!(tokenizer.error().is_some());
    }

    #[test]
    fn test_source_errors_are_sticky() {
        let bytes: &[u8] = &[0xff, b'a'];
        let mut tokenizer = Tokenizer::new(ReaderSource::new(bytes));
        let expected = LexerError::Source {
            error: SourceError::InvalidEncoding,
            offset: 0,
        };
        assert_eq!(tokenizer.peek(), Err(expected.clone()));
        assert_eq!(tokenizer.consume(), Err(expected));
    }

    #[test]
    fn test_tokens_before_bad_byte_are_delivered() {
        let bytes: &[u8] = b"ok \xff";
        let mut tokenizer = Tokenizer::new(ReaderSource::new(bytes));

        assert_eq!(tokenizer.consume().unwrap(), Token::new(TokenKind::Word, "ok", 0));
        assert_eq!(tokenizer.consume().unwrap(), Token::new(TokenKind::Space, " ", 2));

        let error = tokenizer.consume().unwrap_err();
        assert_matches!(
            &error,
            LexerError::Source {
                error: SourceError::InvalidEncoding,
                offset: 3
            }
        );
        assert_eq!(error.offset(), Some(3));
        assert_eq!(tokenizer.peek(), Err(error));
    }

    #[test]
    fn test_source_error_inside_quote_is_immediate() {
        let bytes: &[u8] = b"'ab\xff'";
        let mut tokenizer = Tokenizer::new(ReaderSource::new(bytes));
        assert_matches!(
            tokenizer.peek(),
            Err(LexerError::Source { offset: 3, .. })
        );
    }
}
