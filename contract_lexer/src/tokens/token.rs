//! Token values produced by the tokenizer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    /// Identifier-shaped run of characters
    Word,
    /// Quoted literal, delimiters included
    Quote,
    /// Any other single character
    Symbol,
    /// Line or block comment, delimiters included
    Comment,
    /// Run of whitespace
    Space,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Word => "WORD",
            TokenKind::Quote => "QUOTE",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Space => "SPACE",
        }
    }

    /// SPACE and COMMENT tokens carry no syntax
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of source text
///
/// `offset` counts characters, not bytes, from the start of the input.
/// Concatenating the `text` of every token reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// The character of a single-character token
    pub fn symbol(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Number of newline characters in the token text
    pub fn newline_count(&self) -> usize {
        self.text.matches('\n').count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.text, self.offset)
    }
}
