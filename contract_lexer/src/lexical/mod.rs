//! Lexical analysis: character classes, tokenizer and its error type
//!
//! The tokenizer is the bottom of every token stream stack. Decorators in
//! [`crate::stream`] wrap it to add line tracking, delimiter balance checking
//! and lookahead.

pub mod chars;
pub mod error;
pub mod tokenizer;

use crate::source::StringSource;

pub use error::LexerError;
pub use tokenizer::Tokenizer;

/// Create a tokenizer over in-memory text
pub fn tokenize_str(text: &str) -> Tokenizer<StringSource> {
    Tokenizer::new(StringSource::new(text))
}
