//! Token system for contract source tokenization
//!
//! Tokens are deliberately coarse: the tokenizer only classifies text into
//! five kinds and never interprets keywords, numbers or operators. Every
//! character of the input belongs to exactly one token.
//!
//! ## Token Kinds
//!
//! - **WORD** - identifier-shaped runs (`requires`, `$tmp`, `_x1`)
//! - **QUOTE** - `'...'` and `"..."` literals with escapes kept verbatim
//! - **SYMBOL** - every other single character, including delimiters
//! - **COMMENT** - `// ...` through the newline and `/* ... */`
//! - **SPACE** - maximal runs of whitespace

pub mod token;

pub use token::{Token, TokenKind};
