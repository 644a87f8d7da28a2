//! Layered tokenization and pattern rule resolution for contract-annotated
//! sources.
//!
//! A [`lexical::Tokenizer`] turns a [`source::CharSource`] into coarse
//! tokens. Stream layers in [`stream`] wrap it to track lines, check
//! delimiter balance and provide lookahead with pushback. The
//! [`patterns::PatternMap`] resolves dotted names against exact and
//! wildcard rules, and [`pipeline`] ties the layers into a best-effort scan.

// Internal modules
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod patterns;
pub mod pipeline;
pub mod source;
pub mod stream;
pub mod tokens;

// Re-export key types for library consumers
pub use lexical::{LexerError, Tokenizer};
pub use patterns::{Pattern, PatternError, PatternMap};
pub use pipeline::{PipelineError, ScanReport};
pub use source::{CharSource, ReaderSource, SourceError, StringSource};
pub use stream::{BalanceChecker, LineTracker, PushbackBuffer, TokenSource};
pub use tokens::{Token, TokenKind};
