//! Configuration module for the contract lexer
//!
//! Compile-time limits live in [`constants`]; user preferences that may vary
//! between runs live in [`runtime`] and are read from the environment or a
//! TOML file.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{ConfigError, LogLevel, LoggingPreferences, RuntimeConfig, ScanPreferences};
