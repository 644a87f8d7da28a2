use crate::config::ConfigError;
use crate::logging::codes;
use crate::patterns::PatternError;
use crate::source::SourceError;

/// Errors that stop a scan or rule lookup before it produces a report
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source could not be opened: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid rule pattern: {0}")]
    Rules(#[from] PatternError),

    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::Source(error) => error.error_code(),
            PipelineError::Rules(error) => error.error_code(),
            PipelineError::Config(_) => codes::config::CONFIG_ERROR,
        }
    }
}
