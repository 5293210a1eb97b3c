//! Error types for the node processing pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by configuration, logging setup and pipeline stages.
///
/// Per-file read failures never surface as `PipelineError`; they are recorded in
/// [`crate::pipeline::Diagnostics`] and the stage carries on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("{stage} stage failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}
