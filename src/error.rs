// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Fetch failed for {source_ref}: {message}")]
    Fetch { source_ref: String, message: String },

    #[error("Extraction failed for {source_ref}: {message}")]
    Extract { source_ref: String, message: String },

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("{track} track failed: {message}")]
    Track { track: String, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    pub fn fetch(source_ref: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            source_ref: source_ref.into(),
            message: message.to_string(),
        }
    }

    pub fn extract(source_ref: impl Into<String>, message: impl ToString) -> Self {
        Self::Extract {
            source_ref: source_ref.into(),
            message: message.to_string(),
        }
    }

    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
