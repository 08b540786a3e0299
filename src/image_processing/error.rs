//! Error types for the preprocessing pipeline and batch runner.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source file could not be opened or decoded
    #[error("Failed to decode image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Processed image could not be written to the destination
    #[error("Failed to write image '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Inputs rejected before any processing started
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Resize failed: {0}")]
    Resize(String),

    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Short machine-friendly label used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Decode { .. } => "decode",
            PipelineError::Write { .. } => "write",
            PipelineError::Validation(_) => "validation",
            PipelineError::Resize(_) => "resize",
            PipelineError::Io { .. } => "io",
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
