//! Custom error types for superres.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the superres library.
///
/// Every variant is fatal: the pipeline never retries or recovers, failures
/// propagate straight to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Checkpoint file does not exist.
    #[error("checkpoint not found: {path}")]
    CheckpointNotFound { path: PathBuf },

    /// Checkpoint exists but the runtime rejected it (truncated file,
    /// mismatched parameters, unsupported opset).
    #[error("failed to load checkpoint {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// Input image missing or not a decodable raster format.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Forward pass failed inside the runtime.
    #[error("inference failed: {source}")]
    Compute {
        #[source]
        source: ort::Error,
    },

    /// A tensor did not have the shape the pipeline contract requires.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Output image could not be written.
    #[error("failed to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for superres operations.
pub type Result<T> = std::result::Result<T, Error>;
