//! Error types for nccmatch.

use thiserror::Error;

/// Result alias for nccmatch operations.
pub type NccMatchResult<T> = std::result::Result<T, NccMatchError>;

/// Errors that can occur when running nccmatch algorithms.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NccMatchError {
    /// The input raster is empty or a parameter is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The best score did not exceed the requested threshold.
    #[error("no match found: best score {best_score} does not exceed threshold {threshold}")]
    NoMatchFound { best_score: f32, threshold: f32 },
    /// A cancellation token was triggered while the search was running.
    #[error("operation cancelled")]
    Cancelled,
    /// Decoding an image from disk failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
