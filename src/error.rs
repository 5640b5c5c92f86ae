//! Error type shared by every stage of an upload.
//!
//! Each stage fails fast: the first [`UploadError`] aborts the upload and is
//! handed back to the caller untouched.

use crate::imaging::CodecError;
use thiserror::Error;

/// Result alias used throughout the upload pipeline.
pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Error, Debug)]
pub enum UploadError {
    /// Open, seek, read or write failure, or a variant path that already exists.
    #[error("IO error: {0}")]
    Io(String),
    /// Leading bytes match none of the supported formats.
    #[error("Unsupported image type")]
    UnsupportedType,
    /// The original exceeds the configured pixel budget.
    #[error("Image too large: {width}x{height} exceeds {max} pixels")]
    Size { width: u32, height: u32, max: u64 },
    /// Malformed or truncated format structure.
    #[error("Invalid image: {0}")]
    Validation(String),
    /// The codec failed to resize, crop or encode.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl UploadError {
    pub(crate) fn io(reason: &str) -> Self {
        Self::Io(reason.to_string())
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

impl From<CodecError> for UploadError {
    fn from(err: CodecError) -> Self {
        Self::Operation(err.to_string())
    }
}
