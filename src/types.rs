//! Shared types produced by an upload.
//!
//! [`RawImageDescriptor`] is read once from the original's header bytes;
//! [`VariantResult`] describes one rendition after it has been written.
//! Both are immutable once built.

use crate::imaging::{Dimensions, ImageFormat};
use serde::Serialize;
use std::path::PathBuf;

/// Format and intrinsic size of an upload, read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawImageDescriptor {
    pub format: ImageFormat,
    /// Always non-zero
    pub width: u32,
    /// Always non-zero
    pub height: u32,
}

impl RawImageDescriptor {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// One rendition written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantResult {
    /// Full path of the written file
    pub path: PathBuf,
    /// File name: main name + suffix + extension
    pub name: String,
    /// Encoded size in bytes
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the encoded bytes
    pub content_hash: String,
    pub width: u32,
    pub height: u32,
}
