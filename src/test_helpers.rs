//! Shared test utilities for the renditions test suite.
//!
//! Builders for the smallest byte sequences each header parser accepts, so
//! tests can describe an upload without carrying binary fixtures around.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let jpeg = jpeg_with_segments(&[
//!     jpeg_segment(0xE0, b"JFIF\0"),
//!     sof0_segment(8, 800, 600),
//! ]);
//! let path = write_fixture(tmp.path(), "upload", &jpeg);
//! ```

use std::path::{Path, PathBuf};

// =========================================================================
// PNG / GIF
// =========================================================================

/// Signature followed by a complete IHDR chunk for a `width`×`height` image.
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend(13u32.to_be_bytes());
    bytes.extend(b"IHDR");
    bytes.extend(width.to_be_bytes());
    bytes.extend(height.to_be_bytes());
    // Bit depth, colour type, compression, filter, interlace
    bytes.extend([8, 6, 0, 0, 0]);
    // CRC is never checked by the header reader
    bytes.extend([0u8; 4]);
    bytes
}

/// `GIF89a` signature and logical screen descriptor.
pub fn gif_header(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend(width.to_le_bytes());
    bytes.extend(height.to_le_bytes());
    // Packed fields, background colour index, pixel aspect ratio
    bytes.extend([0, 0, 0]);
    bytes
}

// =========================================================================
// JPEG
// =========================================================================

/// A marker segment `FF <code>` whose length field covers `body`.
pub fn jpeg_segment(code: u8, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xFF, code];
    bytes.extend((body.len() as u16 + 2).to_be_bytes());
    bytes.extend(body);
    bytes
}

/// Baseline start-of-frame segment with an explicit `length` field.
///
/// The fields after width are zero padding up to `length`, so lengths below
/// the real minimum produce a structurally short segment.
pub fn sof0_segment(length: u16, width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xC0];
    bytes.extend(length.to_be_bytes());
    bytes.push(8);
    bytes.extend(height.to_be_bytes());
    bytes.extend(width.to_be_bytes());
    bytes.extend(vec![0u8; usize::from(length.saturating_sub(7))]);
    bytes
}

/// Start-of-image marker followed by `segments` in order.
pub fn jpeg_with_segments(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    for segment in segments {
        bytes.extend(segment);
    }
    bytes
}

// =========================================================================
// Files
// =========================================================================

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
