//! Format sniffing from magic bytes.
//!
//! The file extension is never consulted: an upload is whatever its first
//! bytes say it is.
//!
//! | Format | Magic | Length |
//! |---|---|---|
//! | JPEG | `FF D8 FF` | 3 |
//! | GIF | `47 49 46` (`"GIF"`) | 3 |
//! | PNG | `89 50 4E 47 0D 0A 1A 0A` | 8 |
//!
//! The prefixes are disjoint, so table order does not change the outcome.

use crate::error::{Result, UploadError};
use serde::Serialize;

/// Number of leading bytes needed to tell every supported format apart.
pub const SNIFF_LEN: usize = 8;

/// An encoded image format the uploader accepts and re-encodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

const MAGIC: &[(ImageFormat, &[u8])] = &[
    (ImageFormat::Jpeg, &[0xFF, 0xD8, 0xFF]),
    (ImageFormat::Gif, b"GIF"),
    (
        ImageFormat::Png,
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    ),
];

impl ImageFormat {
    /// Lowercase format name, as serialized.
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }

    /// Extension used when naming variants of this format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Leading signature identifying this format.
    pub fn magic(self) -> &'static [u8] {
        MAGIC
            .iter()
            .find(|(format, _)| *format == self)
            .map(|(_, magic)| *magic)
            .unwrap_or_default()
    }
}

/// Classify raw leading bytes.
///
/// Fails with [`UploadError::UnsupportedType`] when no signature matches,
/// including when `header` is too short to hold one.
pub fn sniff(header: &[u8]) -> Result<ImageFormat> {
    MAGIC
        .iter()
        .find(|(_, magic)| header.starts_with(magic))
        .map(|(format, _)| *format)
        .ok_or(UploadError::UnsupportedType)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(sniff(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn sniff_png() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(sniff(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn sniff_gif() {
        assert_eq!(sniff(b"GIF89a\x00\x00").unwrap(), ImageFormat::Gif);
        assert_eq!(sniff(b"GIF87a\x00\x00").unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn sniff_all_zero_is_unsupported() {
        assert!(matches!(
            sniff(&[0u8; SNIFF_LEN]),
            Err(UploadError::UnsupportedType)
        ));
    }

    #[test]
    fn sniff_truncated_png_signature_is_unsupported() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x00];
        assert!(matches!(sniff(&data), Err(UploadError::UnsupportedType)));
    }

    #[test]
    fn sniff_short_buffer_is_unsupported() {
        assert!(matches!(sniff(&[0xFF, 0xD8]), Err(UploadError::UnsupportedType)));
    }

    #[test]
    fn every_magic_sniffs_back_to_its_format() {
        for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif] {
            let mut header = format.magic().to_vec();
            header.resize(SNIFF_LEN, 0);
            assert_eq!(sniff(&header).unwrap(), format);
        }
    }

    #[test]
    fn extensions() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::Gif.extension(), "gif");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ImageFormat::Jpeg).unwrap(),
            "\"jpeg\""
        );
    }
}
