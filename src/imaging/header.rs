//! Intrinsic dimensions from format headers, without decoding pixels.
//!
//! Each supported format gets a [`HeaderParser`] that reads only the bytes it
//! needs from a seekable source:
//!
//! - **PNG**: big-endian `u32` width and height at offsets 16 and 20 (the
//!   IHDR fields right after the signature, chunk length and chunk type).
//! - **JPEG**: walk the marker segments from offset 2, skipping each by its
//!   big-endian length, until the baseline start-of-frame (`FF C0`), which
//!   holds precision, height and width.
//! - **GIF**: little-endian `u16` width and height in the logical screen
//!   descriptor right after the 6-byte signature.
//!
//! Adding a format means a new [`ImageFormat`] variant and a parser here;
//! [`read_descriptor`] dispatches through [`parser_for`].

use super::backend::Dimensions;
use super::format::{ImageFormat, SNIFF_LEN, sniff};
use crate::error::{Result, UploadError};
use crate::types::RawImageDescriptor;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Byte source a header parser can read from and seek in.
pub trait ByteSource: Read + Seek {}

impl<T: Read + Seek + ?Sized> ByteSource for T {}

/// Extracts pixel dimensions from one format's header structure.
pub trait HeaderParser: Sync {
    fn read_dimensions(&self, source: &mut dyn ByteSource) -> Result<Dimensions>;
}

/// The parser for `format`.
pub fn parser_for(format: ImageFormat) -> &'static dyn HeaderParser {
    match format {
        ImageFormat::Png => &PngHeader,
        ImageFormat::Jpeg => &JpegHeader,
        ImageFormat::Gif => &GifHeader,
    }
}

fn seek_to(source: &mut dyn ByteSource, pos: SeekFrom) -> Result<()> {
    source.seek(pos).map(|_| ()).map_err(|e| {
        tracing::debug!("seek to {pos:?} failed: {e}");
        UploadError::io("Seek file error")
    })
}

fn read_failed(e: io::Error) -> UploadError {
    tracing::debug!("header read failed: {e}");
    UploadError::io("Read file error")
}

pub struct PngHeader;

/// Signature (8) + IHDR length (4) + IHDR type (4).
const PNG_IHDR_DATA_OFFSET: u64 = 16;

impl HeaderParser for PngHeader {
    fn read_dimensions(&self, source: &mut dyn ByteSource) -> Result<Dimensions> {
        seek_to(source, SeekFrom::Start(PNG_IHDR_DATA_OFFSET))?;
        let mut buf = [0u8; 8];
        source.read_exact(&mut buf).map_err(read_failed)?;
        let mut fields = &buf[..];
        let width = fields.read_u32::<BigEndian>().map_err(read_failed)?;
        let height = fields.read_u32::<BigEndian>().map_err(read_failed)?;
        Ok(Dimensions::new(width, height))
    }
}

pub struct JpegHeader;

/// Past the start-of-image marker.
const JPEG_FIRST_SEGMENT: u64 = 2;
const MARKER_PREFIX: u8 = 0xFF;
/// Baseline DCT start-of-frame.
const SOF0: u8 = 0xC0;
/// Length (2) + precision (1) + height (2) + width (2) + component count (1).
const SOF_MIN_LEN: u16 = 8;

impl HeaderParser for JpegHeader {
    fn read_dimensions(&self, source: &mut dyn ByteSource) -> Result<Dimensions> {
        seek_to(source, SeekFrom::Start(JPEG_FIRST_SEGMENT))?;

        loop {
            let prefix = source.read_u8().map_err(read_failed)?;
            if prefix != MARKER_PREFIX {
                return Err(UploadError::invalid(format!(
                    "expected JPEG marker, got 0x{prefix:02X}"
                )));
            }

            // A run of 0xFF is fill before the marker code
            let mut code = source.read_u8().map_err(read_failed)?;
            while code == MARKER_PREFIX {
                code = source.read_u8().map_err(read_failed)?;
            }

            let length = source.read_u16::<BigEndian>().map_err(read_failed)?;

            if code == SOF0 {
                if length < SOF_MIN_LEN {
                    return Err(UploadError::invalid(format!(
                        "start-of-frame segment too short ({length} bytes)"
                    )));
                }
                let _precision = source.read_u8().map_err(read_failed)?;
                let height = source.read_u16::<BigEndian>().map_err(read_failed)?;
                let width = source.read_u16::<BigEndian>().map_err(read_failed)?;
                return Ok(Dimensions::new(u32::from(width), u32::from(height)));
            }

            if length < 2 {
                return Err(UploadError::invalid(format!(
                    "segment 0x{code:02X} has invalid length {length}"
                )));
            }
            seek_to(source, SeekFrom::Current(i64::from(length) - 2))?;
        }
    }
}

pub struct GifHeader;

/// Past `GIF87a` / `GIF89a`.
const GIF_SCREEN_DESCRIPTOR: u64 = 6;

impl HeaderParser for GifHeader {
    fn read_dimensions(&self, source: &mut dyn ByteSource) -> Result<Dimensions> {
        seek_to(source, SeekFrom::Start(GIF_SCREEN_DESCRIPTOR))?;
        let mut buf = [0u8; 4];
        source.read_exact(&mut buf).map_err(read_failed)?;
        let mut fields = &buf[..];
        let width = fields.read_u16::<LittleEndian>().map_err(read_failed)?;
        let height = fields.read_u16::<LittleEndian>().map_err(read_failed)?;
        Ok(Dimensions::new(u32::from(width), u32::from(height)))
    }
}

/// Sniff the format of `source` and read its dimensions from the header.
pub fn read_descriptor_from(source: &mut dyn ByteSource) -> Result<RawImageDescriptor> {
    let mut lead = [0u8; SNIFF_LEN];
    source.read_exact(&mut lead).map_err(read_failed)?;
    let format = sniff(&lead)?;

    let dimensions = parser_for(format).read_dimensions(source)?;
    if dimensions.width == 0 || dimensions.height == 0 {
        return Err(UploadError::invalid(format!(
            "{} header declares empty size {dimensions}",
            format.extension()
        )));
    }

    Ok(RawImageDescriptor {
        format,
        width: dimensions.width,
        height: dimensions.height,
    })
}

/// Open the file at `path` and describe it from its header bytes.
///
/// The file handle is dropped on every return path.
pub fn read_descriptor(path: &Path) -> Result<RawImageDescriptor> {
    let mut file = File::open(path).map_err(|e| {
        tracing::debug!("open {} failed: {e}", path.display());
        UploadError::io("Open file error")
    })?;
    read_descriptor_from(&mut file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        gif_header, jpeg_segment, jpeg_with_segments, png_header, sof0_segment, write_fixture,
    };
    use std::io::Cursor;

    fn describe(bytes: Vec<u8>) -> Result<RawImageDescriptor> {
        read_descriptor_from(&mut Cursor::new(bytes))
    }

    // =========================================================================
    // PNG
    // =========================================================================

    #[test]
    fn png_dimensions() {
        let d = describe(png_header(800, 600)).unwrap();
        assert_eq!(d.format, ImageFormat::Png);
        assert_eq!((d.width, d.height), (800, 600));
    }

    #[test]
    fn png_boundary_dimensions() {
        for (w, h) in [(1, 1), (65535, 65535), (70_000, 3)] {
            let d = describe(png_header(w, h)).unwrap();
            assert_eq!((d.width, d.height), (w, h));
        }
    }

    #[test]
    fn png_truncated_before_ihdr_is_io_error() {
        let mut bytes = png_header(800, 600);
        bytes.truncate(20);
        assert!(matches!(describe(bytes), Err(UploadError::Io(r)) if r == "Read file error"));
    }

    #[test]
    fn png_zero_width_is_invalid() {
        assert!(matches!(
            describe(png_header(0, 600)),
            Err(UploadError::Validation(_))
        ));
    }

    // =========================================================================
    // JPEG
    // =========================================================================

    #[test]
    fn jpeg_single_sof0() {
        let d = describe(jpeg_with_segments(&[sof0_segment(8, 800, 600)])).unwrap();
        assert_eq!(d.format, ImageFormat::Jpeg);
        assert_eq!((d.width, d.height), (800, 600));
    }

    #[test]
    fn jpeg_sof0_length_seven_is_invalid() {
        assert!(matches!(
            describe(jpeg_with_segments(&[sof0_segment(7, 800, 600)])),
            Err(UploadError::Validation(_))
        ));
    }

    #[test]
    fn jpeg_skips_preceding_segments() {
        let app0 = jpeg_segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
        let dqt = jpeg_segment(0xDB, &[0u8; 65]);
        let bytes = jpeg_with_segments(&[app0, dqt, sof0_segment(17, 1024, 768)]);
        let d = describe(bytes).unwrap();
        assert_eq!((d.width, d.height), (1024, 768));
    }

    #[test]
    fn jpeg_empty_segment_body_is_skipped() {
        let empty = jpeg_segment(0xFE, &[]);
        let d = describe(jpeg_with_segments(&[empty, sof0_segment(8, 10, 20)])).unwrap();
        assert_eq!((d.width, d.height), (10, 20));
    }

    #[test]
    fn jpeg_tolerates_fill_bytes() {
        let mut sof = vec![0xFF];
        sof.extend(sof0_segment(8, 640, 480));
        let d = describe(jpeg_with_segments(&[sof])).unwrap();
        assert_eq!((d.width, d.height), (640, 480));
    }

    #[test]
    fn jpeg_segment_length_below_two_is_invalid() {
        let bad = vec![0xFF, 0xE1, 0x00, 0x01];
        assert!(matches!(
            describe(jpeg_with_segments(&[bad, sof0_segment(8, 1, 1)])),
            Err(UploadError::Validation(_))
        ));
    }

    #[test]
    fn jpeg_non_marker_byte_is_invalid() {
        let mut bytes = jpeg_with_segments(&[jpeg_segment(0xE0, b"JFIF\0")]);
        bytes.extend([0x00, 0xC0, 0x00, 0x08]);
        assert!(matches!(describe(bytes), Err(UploadError::Validation(_))));
    }

    #[test]
    fn jpeg_without_sof_is_io_error() {
        let app0 = jpeg_segment(0xE0, b"JFIF\0");
        assert!(matches!(
            describe(jpeg_with_segments(&[app0])),
            Err(UploadError::Io(_))
        ));
    }

    #[test]
    fn jpeg_truncated_sof_is_io_error() {
        let mut sof = sof0_segment(8, 800, 600);
        sof.truncate(6);
        assert!(matches!(
            describe(jpeg_with_segments(&[sof])),
            Err(UploadError::Io(_))
        ));
    }

    // =========================================================================
    // GIF
    // =========================================================================

    #[test]
    fn gif_screen_descriptor_is_little_endian() {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend([0x58, 0x02, 0x20, 0x03]);
        let d = describe(bytes).unwrap();
        assert_eq!(d.format, ImageFormat::Gif);
        assert_eq!((d.width, d.height), (600, 800));
    }

    #[test]
    fn gif_header_helper() {
        let d = describe(gif_header(320, 240)).unwrap();
        assert_eq!((d.width, d.height), (320, 240));
    }

    #[test]
    fn gif_truncated_descriptor_is_io_error() {
        let bytes = b"GIF89a\x58\x02".to_vec();
        assert!(matches!(describe(bytes), Err(UploadError::Io(_))));
    }

    // =========================================================================
    // Shared failure modes
    // =========================================================================

    #[test]
    fn unknown_magic_is_unsupported() {
        assert!(matches!(
            describe(vec![0u8; 32]),
            Err(UploadError::UnsupportedType)
        ));
    }

    #[test]
    fn shorter_than_sniff_len_is_io_error() {
        assert!(matches!(
            describe(vec![0xFF, 0xD8, 0xFF]),
            Err(UploadError::Io(_))
        ));
    }

    #[test]
    fn read_descriptor_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_fixture(tmp.path(), "upload.bin", &gif_header(12, 34));
        let d = read_descriptor(&path).unwrap();
        assert_eq!(d.format, ImageFormat::Gif);
        assert_eq!((d.width, d.height), (12, 34));
    }

    #[test]
    fn read_descriptor_missing_file_is_open_error() {
        let result = read_descriptor(Path::new("/nonexistent/upload.png"));
        assert!(matches!(result, Err(UploadError::Io(r)) if r == "Open file error"));
    }

    #[test]
    fn extension_is_ignored() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_fixture(tmp.path(), "really-a-png.gif", &png_header(5, 7));
        assert_eq!(read_descriptor(&path).unwrap().format, ImageFormat::Png);
    }
}
