//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader` with content-based format guessing |
//! | Resize | `DynamicImage::resize_exact`, `Lanczos3` when smoothing, else `Nearest` |
//! | Crop | `DynamicImage::crop_imm`, bounds checked first |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with the variant quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → GIF | `image::codecs::gif::GifEncoder`, single frame |

use super::backend::{CodecError, Dimensions, ImageCodec};
use super::format::ImageFormat;
use super::params::{CropRect, Quality};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Frame, ImageReader};
use std::path::Path;

/// Codec backed by the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    // The JPEG encoder takes 1-100 and has no alpha channel
    let quality = quality.value().clamp(1, 100) as u8;
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| CodecError::ProcessingFailed(format!("PNG encode failed: {}", e)))?;
    Ok(buf)
}

fn encode_gif(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    {
        // The trailer is written when the encoder drops
        let mut encoder = GifEncoder::new(&mut buf);
        encoder
            .encode_frame(Frame::new(img.to_rgba8()))
            .map_err(|e| CodecError::ProcessingFailed(format!("GIF encode failed: {}", e)))?;
    }
    Ok(buf)
}

impl ImageCodec for RustCodec {
    type Image = DynamicImage;

    fn load(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                CodecError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    fn size(&self, image: &DynamicImage) -> Dimensions {
        Dimensions::new(image.width(), image.height())
    }

    fn resize_to(
        &self,
        image: &DynamicImage,
        target: Dimensions,
        smoothing: bool,
    ) -> Result<DynamicImage, CodecError> {
        if target.width == 0 || target.height == 0 {
            return Err(CodecError::ProcessingFailed(format!(
                "Cannot resize to empty size {target}"
            )));
        }
        let filter = if smoothing {
            FilterType::Lanczos3
        } else {
            FilterType::Nearest
        };
        Ok(image.resize_exact(target.width, target.height, filter))
    }

    fn crop(&self, image: &DynamicImage, rect: CropRect) -> Result<DynamicImage, CodecError> {
        if rect.width == 0 || rect.height == 0 || !rect.fits_in(self.size(image)) {
            return Err(CodecError::ProcessingFailed(format!(
                "Crop {}x{} at ({}, {}) outside {}x{} image",
                rect.width,
                rect.height,
                rect.x,
                rect.y,
                image.width(),
                image.height()
            )));
        }
        Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        match format {
            ImageFormat::Jpeg => encode_jpeg(image, quality),
            ImageFormat::Png => encode_png(image),
            ImageFormat::Gif => encode_gif(image),
        }
    }
}
