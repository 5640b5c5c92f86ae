//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait is the seam between the uploader, which decides
//! *what* transforms a variant needs, and the pixel work itself: decode,
//! resize, crop and encode.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image` crate.

use super::format::ImageFormat;
use super::params::{CropRect, Quality};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image or a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel area, wide enough for any pair of `u32` sides.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether both sides fit inside `bounds`.
    pub fn fits_within(self, bounds: Dimensions) -> bool {
        self.width <= bounds.width && self.height <= bounds.height
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decode, transform and encode operations needed to render variants.
///
/// `Sync` so one codec can serve uploads processed in parallel.
pub trait ImageCodec: Sync {
    /// Decoded, in-memory image.
    type Image;

    /// Fully decode the image at `path`.
    fn load(&self, path: &Path) -> Result<Self::Image, CodecError>;

    /// Current pixel size of `image`.
    fn size(&self, image: &Self::Image) -> Dimensions;

    /// Resample to exactly `target`. `smoothing` selects a high-quality filter.
    fn resize_to(
        &self,
        image: &Self::Image,
        target: Dimensions,
        smoothing: bool,
    ) -> Result<Self::Image, CodecError>;

    /// Cut `rect` out of `image`. Fails if the rectangle leaves the image.
    fn crop(&self, image: &Self::Image, rect: CropRect) -> Result<Self::Image, CodecError>;

    /// Encode to `format`. Quality applies to lossy formats only.
    fn encode(
        &self,
        image: &Self::Image,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError>;
}
