//! Pure calculation functions for variant geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Overflow ratios (`source / bound` per axis) are compared exactly by
//! cross-multiplication in `u64`; no ratio is ever truncated to an integer.

use super::backend::Dimensions;
use super::params::{CropRect, TransformPlan};
use crate::error::{Result, UploadError};

/// An image whose long side is at least this many times its short side is
/// treated as a strip: crops keep its leading edge instead of its middle.
const PANORAMIC_FACTOR: u64 = 3;

/// Reject originals whose pixel area exceeds `max_pixels`.
///
/// An area exactly equal to the budget passes.
pub fn check_pixel_budget(size: Dimensions, max_pixels: u64) -> Result<()> {
    if size.area() > max_pixels {
        return Err(UploadError::Size {
            width: size.width,
            height: size.height,
            max: max_pixels,
        });
    }
    Ok(())
}

/// Whether the width overflows its bound by strictly more than the height does.
///
/// `W / maxW > H / maxH` rearranged as `W * maxH > H * maxW`.
fn width_overflows_more(source: Dimensions, bounds: Dimensions) -> bool {
    u64::from(source.width) * u64::from(bounds.height)
        > u64::from(source.height) * u64::from(bounds.width)
}

/// Scale `side` by `numerator / denominator`, truncated, never below one pixel.
fn scale(side: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = u64::from(side) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Dimensions that fit inside `bounds` while preserving the source aspect ratio.
///
/// The axis that overflows most lands exactly on its bound.
pub fn calculate_fit_dimensions(source: Dimensions, bounds: Dimensions) -> Dimensions {
    if width_overflows_more(source, bounds) {
        Dimensions::new(
            bounds.width,
            scale(source.height, bounds.width, source.width),
        )
    } else {
        Dimensions::new(
            scale(source.width, bounds.height, source.height),
            bounds.height,
        )
    }
}

/// Dimensions that cover `bounds` while preserving the source aspect ratio
/// (resize before crop).
///
/// The axis that overflows least lands exactly on its bound; the other may
/// exceed. Ties resize by width.
pub fn calculate_fill_dimensions(source: Dimensions, bounds: Dimensions) -> Dimensions {
    if width_overflows_more(source, bounds) {
        Dimensions::new(
            scale(source.width, bounds.height, source.height),
            bounds.height,
        )
    } else {
        Dimensions::new(
            bounds.width,
            scale(source.height, bounds.width, source.width),
        )
    }
}

/// Centered (floor) offset of a `target`-long window along an axis of `len`.
fn centered_offset(len: u32, target: u32) -> u32 {
    (len - target) / 2
}

/// Like [`centered_offset`], except that an axis at least
/// [`PANORAMIC_FACTOR`] times as long as `cross` keeps its leading edge.
fn strip_offset(len: u32, target: u32, cross: u32) -> u32 {
    if u64::from(len) >= PANORAMIC_FACTOR * u64::from(cross) {
        0
    } else {
        centered_offset(len, target)
    }
}

/// Crop `size` down to `bounds` on every axis that overflows, placing each
/// window with `offset(len, target, cross)`.
///
/// Callers guarantee at most one axis overflows.
fn crop_to_bounds(
    size: Dimensions,
    bounds: Dimensions,
    offset: impl Fn(u32, u32, u32) -> u32,
) -> CropRect {
    let mut rect = CropRect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    if size.width > bounds.width {
        rect.x = offset(size.width, bounds.width, size.height);
        rect.width = bounds.width;
    }
    if size.height > bounds.height {
        rect.y = offset(size.height, bounds.height, size.width);
        rect.height = bounds.height;
    }
    rect
}

/// Decide how to derive a variant of `source` that fits `bounds`.
///
/// 1. Fits already → [`TransformPlan::Identity`].
/// 2. No crop → resize so the most-overflowing axis matches its bound.
/// 3. Crop, one axis overflows and the other is strictly inside its bound →
///    centered crop of that axis, no resize.
/// 4. Crop, both axes reach or exceed their bounds → resize so the
///    least-overflowing axis matches its bound (width on ties), then crop the
///    other axis. The crop is centered unless the resized image is a strip
///    of at least 3:1 along the cropped axis, which keeps its leading edge.
///    A resize that would leave the size unchanged is skipped.
///
/// Scaled sides are truncated. Output never exceeds `bounds` nor the source.
///
/// # Examples
/// ```
/// # use renditions::imaging::{plan_variant, CropRect, Dimensions, TransformPlan};
/// let plan = plan_variant(Dimensions::new(1200, 400), Dimensions::new(400, 400), true);
/// assert_eq!(
///     plan,
///     TransformPlan::Crop(CropRect { x: 0, y: 0, width: 400, height: 400 })
/// );
/// ```
pub fn plan_variant(source: Dimensions, bounds: Dimensions, crop: bool) -> TransformPlan {
    if source.fits_within(bounds) {
        return TransformPlan::Identity;
    }

    if !crop {
        return TransformPlan::Resize(calculate_fit_dimensions(source, bounds));
    }

    let reaches_both = source.width >= bounds.width && source.height >= bounds.height;
    if !reaches_both {
        let crop = crop_to_bounds(source, bounds, |len, target, _| {
            centered_offset(len, target)
        });
        return TransformPlan::Crop(crop);
    }

    let resize = calculate_fill_dimensions(source, bounds);
    let crop = crop_to_bounds(resize, bounds, strip_offset);
    if resize == source {
        TransformPlan::Crop(crop)
    } else {
        TransformPlan::ResizeThenCrop { resize, crop }
    }
}
