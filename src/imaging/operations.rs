//! High-level image operations.
//!
//! These functions combine calculations with codec execution: they plan a
//! variant's geometry, apply it through the codec, and encode the result.

use super::backend::{CodecError, Dimensions, ImageCodec};
use super::calculations::plan_variant;
use super::format::ImageFormat;
use super::params::{Quality, TransformPlan};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// A variant encoded in memory, not yet written.
#[derive(Debug, Clone)]
pub struct EncodedVariant {
    pub plan: TransformPlan,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Apply `plan` to `image`.
///
/// Returns `None` for [`TransformPlan::Identity`]: the original is used as is.
pub fn apply_plan<C: ImageCodec>(
    codec: &C,
    image: &C::Image,
    plan: &TransformPlan,
) -> Result<Option<C::Image>> {
    let transformed = match plan {
        TransformPlan::Identity => None,
        TransformPlan::Resize(target) => Some(codec.resize_to(image, *target, true)?),
        TransformPlan::Crop(rect) => Some(codec.crop(image, *rect)?),
        TransformPlan::ResizeThenCrop { resize, crop } => {
            let resized = codec.resize_to(image, *resize, true)?;
            Some(codec.crop(&resized, *crop)?)
        }
    };
    Ok(transformed)
}

/// Plan, transform and encode one variant of a decoded original.
pub fn render_variant<C: ImageCodec>(
    codec: &C,
    image: &C::Image,
    bounds: Dimensions,
    crop: bool,
    format: ImageFormat,
    quality: Quality,
) -> Result<EncodedVariant> {
    let plan = plan_variant(codec.size(image), bounds, crop);
    tracing::debug!("variant within {bounds}: {}", plan.describe());

    let transformed = apply_plan(codec, image, &plan)?;
    let output = transformed.as_ref().unwrap_or(image);
    let size = codec.size(output);
    let bytes = codec.encode(output, format, quality)?;

    Ok(EncodedVariant {
        plan,
        bytes,
        width: size.width,
        height: size.height,
    })
}
