//! Parameter types for image operations.
//!
//! These types describe *what* to do to an image, not *how*. They are the
//! interface between the planner in [`calculations`](super::calculations),
//! which decides the geometry, and the [`codec`](super::backend), which does
//! the pixel work.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (0-100, default 90). Clamped on construction.
//! - [`CropRect`]: Rectangle cut out of an image, origin at the top-left corner.
//! - [`TransformPlan`]: The complete transform for one variant.

use super::backend::Dimensions;
use serde::Serialize;

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Whether the rectangle lies entirely inside an image of `size`.
    pub fn fits_in(self, size: Dimensions) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(size.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(size.height)
    }

    pub fn dimensions(self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// How one variant is derived from the original.
///
/// Produced by [`plan_variant`](super::calculations::plan_variant) and
/// consumed straight away; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformPlan {
    /// The original already fits the box.
    Identity,
    /// Scale to exactly these dimensions, aspect preserved.
    Resize(Dimensions),
    /// Cut one overflowing axis down, no scaling.
    Crop(CropRect),
    /// Scale so one axis matches the box, then cut the other axis.
    ResizeThenCrop { resize: Dimensions, crop: CropRect },
}

impl TransformPlan {
    /// Size of the image once the plan has been applied to `source`.
    pub fn output_dimensions(&self, source: Dimensions) -> Dimensions {
        match self {
            TransformPlan::Identity => source,
            TransformPlan::Resize(target) => *target,
            TransformPlan::Crop(rect) | TransformPlan::ResizeThenCrop { crop: rect, .. } => {
                rect.dimensions()
            }
        }
    }

    /// Short human-readable label for CLI output.
    pub fn describe(&self) -> String {
        match self {
            TransformPlan::Identity => "keep original".to_string(),
            TransformPlan::Resize(target) => format!("resize to {target}"),
            TransformPlan::Crop(rect) => format!(
                "crop {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            ),
            TransformPlan::ResizeThenCrop { resize, crop } => format!(
                "resize to {resize}, then crop {}x{} at ({}, {})",
                crop.width, crop.height, crop.x, crop.y
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 0);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn crop_rect_bounds() {
        let rect = CropRect {
            x: 100,
            y: 0,
            width: 400,
            height: 400,
        };
        assert!(rect.fits_in(Dimensions::new(500, 400)));
        assert!(!rect.fits_in(Dimensions::new(499, 400)));
        assert!(!rect.fits_in(Dimensions::new(500, 399)));
    }

    #[test]
    fn crop_rect_bounds_near_u32_max() {
        let rect = CropRect {
            x: u32::MAX,
            y: 0,
            width: 2,
            height: 1,
        };
        assert!(!rect.fits_in(Dimensions::new(u32::MAX, 1)));
    }

    #[test]
    fn output_dimensions_per_plan() {
        let source = Dimensions::new(1000, 800);
        let rect = CropRect {
            x: 0,
            y: 10,
            width: 300,
            height: 200,
        };
        assert_eq!(TransformPlan::Identity.output_dimensions(source), source);
        assert_eq!(
            TransformPlan::Resize(Dimensions::new(500, 400)).output_dimensions(source),
            Dimensions::new(500, 400)
        );
        assert_eq!(
            TransformPlan::Crop(rect).output_dimensions(source),
            Dimensions::new(300, 200)
        );
        assert_eq!(
            TransformPlan::ResizeThenCrop {
                resize: Dimensions::new(375, 300),
                crop: rect,
            }
            .output_dimensions(source),
            Dimensions::new(300, 200)
        );
    }

    #[test]
    fn describe_resize_then_crop() {
        let plan = TransformPlan::ResizeThenCrop {
            resize: Dimensions::new(400, 666),
            crop: CropRect {
                x: 0,
                y: 133,
                width: 400,
                height: 400,
            },
        };
        assert_eq!(
            plan.describe(),
            "resize to 400x666, then crop 400x400 at (0, 133)"
        );
    }
}
