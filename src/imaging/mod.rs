//! Image inspection, geometry and codec operations.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** | magic-byte table in [`format`] |
//! | **Identify** | custom header parsers (PNG IHDR, JPEG SOF0, GIF screen descriptor) |
//! | **Plan** | pure geometry in `calculations` |
//! | **Resize / crop / encode** | `image` crate behind [`ImageCodec`] |
//!
//! The module is split into:
//! - **Format + Header**: What an upload is and how big, from its first bytes
//! - **Calculations**: Pure functions for variant geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: High-level functions combining calculations + codec

pub mod backend;
mod calculations;
pub mod format;
pub mod header;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, Dimensions, ImageCodec};
pub use calculations::{
    calculate_fill_dimensions, calculate_fit_dimensions, check_pixel_budget, plan_variant,
};
pub use format::{ImageFormat, sniff};
pub use header::{HeaderParser, parser_for, read_descriptor};
pub use operations::{EncodedVariant, render_variant};
pub use params::{CropRect, Quality, TransformPlan};
pub use rust_backend::RustCodec;
