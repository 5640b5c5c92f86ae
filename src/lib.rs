//! # Renditions
//!
//! Produces a fixed set of resized and cropped renditions from an uploaded
//! PNG, JPEG or GIF image. An upload is identified by its magic bytes, never
//! its file name, and measured from its header before any pixels are decoded.
//!
//! # Pipeline
//!
//! ```text
//! 1. Identify   leading bytes  →  RawImageDescriptor   (format + intrinsic size)
//! 2. Validate   descriptor     →  pixel budget check   (reject before decode)
//! 3. Render     decoded image  →  one variant per configured image version
//! 4. Store      encoded bytes  →  <upload_dir>/<name><suffix>.<ext>   (never overwrites)
//! ```
//!
//! Each step fails fast with an [`error::UploadError`]. The result of a
//! successful upload is one [`types::VariantResult`] per image version, in
//! configuration order, each carrying the SHA-256 of the bytes written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`upload`] | Orchestrates one upload end to end: `Uploader::produce_variants` |
//! | [`imaging`] | Format sniffing, header parsing, variant geometry, codec seam |
//! | [`config`] | `renditions.toml` loading and validation |
//! | [`writer`] | Variant naming and create-only file writes |
//! | [`hashing`] | Content hash of encoded variants |
//! | [`types`] | `RawImageDescriptor` and `VariantResult` |
//! | [`error`] | `UploadError`, shared by every stage |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Header-First Identification
//!
//! Format and size come from a handful of header bytes (PNG IHDR, JPEG
//! baseline start-of-frame, GIF logical screen descriptor). Oversized or
//! unsupported uploads are rejected without allocating a pixel buffer.
//!
//! ## Same Format In, Same Format Out
//!
//! Every variant is re-encoded in the format the upload was sniffed as, and
//! named with that format's extension. The configured quality only affects
//! JPEG.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling (Lanczos3) and encoding use the `image` crate behind
//! the [`imaging::ImageCodec`] trait. Tests swap in a recording mock so the
//! orchestration logic is exercised without touching pixels.

pub mod config;
pub mod error;
pub mod hashing;
pub mod imaging;
pub mod output;
pub mod types;
pub mod upload;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
