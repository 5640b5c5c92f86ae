//! CLI output formatting for uploads, identification and planning.
//!
//! # Output Format
//!
//! ## Produce / Batch
//!
//! ```text
//! photo.jpg: jpeg 4000x3000
//!     abc_large.jpg  1600x1200  412.3 KB
//!         Path: uploads/abc_large.jpg
//!         SHA-256: 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08
//! ```
//!
//! ## Identify
//!
//! ```text
//! photo.jpg
//!     Format: jpeg (image/jpeg)
//!     Size: 4000x3000 (12000000 pixels)
//! ```
//!
//! ## Plan
//!
//! ```text
//! 1200x400 in 400x400 (crop): crop 400x400 at (0, 0) → 400x400
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::{Dimensions, TransformPlan};
use crate::types::{RawImageDescriptor, VariantResult};
use crate::upload::UploadEvent;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count with one decimal.
fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn descriptor_line(source: &Path, descriptor: &RawImageDescriptor) -> String {
    format!(
        "{}: {} {}x{}",
        display_name(source),
        descriptor.format.name(),
        descriptor.width,
        descriptor.height
    )
}

/// Lines for one written variant.
fn variant_lines(result: &VariantResult) -> Vec<String> {
    vec![
        format!(
            "{}{}  {}x{}  {}",
            indent(1),
            result.name,
            result.width,
            result.height,
            format_bytes(result.size_bytes)
        ),
        format!("{}Path: {}", indent(2), result.path.display()),
        format!("{}SHA-256: {}", indent(2), result.content_hash),
    ]
}

// ============================================================================
// Produce / Batch
// ============================================================================

/// Format a single upload progress event as display lines.
pub fn format_upload_event(event: &UploadEvent) -> Vec<String> {
    match event {
        UploadEvent::Identified { source, descriptor } => {
            vec![descriptor_line(source, descriptor)]
        }
        UploadEvent::VariantWritten { result, .. } => variant_lines(result),
    }
}

/// Format the closing summary of a batch run.
pub fn format_batch_summary(succeeded: usize, failed: &[(String, String)]) -> Vec<String> {
    let mut lines = Vec::new();
    if !failed.is_empty() {
        lines.push("Failed".to_string());
        for (source, error) in failed {
            lines.push(format!("{}{source}: {error}", indent(1)));
        }
    }
    let noun = |n: usize| if n == 1 { "upload" } else { "uploads" };
    lines.push(format!(
        "Processed {succeeded} {}, {} failed",
        noun(succeeded),
        failed.len()
    ));
    lines
}

pub fn print_batch_summary(succeeded: usize, failed: &[(String, String)]) {
    for line in format_batch_summary(succeeded, failed) {
        println!("{line}");
    }
}

// ============================================================================
// Identify
// ============================================================================

/// Format what the header of `source` says about it.
pub fn format_descriptor(source: &Path, descriptor: &RawImageDescriptor) -> Vec<String> {
    vec![
        source.display().to_string(),
        format!(
            "{}Format: {} ({})",
            indent(1),
            descriptor.format.name(),
            descriptor.format.mime_type()
        ),
        format!(
            "{}Size: {}x{} ({} pixels)",
            indent(1),
            descriptor.width,
            descriptor.height,
            descriptor.dimensions().area()
        ),
    ]
}

pub fn print_descriptor(source: &Path, descriptor: &RawImageDescriptor) {
    for line in format_descriptor(source, descriptor) {
        println!("{line}");
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format a planned transform and the size it produces.
pub fn format_plan(
    source: Dimensions,
    bounds: Dimensions,
    crop: bool,
    plan: &TransformPlan,
) -> Vec<String> {
    let mode = if crop { "crop" } else { "fit" };
    vec![format!(
        "{source} in {bounds} ({mode}): {} \u{2192} {}",
        plan.describe(),
        plan.output_dimensions(source)
    )]
}

pub fn print_plan(source: Dimensions, bounds: Dimensions, crop: bool, plan: &TransformPlan) {
    for line in format_plan(source, bounds, crop, plan) {
        println!("{line}");
    }
}
