//! Uploader configuration.
//!
//! Handles loading and validating `renditions.toml`. The configuration is
//! read once, before the [`Uploader`](crate::upload::Uploader) is built, and
//! never changes afterwards.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Largest accepted original, as width × height pixels
//! max_dimensions = 25000000
//!
//! # One table per rendition, produced in this order
//! [[image_versions]]
//! upload_dir = "uploads/large"  # Directory the variant is written to
//! name_suffix = "_large"        # Appended to the main name before the extension
//! max_width = 1600              # Bounding box, pixels
//! max_height = 1600
//! quality = 90                  # JPEG quality (0-100), ignored for PNG and GIF
//! rotate_by_exif = false        # Reserved, currently has no effect
//! crop = false                  # Fill the box and crop instead of fitting inside it
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Uploader configuration loaded from `renditions.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploaderConfig {
    /// Pixel budget (width × height) for accepted originals.
    pub max_dimensions: u64,
    /// Renditions produced for each upload, in order.
    pub image_versions: Vec<VariantSpec>,
}

/// One configured rendition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec {
    /// Directory the variant is written to.
    pub upload_dir: PathBuf,
    /// Appended to the main name, e.g. `"_thumb"`.
    #[serde(default)]
    pub name_suffix: String,
    pub max_width: u32,
    pub max_height: u32,
    /// Lossy encoding quality (0 = worst, 100 = best).
    #[serde(default = "default_quality")]
    pub quality: u32,
    /// Reserved for EXIF-based orientation; currently a no-op.
    #[serde(default)]
    pub rotate_by_exif: bool,
    /// Fill the box and crop the overflow instead of fitting inside it.
    #[serde(default)]
    pub crop: bool,
}

fn default_quality() -> u32 {
    Quality::default().value()
}

impl VariantSpec {
    /// The bounding box variants of this spec must fit in.
    pub fn bounds(&self) -> Dimensions {
        Dimensions::new(self.max_width, self.max_height)
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let at = |msg: &str| ConfigError::Validation(format!("image_versions[{index}]: {msg}"));
        if self.upload_dir.as_os_str().is_empty() {
            return Err(at("upload_dir must not be empty"));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(at("max_width and max_height must be non-zero"));
        }
        if self.quality > 100 {
            return Err(at("quality must be 0-100"));
        }
        Ok(())
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        let version = |suffix: &str, size: u32, crop: bool| VariantSpec {
            upload_dir: PathBuf::from("uploads"),
            name_suffix: suffix.to_string(),
            max_width: size,
            max_height: size,
            quality: default_quality(),
            rotate_by_exif: false,
            crop,
        };
        Self {
            max_dimensions: 25_000_000,
            image_versions: vec![
                version("_large", 1600, false),
                version("_medium", 800, false),
                version("_thumb", 200, true),
            ],
        }
    }
}

impl UploaderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dimensions == 0 {
            return Err(ConfigError::Validation(
                "max_dimensions must be non-zero".into(),
            ));
        }
        if self.image_versions.is_empty() {
            return Err(ConfigError::Validation(
                "image_versions must not be empty".into(),
            ));
        }
        for (index, spec) in self.image_versions.iter().enumerate() {
            spec.validate(index)?;
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: UploaderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<UploaderConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    UploaderConfig::from_toml(&content)
}

/// Load `path` if it exists, otherwise fall back to the stock defaults.
pub fn load_config_or_default(path: &Path) -> Result<UploaderConfig, ConfigError> {
    if !path.exists() {
        return Ok(UploaderConfig::default());
    }
    load_config(path)
}

/// Returns a fully-commented stock `renditions.toml`.
///
/// Used by the `gen-config` CLI command. Parses to [`UploaderConfig::default`].
pub fn stock_config_toml() -> &'static str {
    r##"# Renditions Configuration
# =========================
#
# Every upload is sniffed, measured and checked against the pixel budget,
# then one variant is produced per [[image_versions]] table, in order.
# Variants are named <main name><name_suffix>.<ext>, where <ext> follows the
# upload's real format (png, jpg, gif). Existing files are never overwritten.

# Largest accepted original, as width × height pixels.
max_dimensions = 25000000

# Fit inside 1600x1600, aspect preserved.
[[image_versions]]
upload_dir = "uploads"
name_suffix = "_large"
max_width = 1600
max_height = 1600
quality = 90            # JPEG quality (0-100); PNG and GIF ignore it
rotate_by_exif = false  # Reserved: EXIF orientation is not applied yet
crop = false

# Fit inside 800x800.
[[image_versions]]
upload_dir = "uploads"
name_suffix = "_medium"
max_width = 800
max_height = 800
quality = 90
rotate_by_exif = false
crop = false

# Fill 200x200 and crop the overflow, centered. When both sides reach the
# box, strips of 3:1 or longer after the resize keep their leading edge.
[[image_versions]]
upload_dir = "uploads"
name_suffix = "_thumb"
max_width = 200
max_height = 200
quality = 90
rotate_by_exif = false
crop = true
"##
}
