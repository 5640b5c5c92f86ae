//! Producing the configured renditions of one upload.
//!
//! ```text
//! read header → sniff → dimensions → pixel budget → decode
//!     └─ for each image version, in order:
//!          plan → transform → encode → hash → write (no overwrite)
//! ```
//!
//! Every step fails fast. The first error aborts the remaining versions and
//! is returned as is. Variants already written for the upload stay on disk;
//! there is no rollback.
//!
//! Different uploads share no state beyond the filesystem, so they may be
//! processed concurrently as long as their target paths differ.

use crate::config::{UploaderConfig, VariantSpec};
use crate::error::{Result, UploadError};
use crate::hashing::content_hash;
use crate::imaging::{
    ImageCodec, RustCodec, check_pixel_budget, read_descriptor, render_variant,
};
use crate::types::{RawImageDescriptor, VariantResult};
use crate::writer::{variant_name, variant_path, write_variant};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Progress reported while an upload is processed.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Header read and pixel budget passed.
    Identified {
        source: PathBuf,
        descriptor: RawImageDescriptor,
    },
    /// One variant written to disk.
    VariantWritten {
        source: PathBuf,
        result: VariantResult,
    },
}

/// Produces renditions of uploaded images according to a fixed configuration.
pub struct Uploader<C: ImageCodec = RustCodec> {
    config: UploaderConfig,
    codec: C,
}

impl Uploader<RustCodec> {
    pub fn new(config: UploaderConfig) -> Self {
        Self::with_codec(config, RustCodec::new())
    }
}

impl<C: ImageCodec> Uploader<C> {
    /// Build an uploader around a specific codec (allows testing with a mock).
    pub fn with_codec(config: UploaderConfig, codec: C) -> Self {
        for spec in config.image_versions.iter().filter(|s| s.rotate_by_exif) {
            tracing::warn!(
                "rotate_by_exif is set for '{}' but EXIF orientation is not applied",
                spec.name_suffix
            );
        }
        Self { config, codec }
    }

    /// Produce every configured variant of the image at `path`.
    pub fn produce_variants(
        &self,
        path: &Path,
        local_main_name: &str,
    ) -> Result<Vec<VariantResult>> {
        self.produce_variants_with_events(path, local_main_name, None)
    }

    /// Like [`produce_variants`](Self::produce_variants), sending an
    /// [`UploadEvent`] after each completed step.
    pub fn produce_variants_with_events(
        &self,
        path: &Path,
        local_main_name: &str,
        events: Option<Sender<UploadEvent>>,
    ) -> Result<Vec<VariantResult>> {
        let emit = |event: UploadEvent| {
            if let Some(tx) = &events {
                // A dropped receiver only means nobody is listening
                let _ = tx.send(event);
            }
        };

        let descriptor = read_descriptor(path)?;
        tracing::debug!(
            "{}: {:?} {}x{}",
            path.display(),
            descriptor.format,
            descriptor.width,
            descriptor.height
        );
        check_pixel_budget(descriptor.dimensions(), self.config.max_dimensions)?;
        emit(UploadEvent::Identified {
            source: path.to_path_buf(),
            descriptor,
        });

        let image = self.codec.load(path).map_err(|e| {
            tracing::debug!("decode failed: {e}");
            UploadError::invalid(format!("image data could not be decoded: {e}"))
        })?;

        let mut results = Vec::with_capacity(self.config.image_versions.len());
        for spec in &self.config.image_versions {
            let result = self.produce_one(&image, &descriptor, spec, local_main_name)?;
            emit(UploadEvent::VariantWritten {
                source: path.to_path_buf(),
                result: result.clone(),
            });
            results.push(result);
        }

        Ok(results)
    }

    fn produce_one(
        &self,
        image: &C::Image,
        descriptor: &RawImageDescriptor,
        spec: &VariantSpec,
        local_main_name: &str,
    ) -> Result<VariantResult> {
        let encoded = render_variant(
            &self.codec,
            image,
            spec.bounds(),
            spec.crop,
            descriptor.format,
            spec.quality(),
        )?;

        let content_hash = content_hash(&encoded.bytes);
        let name = variant_name(local_main_name, &spec.name_suffix, descriptor.format);
        let path = variant_path(&spec.upload_dir, &name);
        write_variant(&path, &encoded.bytes)?;

        Ok(VariantResult {
            path,
            name,
            size_bytes: encoded.bytes.len() as u64,
            content_hash,
            width: encoded.width,
            height: encoded.height,
        })
    }
}
