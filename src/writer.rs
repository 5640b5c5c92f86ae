//! Persisting encoded variants.
//!
//! A variant lands at `upload_dir/<main name><suffix>.<ext>`. Existing files
//! are never overwritten, even when the new bytes are identical.
//!
//! The existence check and the create are two steps, so two uploads racing
//! for the same path can both pass the check. Opening with `create_new`
//! still makes the loser fail instead of clobbering the winner.

use crate::error::{Result, UploadError};
use crate::imaging::ImageFormat;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File name of a variant: `<main name><suffix>.<ext>`.
pub fn variant_name(local_main_name: &str, name_suffix: &str, format: ImageFormat) -> String {
    format!("{}{}.{}", local_main_name, name_suffix, format.extension())
}

/// Full target path of a variant inside `upload_dir`.
pub fn variant_path(upload_dir: &Path, name: &str) -> PathBuf {
    upload_dir.join(name)
}

/// Write `bytes` to a fresh file at `path`.
///
/// Fails with `Io("File already exist")` if anything is already there and
/// with `Io("Write file failed")` on any other I/O error.
pub fn write_variant(path: &Path, bytes: &[u8]) -> Result<()> {
    if path.exists() {
        return Err(UploadError::io("File already exist"));
    }

    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(bytes));

    match written {
        Ok(()) => {
            tracing::debug!("wrote {} bytes to {}", bytes.len(), path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(UploadError::io("File already exist"))
        }
        Err(e) => {
            tracing::debug!("writing {} failed: {e}", path.display());
            Err(UploadError::io("Write file failed"))
        }
    }
}
