//! # Media Layer
//!
//! Images attached to sections and entities live in a media host, not in the
//! document store. Documents only keep two references:
//!
//! - `image`: the public URL shown to visitors,
//! - `imagePublicId`: the opaque id needed to delete the object later.
//!
//! ## Replace and Delete Discipline
//!
//! When an image is replaced or its owner deleted, the old object is deleted
//! through [`delete_quietly`]. A failed delete is logged and otherwise ignored:
//! an orphaned media object is a resource leak, never a broken document.
//! Callers must not rely on deletes actually removing anything; some hosts
//! implement delete as a no-op.
//!
//! ## Implementations
//!
//! - [`fs::FsMedia`]: copies files under a media root and serves them from a
//!   configured base URL.
//! - [`memory::InMemoryMedia`]: keeps bytes in memory and journals every call,
//!   for tests.

use crate::error::{Result, SiteError};
use serde::Serialize;
use std::path::Path;

pub mod fs;
pub mod memory;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(SiteError::Io)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { file_name, bytes })
    }

    /// Lowercased extension including the dot, or empty.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedMedia {
    pub download_url: String,
    pub public_id: String,
}

/// Abstract interface for the media host.
pub trait MediaStore {
    /// Store `file` under `folder` and return its public URL and id.
    fn upload_file(&self, folder: &str, file: &MediaFile) -> Result<UploadedMedia>;

    /// Delete a previously uploaded object. Best-effort.
    fn delete_file(&self, public_id: &str) -> Result<()>;
}

/// Deletes a media object, logging instead of failing.
pub fn delete_quietly<M: MediaStore + ?Sized>(media: &M, public_id: &str) {
    match media.delete_file(public_id) {
        Ok(()) => tracing::debug!(public_id, "media deleted"),
        Err(e) => tracing::warn!(public_id, "could not delete media, leaving it orphaned: {}", e),
    }
}

/// Folder paths are `/`-separated segments of `[A-Za-z0-9_-]`.
pub(crate) fn validate_folder(folder: &str) -> Result<()> {
    let valid = !folder.is_empty()
        && folder.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(SiteError::Media(format!("Invalid media folder \"{}\"", folder)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_normalized() {
        assert_eq!(MediaFile::new("Photo.JPG", vec![]).extension(), ".jpg");
        assert_eq!(MediaFile::new("noext", vec![]).extension(), "");
        assert_eq!(MediaFile::new("bad.j p g", vec![]).extension(), "");
    }

    #[test]
    fn folders_are_validated() {
        assert!(validate_folder("pages/about").is_ok());
        assert!(validate_folder("teachers").is_ok());
        assert!(validate_folder("../etc").is_err());
        assert!(validate_folder("a//b").is_err());
        assert!(validate_folder("").is_err());
    }
}
