use super::{validate_folder, MediaFile, MediaStore, UploadedMedia};
use crate::error::{Result, SiteError};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Media host backed by a local directory.
///
/// Files land at `{root}/{folder}/{uuid}{ext}`; the public id is the path
/// relative to the root and the URL is `{base_url}/{public_id}`.
pub struct FsMedia {
    root: PathBuf,
    base_url: String,
}

impl FsMedia {
    pub fn new(root: PathBuf, base_url: impl Into<String>) -> Self {
        Self {
            root,
            base_url: base_url.into(),
        }
    }

    fn object_path(&self, public_id: &str) -> Result<PathBuf> {
        let (folder, name) = public_id
            .rsplit_once('/')
            .ok_or_else(|| SiteError::Media(format!("Invalid media id \"{}\"", public_id)))?;
        validate_folder(folder)?;
        let name_ok = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        if !name_ok {
            return Err(SiteError::Media(format!("Invalid media id \"{}\"", public_id)));
        }
        Ok(self.root.join(folder).join(name))
    }
}

impl MediaStore for FsMedia {
    fn upload_file(&self, folder: &str, file: &MediaFile) -> Result<UploadedMedia> {
        validate_folder(folder)?;
        let public_id = format!("{}/{}{}", folder, Uuid::new_v4(), file.extension());
        let path = self.object_path(&public_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SiteError::Io)?;
        }
        fs::write(&path, &file.bytes).map_err(SiteError::Io)?;

        Ok(UploadedMedia {
            download_url: format!("{}/{}", self.base_url.trim_end_matches('/'), public_id),
            public_id,
        })
    }

    fn delete_file(&self, public_id: &str) -> Result<()> {
        let path = self.object_path(public_id)?;
        if path.exists() {
            fs::remove_file(&path).map_err(SiteError::Io)?;
        }
        Ok(())
    }
}
