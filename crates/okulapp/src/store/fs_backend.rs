use super::backend::{Collection, StorageBackend};
use crate::error::{Result, SiteError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem backend: one pretty-printed `{collection}.json` per collection.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SiteError::Store(format!(
                "Invalid collection name \"{}\"",
                collection
            )));
        }
        Ok(self.root.join(format!("{}.json", collection)))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(SiteError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_collection(&self, collection: &str) -> Result<Collection> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            return Ok(Collection::new());
        }
        let content = fs::read_to_string(&path).map_err(SiteError::Io)?;
        if content.trim().is_empty() {
            return Ok(Collection::new());
        }
        let docs: Collection = serde_json::from_str(&content).map_err(SiteError::Serialization)?;
        Ok(docs)
    }

    fn save_collection(&self, collection: &str, docs: &Collection) -> Result<()> {
        let path = self.collection_path(collection)?;
        self.ensure_dir(&self.root)?;

        let content = serde_json::to_string_pretty(docs).map_err(SiteError::Serialization)?;

        // Atomic write: tmp file then rename
        let tmp_file = self
            .root
            .join(format!(".{}-{}.tmp", collection, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(SiteError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(SiteError::Io(e));
        }

        Ok(())
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(SiteError::Io)? {
            let path = entry.map_err(SiteError::Io)?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
