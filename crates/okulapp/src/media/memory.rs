use super::{validate_folder, MediaFile, MediaStore, UploadedMedia};
use crate::error::{Result, SiteError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

/// One recorded call against [`InMemoryMedia`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Upload {
        folder: String,
        file_name: String,
        public_id: String,
    },
    Delete {
        public_id: String,
    },
}

/// Shared view of the calls made so far. Clones observe the same journal.
#[derive(Debug, Clone, Default)]
pub struct MediaJournal(Rc<RefCell<Vec<MediaCall>>>);

impl MediaJournal {
    pub fn calls(&self) -> Vec<MediaCall> {
        self.0.borrow().clone()
    }

    pub fn uploads(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|c| matches!(c, MediaCall::Upload { .. }))
            .count()
    }

    /// How many deletes targeted `public_id`.
    pub fn deletes_of(&self, public_id: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|c| matches!(c, MediaCall::Delete { public_id: id } if id == public_id))
            .count()
    }

    fn record(&self, call: MediaCall) {
        self.0.borrow_mut().push(call);
    }
}

/// In-memory media host for tests.
#[derive(Default)]
pub struct InMemoryMedia {
    files: RefCell<HashMap<String, Vec<u8>>>,
    journal: MediaJournal,
    simulate_upload_error: Cell<bool>,
    simulate_delete_error: Cell<bool>,
}

impl InMemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> MediaJournal {
        self.journal.clone()
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.files.borrow().contains_key(public_id)
    }

    /// Pretend an object already exists, e.g. one uploaded in an earlier session.
    pub fn seed(&self, public_id: &str) {
        self.files
            .borrow_mut()
            .insert(public_id.to_string(), Vec::new());
    }

    pub fn set_simulate_upload_error(&self, simulate: bool) {
        self.simulate_upload_error.set(simulate);
    }

    pub fn set_simulate_delete_error(&self, simulate: bool) {
        self.simulate_delete_error.set(simulate);
    }
}

impl MediaStore for InMemoryMedia {
    fn upload_file(&self, folder: &str, file: &MediaFile) -> Result<UploadedMedia> {
        validate_folder(folder)?;
        if self.simulate_upload_error.get() {
            return Err(SiteError::Media("Simulated upload error".to_string()));
        }
        let public_id = format!("{}/{}{}", folder, Uuid::new_v4(), file.extension());
        self.files
            .borrow_mut()
            .insert(public_id.clone(), file.bytes.clone());
        self.journal.record(MediaCall::Upload {
            folder: folder.to_string(),
            file_name: file.file_name.clone(),
            public_id: public_id.clone(),
        });
        Ok(UploadedMedia {
            download_url: format!("memory://{}", public_id),
            public_id,
        })
    }

    fn delete_file(&self, public_id: &str) -> Result<()> {
        self.journal.record(MediaCall::Delete {
            public_id: public_id.to_string(),
        });
        if self.simulate_delete_error.get() {
            return Err(SiteError::Media("Simulated delete error".to_string()));
        }
        self.files.borrow_mut().remove(public_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journals_uploads_and_deletes() {
        let media = InMemoryMedia::new();
        let journal = media.journal();

        let uploaded = media
            .upload_file("teachers", &MediaFile::new("a.png", vec![1, 2]))
            .unwrap();
        assert!(uploaded.public_id.starts_with("teachers/"));
        assert!(uploaded.public_id.ends_with(".png"));
        assert!(media.contains(&uploaded.public_id));

        media.delete_file(&uploaded.public_id).unwrap();
        assert!(!media.contains(&uploaded.public_id));

        assert_eq!(journal.uploads(), 1);
        assert_eq!(journal.deletes_of(&uploaded.public_id), 1);
    }

    #[test]
    fn failed_upload_is_not_journaled() {
        let media = InMemoryMedia::new();
        media.set_simulate_upload_error(true);
        assert!(media
            .upload_file("gallery", &MediaFile::new("a.png", vec![]))
            .is_err());
        assert_eq!(media.journal().uploads(), 0);
    }
}
