use super::doc_store::DocStore;
use super::fs_backend::FsBackend;
use std::path::PathBuf;

pub type FileStore = DocStore<FsBackend>;

impl FileStore {
    /// Store rooted at the data directory. The directory is created on first write.
    pub fn open(root: PathBuf) -> Self {
        DocStore::with_backend(FsBackend::new(root))
    }
}
