use crate::error::Result;
use crate::model::Fields;
use std::collections::BTreeMap;

/// A collection as stored: document id → fields.
pub type Collection = BTreeMap<String, Fields>;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while DocStore handles the "what" (ids, timestamps, merge, notification).
pub trait StorageBackend {
    /// Load every document of a collection.
    /// A collection that was never written is empty, not an error.
    fn load_collection(&self, collection: &str) -> Result<Collection>;

    /// Replace the stored collection.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_collection(&self, collection: &str, docs: &Collection) -> Result<()>;

    /// Names of collections that have been written.
    fn list_collections(&self) -> Result<Vec<String>>;
}
