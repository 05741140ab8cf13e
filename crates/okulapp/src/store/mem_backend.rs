use super::backend::{Collection, StorageBackend};
use crate::error::{Result, SiteError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the crate is single-threaded.
/// This keeps the `StorageBackend` trait on `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    collections: RefCell<HashMap<String, Collection>>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load fail, as an unreachable database would.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Make every save fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful collection saves so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn load_collection(&self, collection: &str) -> Result<Collection> {
        if self.simulate_read_error.get() {
            return Err(SiteError::Store("Simulated read error".to_string()));
        }
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn save_collection(&self, collection: &str, docs: &Collection) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SiteError::Store("Simulated write error".to_string()));
        }
        self.collections
            .borrow_mut()
            .insert(collection.to_string(), docs.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.collections.borrow().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
