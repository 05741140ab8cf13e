//! # Storage Layer
//!
//! This module defines the document store abstraction. The [`DocumentStore`]
//! trait is the narrow interface the rest of the crate consumes; it mirrors the
//! hosted document database the site was built on:
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `get_collection` | All documents of a collection, each with its `id` |
//! | `get_document` | One document, `None` when absent |
//! | `add_document` | Store assigns the id and stamps `createdAt`/`updatedAt` |
//! | `update_document` | Shallow merge; omitted fields are kept; stamps `updatedAt` |
//! | `delete_document` | Removes the document |
//! | `subscribe` | Full snapshot after every change until unsubscribed |
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: raw load/save of a whole collection (the "how").
//! - [`doc_store::DocStore`]: document semantics over any backend (the "what"):
//!   id assignment, timestamps, shallow merge, subscriber notification.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: JSON file per collection, atomic writes.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O, with
//!   read/write failure simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! .okul/
//! ├── okul.toml             # Configuration
//! ├── pageContent.json      # { "<id>": { "pageId": ..., "sections": {...} } }
//! ├── teachers.json
//! ├── ...
//! └── uploads/              # Media files (see crate::media)
//! ```
//!
//! ## Concurrency
//!
//! There is no version field and no locking. A write replaces whatever the
//! backend holds for the touched document; interleaved read-modify-write cycles
//! are last-writer-wins.

use crate::error::Result;
use crate::model::{Document, Fields};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub mod backend;
pub mod doc_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

/// Receives the complete current contents of a collection.
pub type SnapshotCallback = Rc<dyn Fn(&[Document])>;

/// Abstract interface for document storage.
pub trait DocumentStore {
    /// All documents in a collection (unordered).
    fn get_collection(&self, collection: &str) -> Result<Vec<Document>>;

    /// A single document, or `None` if it does not exist.
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Add a document and return its new id.
    fn add_document(&mut self, collection: &str, fields: Fields) -> Result<String>;

    /// Shallow-merge `partial` into an existing document.
    fn update_document(&mut self, collection: &str, id: &str, partial: Fields) -> Result<()>;

    /// Delete a document permanently.
    fn delete_document(&mut self, collection: &str, id: &str) -> Result<()>;

    /// Deliver full snapshots of `collection` after every change.
    /// Delivery continues until [`Subscription::unsubscribe`] is called.
    fn subscribe(&mut self, collection: &str, callback: SnapshotCallback) -> Subscription;
}

struct Listener {
    id: u64,
    collection: String,
    callback: SnapshotCallback,
}

/// Registered snapshot callbacks, shared with the [`Subscription`] handles.
#[derive(Default)]
pub struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Listener>>,
}

impl Listeners {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add(self: &Rc<Self>, collection: &str, callback: SnapshotCallback) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.entries.borrow_mut().push(Listener {
            id,
            collection: collection.to_string(),
            callback,
        });
        Subscription {
            id,
            listeners: Rc::downgrade(self),
        }
    }

    pub fn has_listeners(&self, collection: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|l| l.collection == collection)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener of `collection`. Callbacks are collected first so a
    /// callback may unsubscribe without re-entering the borrow.
    pub fn notify(&self, collection: &str, snapshot: &[Document]) {
        let callbacks: Vec<SnapshotCallback> = self
            .entries
            .borrow()
            .iter()
            .filter(|l| l.collection == collection)
            .map(|l| Rc::clone(&l.callback))
            .collect();
        for callback in callbacks {
            callback(snapshot);
        }
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|l| l.id != id);
    }
}

/// Handle returned by [`DocumentStore::subscribe`].
#[must_use = "keep the subscription to unsubscribe later"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    /// Stop delivery. A no-op if the store is already gone.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
