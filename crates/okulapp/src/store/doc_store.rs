use super::backend::{Collection, StorageBackend};
use super::{DocumentStore, Listeners, SnapshotCallback, Subscription};
use crate::error::{Result, SiteError};
use crate::model::{timestamp_value, Document, Fields, CREATED_AT, UPDATED_AT};
use chrono::Utc;
use std::rc::Rc;
use uuid::Uuid;

pub struct DocStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    listeners: Rc<Listeners>,
}

impl<B: StorageBackend> DocStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            listeners: Listeners::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of active subscriptions across all collections.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn save(&self, collection: &str, docs: &Collection) -> Result<()> {
        self.backend.save_collection(collection, docs)?;
        tracing::debug!(collection, documents = docs.len(), "collection saved");
        self.notify(collection, docs);
        Ok(())
    }

    fn notify(&self, collection: &str, docs: &Collection) {
        if !self.listeners.has_listeners(collection) {
            return;
        }
        let snapshot = to_documents(docs);
        self.listeners.notify(collection, &snapshot);
    }
}

fn to_documents(docs: &Collection) -> Vec<Document> {
    docs.iter()
        .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
        .collect()
}

impl<B: StorageBackend> DocumentStore for DocStore<B> {
    fn get_collection(&self, collection: &str) -> Result<Vec<Document>> {
        let docs = self.backend.load_collection(collection)?;
        Ok(to_documents(&docs))
    }

    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let docs = self.backend.load_collection(collection)?;
        Ok(docs
            .get(id)
            .map(|fields| Document::new(id.to_string(), fields.clone())))
    }

    fn add_document(&mut self, collection: &str, mut fields: Fields) -> Result<String> {
        let mut docs = self.backend.load_collection(collection)?;
        let id = Uuid::new_v4().to_string();
        let now = timestamp_value(Utc::now());

        // The id lives outside the fields
        fields.remove("id");
        fields.insert(CREATED_AT.to_string(), now.clone());
        fields.insert(UPDATED_AT.to_string(), now);
        docs.insert(id.clone(), fields);

        self.save(collection, &docs)?;
        Ok(id)
    }

    fn update_document(&mut self, collection: &str, id: &str, partial: Fields) -> Result<()> {
        let mut docs = self.backend.load_collection(collection)?;
        let fields = docs
            .get_mut(id)
            .ok_or_else(|| SiteError::not_found(collection, id))?;

        for (key, value) in partial {
            if key == "id" {
                continue;
            }
            fields.insert(key, value);
        }
        fields.insert(UPDATED_AT.to_string(), timestamp_value(Utc::now()));

        self.save(collection, &docs)
    }

    fn delete_document(&mut self, collection: &str, id: &str) -> Result<()> {
        let mut docs = self.backend.load_collection(collection)?;
        if docs.remove(id).is_none() {
            return Err(SiteError::not_found(collection, id));
        }
        self.save(collection, &docs)
    }

    fn subscribe(&mut self, collection: &str, callback: SnapshotCallback) -> Subscription {
        self.listeners.add(collection, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    fn make_store() -> DocStore<MemBackend> {
        DocStore::with_backend(MemBackend::new())
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    // --- Basic CRUD Tests ---

    #[test]
    fn add_assigns_id_and_timestamps() {
        let mut store = make_store();
        let id = store
            .add_document("teachers", fields(json!({"name": "Ayşe"})))
            .unwrap();

        let doc = store.get_document("teachers", &id).unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.get_str("name"), Some("Ayşe"));
        assert!(doc.get_timestamp(CREATED_AT).is_some());
        assert!(doc.get_timestamp(UPDATED_AT).is_some());
    }

    #[test]
    fn add_ignores_caller_supplied_id() {
        let mut store = make_store();
        let id = store
            .add_document("teachers", fields(json!({"id": "mine", "name": "A"})))
            .unwrap();
        assert_ne!(id, "mine");
        let doc = store.get_document("teachers", &id).unwrap().unwrap();
        assert!(!doc.fields.contains_key("id"));
    }

    #[test]
    fn update_is_a_shallow_merge() {
        let mut store = make_store();
        let id = store
            .add_document(
                "events",
                fields(json!({"title": "Piknik", "location": "Park", "meta": {"a": 1, "b": 2}})),
            )
            .unwrap();

        store
            .update_document("events", &id, fields(json!({"title": "Bahar Pikniği", "meta": {"a": 3}})))
            .unwrap();

        let doc = store.get_document("events", &id).unwrap().unwrap();
        assert_eq!(doc.get_str("title"), Some("Bahar Pikniği"));
        assert_eq!(doc.get_str("location"), Some("Park"));
        assert_eq!(doc.fields["meta"], json!({"a": 3}));
    }

    #[test]
    fn update_missing_document_fails() {
        let mut store = make_store();
        let result = store.update_document("events", "nope", Fields::new());
        assert!(matches!(result, Err(SiteError::DocumentNotFound { .. })));
    }

    #[test]
    fn delete_removes_document() {
        let mut store = make_store();
        let id = store.add_document("events", Fields::new()).unwrap();
        store.delete_document("events", &id).unwrap();
        assert!(store.get_document("events", &id).unwrap().is_none());
        assert!(store.delete_document("events", &id).is_err());
    }

    #[test]
    fn collections_are_isolated() {
        let mut store = make_store();
        store.add_document("teachers", Fields::new()).unwrap();
        store.add_document("events", Fields::new()).unwrap();
        store.add_document("events", Fields::new()).unwrap();

        assert_eq!(store.get_collection("teachers").unwrap().len(), 1);
        assert_eq!(store.get_collection("events").unwrap().len(), 2);
        assert!(store.get_collection("gallery").unwrap().is_empty());
    }

    // --- Error Handling Tests ---

    #[test]
    fn write_error_propagates_and_leaves_data_unchanged() {
        let mut store = make_store();
        let id = store
            .add_document("teachers", fields(json!({"name": "A"})))
            .unwrap();

        store.backend.set_simulate_write_error(true);
        let result = store.update_document("teachers", &id, fields(json!({"name": "B"})));
        assert!(result.is_err());

        store.backend.set_simulate_write_error(false);
        let doc = store.get_document("teachers", &id).unwrap().unwrap();
        assert_eq!(doc.get_str("name"), Some("A"));
    }

    #[test]
    fn read_error_propagates() {
        let store = make_store();
        store.backend.set_simulate_read_error(true);
        assert!(store.get_collection("teachers").is_err());
    }

    // --- Subscription Tests ---

    #[test]
    fn subscribers_receive_full_snapshots() {
        let mut store = make_store();
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(
            "announcements",
            Rc::new(move |docs: &[Document]| sink.borrow_mut().push(docs.len())),
        );

        store.add_document("announcements", Fields::new()).unwrap();
        store.add_document("announcements", Fields::new()).unwrap();
        store.add_document("teachers", Fields::new()).unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2]);

        sub.unsubscribe();
        store.add_document("announcements", Fields::new()).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn failed_write_does_not_notify() {
        let mut store = make_store();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let _sub = store.subscribe(
            "teachers",
            Rc::new(move |_: &[Document]| *sink.borrow_mut() += 1),
        );

        store.backend.set_simulate_write_error(true);
        assert!(store.add_document("teachers", Fields::new()).is_err());
        assert_eq!(*calls.borrow(), 0);
    }
}
