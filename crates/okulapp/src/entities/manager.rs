use super::{
    in_category, EntityKind, EntitySchema, MessageStatus, IMAGE, IMAGE_PUBLIC_ID, STATUS,
};
use crate::error::{Result, SiteError};
use crate::media::{delete_quietly, MediaFile, MediaStore, UploadedMedia};
use crate::model::{Document, Fields};
use crate::store::{DocumentStore, Subscription};
use serde_json::Value;
use std::rc::Rc;

/// CRUD for one entity kind, driven entirely by its [`EntitySchema`].
///
/// Read paths degrade: [`EntityManager::list`] logs a store failure and
/// returns an empty list. Write paths propagate every store and upload error;
/// only old-image cleanup is best-effort.
#[derive(Debug, Clone, Copy)]
pub struct EntityManager {
    schema: &'static EntitySchema,
}

impl EntityManager {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            schema: kind.schema(),
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    fn collection(&self) -> &'static str {
        self.schema.collection
    }

    /// All documents, sorted by the kind's policy.
    pub fn try_list<S: DocumentStore + ?Sized>(&self, store: &S) -> Result<Vec<Document>> {
        let mut docs = store.get_collection(self.collection())?;
        self.schema.sort.sort(&mut docs);
        Ok(docs)
    }

    /// Like [`Self::try_list`], but a failed read yields an empty list.
    pub fn list<S: DocumentStore + ?Sized>(&self, store: &S) -> Vec<Document> {
        self.try_list(store).unwrap_or_else(|e| {
            tracing::warn!(collection = self.collection(), "could not load list: {}", e);
            Vec::new()
        })
    }

    /// Items whose `category` matches, case-insensitively.
    pub fn list_by_category<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        category: &str,
    ) -> Vec<Document> {
        self.list(store)
            .into_iter()
            .filter(|d| in_category(d, category))
            .collect()
    }

    pub fn get<S: DocumentStore + ?Sized>(&self, store: &S, id: &str) -> Result<Document> {
        store
            .get_document(self.collection(), id)?
            .ok_or_else(|| SiteError::not_found(self.collection(), id))
    }

    /// Validates, uploads the optional image, then adds the document.
    pub fn create<S, M>(
        &self,
        store: &mut S,
        media: &M,
        mut fields: Fields,
        image: Option<&MediaFile>,
    ) -> Result<String>
    where
        S: DocumentStore + ?Sized,
        M: MediaStore + ?Sized,
    {
        self.check_known_fields(&fields)?;
        self.check_required(&fields)?;
        let folder = self.image_folder(image)?;

        if self.schema.has_status {
            fields.insert(
                STATUS.to_string(),
                Value::String(MessageStatus::New.as_str().to_string()),
            );
        }

        let uploaded = match (folder, image) {
            (Some(folder), Some(file)) => Some(media.upload_file(folder, file)?),
            _ => None,
        };
        if let Some(uploaded) = &uploaded {
            fields.extend(image_fields(uploaded));
        }

        match store.add_document(self.collection(), fields) {
            Ok(id) => {
                tracing::info!(collection = self.collection(), %id, "entity created");
                Ok(id)
            }
            Err(e) => {
                if let Some(uploaded) = &uploaded {
                    delete_quietly(media, &uploaded.public_id);
                }
                Err(e)
            }
        }
    }

    /// Applies a partial update. A new image replaces the old one, whose media
    /// object is deleted before the document is written. A failed write
    /// deletes the fresh upload again.
    pub fn update<S, M>(
        &self,
        store: &mut S,
        media: &M,
        id: &str,
        mut fields: Fields,
        image: Option<&MediaFile>,
    ) -> Result<()>
    where
        S: DocumentStore + ?Sized,
        M: MediaStore + ?Sized,
    {
        self.check_known_fields(&fields)?;
        let folder = self.image_folder(image)?;
        let existing = self.get(store, id)?;

        let mut merged = existing.fields.clone();
        merged.extend(fields.clone());
        self.check_required(&merged)?;

        let uploaded = match (folder, image) {
            (Some(folder), Some(file)) => Some(media.upload_file(folder, file)?),
            _ => None,
        };
        if let Some(uploaded) = &uploaded {
            if let Some(old) = existing.get_str(IMAGE_PUBLIC_ID) {
                delete_quietly(media, old);
            }
            fields.extend(image_fields(uploaded));
        }

        match store.update_document(self.collection(), id, fields) {
            Ok(()) => {
                tracing::info!(collection = self.collection(), id, "entity updated");
                Ok(())
            }
            Err(e) => {
                if let Some(uploaded) = &uploaded {
                    delete_quietly(media, &uploaded.public_id);
                }
                Err(e)
            }
        }
    }

    /// Deletes the image (best-effort) and then the document.
    pub fn delete<S, M>(&self, store: &mut S, media: &M, id: &str) -> Result<Document>
    where
        S: DocumentStore + ?Sized,
        M: MediaStore + ?Sized,
    {
        let existing = self.get(store, id)?;
        if let Some(public_id) = existing.get_str(IMAGE_PUBLIC_ID) {
            delete_quietly(media, public_id);
        }
        store.delete_document(self.collection(), id)?;
        tracing::info!(collection = self.collection(), id, "entity deleted");
        Ok(existing)
    }

    pub fn set_message_status<S: DocumentStore + ?Sized>(
        &self,
        store: &mut S,
        id: &str,
        status: MessageStatus,
    ) -> Result<()> {
        if !self.schema.has_status {
            return Err(SiteError::Validation(format!(
                "{} entries have no status",
                self.schema.label
            )));
        }
        let mut partial = Fields::new();
        partial.insert(STATUS.to_string(), Value::String(status.as_str().to_string()));
        store.update_document(self.collection(), id, partial)
    }

    /// Delivers the full sorted list after every change to the collection.
    pub fn watch<S, F>(&self, store: &mut S, callback: F) -> Subscription
    where
        S: DocumentStore + ?Sized,
        F: Fn(&[Document]) + 'static,
    {
        let sort = self.schema.sort;
        store.subscribe(
            self.collection(),
            Rc::new(move |docs: &[Document]| {
                let mut sorted = docs.to_vec();
                sort.sort(&mut sorted);
                callback(&sorted);
            }),
        )
    }

    fn check_known_fields(&self, fields: &Fields) -> Result<()> {
        match fields.keys().find(|k| self.schema.field(k).is_none()) {
            Some(unknown) => Err(SiteError::Validation(format!(
                "{} has no field \"{}\"",
                self.schema.label, unknown
            ))),
            None => Ok(()),
        }
    }

    fn check_required(&self, fields: &Fields) -> Result<()> {
        let missing: Vec<&str> = self
            .schema
            .fields
            .iter()
            .filter(|f| f.required && is_blank(fields.get(f.name)))
            .map(|f| f.name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SiteError::Validation(format!(
                "Required fields are empty: {}",
                missing.join(", ")
            )))
        }
    }

    fn image_folder(&self, image: Option<&MediaFile>) -> Result<Option<&'static str>> {
        match (image, self.schema.image_folder) {
            (Some(_), None) => Err(SiteError::Validation(format!(
                "{} entries cannot have an image",
                self.schema.label
            ))),
            (Some(_), folder) => Ok(folder),
            (None, _) => Ok(None),
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn image_fields(uploaded: &UploadedMedia) -> Fields {
    let mut fields = Fields::new();
    fields.insert(IMAGE.to_string(), Value::String(uploaded.download_url.clone()));
    fields.insert(
        IMAGE_PUBLIC_ID.to_string(),
        Value::String(uploaded.public_id.clone()),
    );
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::memory::{InMemoryMedia, MediaCall};
    use crate::store::memory::InMemoryStore;
    use serde_json::json;
    use std::cell::RefCell;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    fn teachers() -> EntityManager {
        EntityManager::new(EntityKind::Teacher)
    }

    #[test]
    fn create_requires_fields_before_any_call() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let photo = MediaFile::new("a.jpg", vec![1]);

        let err = teachers()
            .create(&mut store, &media, fields(json!({"name": "  "})), Some(&photo))
            .unwrap_err();
        match err {
            SiteError::Validation(msg) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("title"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(media.journal().calls().is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn create_rejects_unknown_fields() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let result = teachers().create(
            &mut store,
            &media,
            fields(json!({"name": "A", "title": "B", "salary": "1"})),
            None,
        );
        assert!(matches!(result, Err(SiteError::Validation(_))));
    }

    #[test]
    fn create_with_image_stores_both_references() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let id = teachers()
            .create(
                &mut store,
                &media,
                fields(json!({"name": "Ayşe Kaya", "title": "Sınıf Öğretmeni"})),
                Some(&MediaFile::new("ayse.jpg", vec![1])),
            )
            .unwrap();

        let doc = teachers().get(&store, &id).unwrap();
        let public_id = doc.get_str(IMAGE_PUBLIC_ID).unwrap();
        assert!(public_id.starts_with("teachers/"));
        assert_eq!(doc.get_str(IMAGE), Some(format!("memory://{}", public_id).as_str()));
        assert!(doc.get_str("createdAt").is_some());
    }

    #[test]
    fn image_on_imageless_kind_is_rejected() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let result = EntityManager::new(EntityKind::PricingTier).create(
            &mut store,
            &media,
            fields(json!({"name": "Tam Gün", "price": "10.000 TL"})),
            Some(&MediaFile::new("a.png", vec![])),
        );
        assert!(matches!(result, Err(SiteError::Validation(_))));
        assert_eq!(media.journal().uploads(), 0);
    }

    #[test]
    fn failed_add_cleans_up_fresh_upload() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        store.backend().set_simulate_write_error(true);

        let result = teachers().create(
            &mut store,
            &media,
            fields(json!({"name": "A", "title": "B"})),
            Some(&MediaFile::new("a.png", vec![])),
        );
        assert!(result.is_err());
        let journal = media.journal();
        assert_eq!(journal.uploads(), 1);
        assert_eq!(journal.calls().len(), 2);
    }

    #[test]
    fn failed_update_cleans_up_fresh_upload() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let id = store
            .add_document(
                "teachers",
                fields(json!({"name": "A", "title": "B", "image": "/old.jpg", "imagePublicId": "old"})),
            )
            .unwrap();
        media.seed("old");
        store.backend().set_simulate_write_error(true);

        let result = teachers().update(
            &mut store,
            &media,
            &id,
            Fields::new(),
            Some(&MediaFile::new("n.png", vec![3])),
        );
        assert!(result.is_err());

        let calls = media.journal().calls();
        let fresh = match &calls[0] {
            MediaCall::Upload { public_id, .. } => public_id.clone(),
            other => panic!("expected upload first, got {other:?}"),
        };
        assert_eq!(media.journal().deletes_of(&fresh), 1);
        assert!(!media.contains(&fresh));
        assert_eq!(
            teachers().get(&store, &id).unwrap().get_str(IMAGE_PUBLIC_ID),
            Some("old")
        );
    }

    #[test]
    fn update_replaces_image_and_deletes_old() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let id = store
            .add_document(
                "teachers",
                fields(json!({"name": "A", "title": "B", "image": "/old.jpg", "imagePublicId": "old"})),
            )
            .unwrap();
        media.seed("old");
        let journal = media.journal();

        teachers()
            .update(
                &mut store,
                &media,
                &id,
                fields(json!({"branch": "Matematik"})),
                Some(&MediaFile::new("new.png", vec![2])),
            )
            .unwrap();

        let calls = journal.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], MediaCall::Upload { .. }));
        assert_eq!(calls[1], MediaCall::Delete { public_id: "old".into() });
        assert!(!media.contains("old"));

        let doc = teachers().get(&store, &id).unwrap();
        assert_eq!(doc.get_str("branch"), Some("Matematik"));
        assert_eq!(doc.get_str("name"), Some("A"));
        assert_ne!(doc.get_str(IMAGE_PUBLIC_ID), Some("old"));
    }

    #[test]
    fn update_cannot_blank_required_field() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let id = store
            .add_document("teachers", fields(json!({"name": "A", "title": "B"})))
            .unwrap();
        let result = teachers().update(&mut store, &media, &id, fields(json!({"name": ""})), None);
        assert!(matches!(result, Err(SiteError::Validation(_))));
        assert_eq!(teachers().get(&store, &id).unwrap().get_str("name"), Some("A"));
    }

    #[test]
    fn update_missing_entity_is_not_found() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let result = teachers().update(&mut store, &media, "nope", Fields::new(), None);
        assert!(matches!(result, Err(SiteError::DocumentNotFound { .. })));
    }

    #[test]
    fn delete_survives_media_failure() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        media.set_simulate_delete_error(true);
        let id = store
            .add_document(
                "teachers",
                fields(json!({"name": "A", "title": "B", "imagePublicId": "teacher77"})),
            )
            .unwrap();

        teachers().delete(&mut store, &media, &id).unwrap();
        assert!(store.get_collection("teachers").unwrap().is_empty());
        assert_eq!(media.journal().deletes_of("teacher77"), 1);
    }

    #[test]
    fn list_degrades_to_empty_on_read_failure() {
        let store = InMemoryStore::new();
        store.backend().set_simulate_read_error(true);
        assert!(teachers().list(&store).is_empty());
        assert!(teachers().try_list(&store).is_err());
    }

    #[test]
    fn gallery_filters_by_category() {
        let mut store = InMemoryStore::new();
        for (title, category) in [("a", "Bahar"), ("b", "Kış"), ("c", "bahar ")] {
            store
                .add_document("gallery", fields(json!({"title": title, "category": category})))
                .unwrap();
        }
        let gallery = EntityManager::new(EntityKind::GalleryItem);
        let spring: Vec<_> = gallery
            .list_by_category(&store, "bahar")
            .into_iter()
            .map(|d| d.get_str("title").unwrap_or_default().to_string())
            .collect();
        assert_eq!(spring.len(), 2);
        assert!(spring.contains(&"a".to_string()));
        assert!(spring.contains(&"c".to_string()));
    }

    #[test]
    fn messages_start_new_and_take_any_status() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let messages = EntityManager::new(EntityKind::ContactMessage);
        let id = messages
            .create(
                &mut store,
                &media,
                fields(json!({"name": "Veli", "email": "v@example.com", "message": "Merhaba"})),
                None,
            )
            .unwrap();
        assert_eq!(messages.get(&store, &id).unwrap().get_str(STATUS), Some("new"));

        messages
            .set_message_status(&mut store, &id, MessageStatus::Archived)
            .unwrap();
        assert_eq!(
            messages.get(&store, &id).unwrap().get_str(STATUS),
            Some("archived")
        );
        messages
            .set_message_status(&mut store, &id, MessageStatus::Read)
            .unwrap();
        assert_eq!(messages.get(&store, &id).unwrap().get_str(STATUS), Some("read"));
    }

    #[test]
    fn other_kinds_reject_status() {
        let mut store = InMemoryStore::new();
        let id = store
            .add_document("teachers", fields(json!({"name": "A", "title": "B"})))
            .unwrap();
        let result = teachers().set_message_status(&mut store, &id, MessageStatus::Read);
        assert!(matches!(result, Err(SiteError::Validation(_))));
    }

    #[test]
    fn watch_delivers_sorted_snapshots() {
        let mut store = InMemoryStore::new();
        let seen: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let pricing = EntityManager::new(EntityKind::PricingTier);
        let subscription = pricing.watch(&mut store, move |docs| {
            sink.borrow_mut().push(
                docs.iter()
                    .map(|d| d.get_str("name").unwrap_or_default().to_string())
                    .collect(),
            );
        });

        for (name, order) in [("c", 3), ("a", 1)] {
            store
                .add_document("pricing", fields(json!({"name": name, "price": "1", "order": order})))
                .unwrap();
        }
        subscription.unsubscribe();
        store
            .add_document("pricing", fields(json!({"name": "b", "price": "1", "order": 2})))
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], vec!["a".to_string(), "c".to_string()]);
    }
}
