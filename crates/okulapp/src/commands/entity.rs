use crate::commands::{CmdMessage, CmdResult};
use crate::entities::{in_category, EntityKind, EntityManager, MessageStatus};
use crate::error::Result;
use crate::media::{MediaFile, MediaStore};
use crate::model::{Document, Fields};
use crate::store::DocumentStore;

pub fn list<S: DocumentStore + ?Sized>(
    store: &S,
    kind: EntityKind,
    category: Option<&str>,
) -> Result<CmdResult> {
    let manager = EntityManager::new(kind);
    let docs = match category {
        Some(category) => manager
            .try_list(store)?
            .into_iter()
            .filter(|d| in_category(d, category))
            .collect(),
        None => manager.try_list(store)?,
    };

    let mut result = CmdResult::default();
    if category.is_some() && manager.schema().field("category").is_none() {
        result.add_message(CmdMessage::warning(format!(
            "{} entries have no category; nothing can match",
            manager.schema().label
        )));
    }
    if docs.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No {} entries",
            manager.schema().label
        )));
    }
    Ok(result.with_listed(docs))
}

pub fn create<S, M>(
    store: &mut S,
    media: &M,
    kind: EntityKind,
    fields: Fields,
    image: Option<&MediaFile>,
) -> Result<CmdResult>
where
    S: DocumentStore + ?Sized,
    M: MediaStore + ?Sized,
{
    let manager = EntityManager::new(kind);
    let id = manager.create(store, media, fields, image)?;
    let doc = manager.get(store, &id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} created: {}",
        manager.schema().label,
        id
    )));
    Ok(result.with_affected(vec![doc]))
}

pub fn update<S, M>(
    store: &mut S,
    media: &M,
    kind: EntityKind,
    id: &str,
    fields: Fields,
    image: Option<&MediaFile>,
) -> Result<CmdResult>
where
    S: DocumentStore + ?Sized,
    M: MediaStore + ?Sized,
{
    let manager = EntityManager::new(kind);
    manager.update(store, media, id, fields, image)?;
    let doc = manager.get(store, id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} updated: {}",
        manager.schema().label,
        id
    )));
    Ok(result.with_affected(vec![doc]))
}

pub fn delete<S, M>(store: &mut S, media: &M, kind: EntityKind, id: &str) -> Result<CmdResult>
where
    S: DocumentStore + ?Sized,
    M: MediaStore + ?Sized,
{
    let manager = EntityManager::new(kind);
    let removed: Document = manager.delete(store, media, id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} deleted: {}",
        manager.schema().label,
        id
    )));
    Ok(result.with_affected(vec![removed]))
}

pub fn set_status<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: &str,
    status: MessageStatus,
) -> Result<CmdResult> {
    let manager = EntityManager::new(EntityKind::ContactMessage);
    manager.set_message_status(store, id, status)?;
    let doc = manager.get(store, id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Message {} marked {}", id, status)));
    Ok(result.with_affected(vec![doc]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::SiteError;
    use crate::media::memory::InMemoryMedia;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn list_is_sorted_by_order() {
        let store = StoreFixture::new()
            .with_entity(EntityKind::PricingTier, json!({"name": "Üç", "price": "3", "order": 3}))
            .with_entity(EntityKind::PricingTier, json!({"name": "Bir", "price": "1", "order": 1}))
            .with_entity(EntityKind::PricingTier, json!({"name": "İki", "price": "2", "order": 2}))
            .build();
        let result = list(&store, EntityKind::PricingTier, None).unwrap();
        let orders: Vec<_> = result.listed.iter().filter_map(|d| d.get_i64("order")).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn list_filters_by_category() {
        let store = StoreFixture::new()
            .with_entity(EntityKind::GalleryItem, json!({"title": "a", "category": "Bahar"}))
            .with_entity(EntityKind::GalleryItem, json!({"title": "b", "category": "Kış"}))
            .build();
        let result = list(&store, EntityKind::GalleryItem, Some("bahar")).unwrap();
        assert_eq!(result.listed.len(), 1);
        assert_eq!(result.listed[0].get_str("title"), Some("a"));
    }

    #[test]
    fn category_on_kind_without_categories_warns() {
        let store = StoreFixture::new()
            .with_entity(EntityKind::Teacher, json!({"name": "Ayşe", "title": "Öğretmen"}))
            .build();
        let result = list(&store, EntityKind::Teacher, Some("bahar")).unwrap();
        assert!(result.listed.is_empty());
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));

        let gallery = list(&InMemoryStore::new(), EntityKind::GalleryItem, Some("bahar")).unwrap();
        assert!(gallery
            .messages
            .iter()
            .all(|m| matches!(m.level, MessageLevel::Info)));
    }

    #[test]
    fn empty_list_has_a_note() {
        let store = InMemoryStore::new();
        let result = list(&store, EntityKind::Event, None).unwrap();
        assert!(result.listed.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn list_propagates_read_errors() {
        let store = InMemoryStore::new();
        store.backend().set_simulate_read_error(true);
        assert!(list(&store, EntityKind::Event, None).is_err());
    }

    #[test]
    fn create_update_delete_cycle() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();

        let created = create(
            &mut store,
            &media,
            EntityKind::Event,
            fields(json!({"title": "Bahar Şenliği", "date": "2024-05-10"})),
            None,
        )
        .unwrap();
        let id = created.affected[0].id.clone();

        let updated = update(
            &mut store,
            &media,
            EntityKind::Event,
            &id,
            fields(json!({"location": "Bahçe"})),
            None,
        )
        .unwrap();
        assert_eq!(updated.affected[0].get_str("location"), Some("Bahçe"));
        assert_eq!(updated.affected[0].get_str("title"), Some("Bahar Şenliği"));

        delete(&mut store, &media, EntityKind::Event, &id).unwrap();
        assert!(store.get_collection("events").unwrap().is_empty());
        assert!(matches!(
            delete(&mut store, &media, EntityKind::Event, &id),
            Err(SiteError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn status_applies_to_messages() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let created = create(
            &mut store,
            &media,
            EntityKind::ContactMessage,
            fields(json!({"name": "Veli", "email": "v@example.com", "message": "Merhaba"})),
            None,
        )
        .unwrap();
        let id = created.affected[0].id.clone();

        let result = set_status(&mut store, &id, MessageStatus::Replied).unwrap();
        assert_eq!(result.affected[0].get_str("status"), Some("replied"));
    }
}
