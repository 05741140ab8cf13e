//! # Page Document Writes
//!
//! Every change to a `pageContent` document goes through this module. A write
//! touches exactly one thing (one section, or the page's SEO fields) and
//! follows the same cycle:
//!
//! 1. Re-read the latest document for the page.
//! 2. Merge the change into the raw stored fields.
//! 3. Update the document, or add it when the page has none yet.
//!
//! Sections other than the edited one are carried as raw JSON values taken
//! from the fresh read, so they are written back exactly as they were stored,
//! including fields this crate does not know about.
//!
//! There is no version check. Two writers interleaving between step 1 and
//! step 3 resolve as last-writer-wins for the whole document.
//!
//! ## Images
//!
//! For a section save with [`ImageChange::Replace`] the order is:
//! upload the new file, re-read, delete the old media object (best-effort),
//! write the document. A failed write leaves the stored document untouched;
//! the fresh upload is then deleted again, best-effort.

use crate::content::{codec, SectionContent};
use crate::error::{Result, SiteError};
use crate::media::{delete_quietly, MediaFile, MediaStore, UploadedMedia};
use crate::model::{
    timestamp_value, Document, Fields, PageContent, PageMeta, Section, PAGE_CONTENT_COLLECTION,
};
use crate::registry::{require_section, PageKey};
use crate::store::DocumentStore;
use chrono::Utc;
use serde_json::{Map, Value};

/// What a section save does to the section's image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(MediaFile),
    Remove,
}

/// The complete new state of one section, minus its title which always comes
/// from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionWrite {
    pub content: SectionContent,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub image: ImageChange,
}

impl SectionWrite {
    pub fn new(content: SectionContent) -> Self {
        Self {
            content,
            button_text: None,
            button_url: None,
            image: ImageChange::Keep,
        }
    }
}

/// Media folder for images of a page's sections.
pub fn media_folder(page: PageKey) -> String {
    format!("pages/{}", page.as_str())
}

/// Latest stored document for a page.
///
/// Pages should have one document each. When several exist, the one with the
/// newest `lastUpdated` wins.
pub fn load_page_document<S: DocumentStore + ?Sized>(
    store: &S,
    page: PageKey,
) -> Result<Option<Document>> {
    let mut matching: Vec<Document> = store
        .get_collection(PAGE_CONTENT_COLLECTION)?
        .into_iter()
        .filter(|d| d.get_str("pageId") == Some(page.as_str()))
        .collect();

    if matching.len() > 1 {
        tracing::warn!(
            page = %page,
            documents = matching.len(),
            "several content documents for one page, using the latest"
        );
    }
    // Stable: among equal timestamps the first stored document wins
    matching.sort_by_key(|d| std::cmp::Reverse(d.get_timestamp("lastUpdated")));
    Ok(matching.into_iter().next())
}

pub fn load_page<S: DocumentStore + ?Sized>(store: &S, page: PageKey) -> Result<Option<PageContent>> {
    Ok(load_page_document(store, page)?.map(|doc| PageContent::from_document(&doc)))
}

/// Saves one section of a page and returns the freshly stored page.
pub fn write_section<S, M>(
    store: &mut S,
    media: &M,
    page: PageKey,
    section_id: &str,
    write: &SectionWrite,
) -> Result<PageContent>
where
    S: DocumentStore + ?Sized,
    M: MediaStore + ?Sized,
{
    let spec = require_section(page, section_id)?;
    let content = codec::encode(page, section_id, &write.content);

    let uploaded = match &write.image {
        ImageChange::Replace(file) => Some(media.upload_file(&media_folder(page), file)?),
        _ => None,
    };

    let result = save_section(
        store,
        media,
        page,
        section_id,
        Section {
            title: spec.title.to_string(),
            content,
            image: None,
            image_public_id: None,
            button_text: write.button_text.clone(),
            button_url: write.button_url.clone(),
        },
        &write.image,
        uploaded.as_ref(),
    );

    if result.is_err() {
        if let Some(new) = &uploaded {
            delete_quietly(media, &new.public_id);
        }
    }
    result
}

/// Steps after the upload: re-read, settle the image, merge, write.
fn save_section<S, M>(
    store: &mut S,
    media: &M,
    page: PageKey,
    section_id: &str,
    mut section: Section,
    change: &ImageChange,
    uploaded: Option<&UploadedMedia>,
) -> Result<PageContent>
where
    S: DocumentStore + ?Sized,
    M: MediaStore + ?Sized,
{
    let latest = load_page_document(&*store, page)?;

    let mut raw_sections: Map<String, Value> = latest
        .as_ref()
        .and_then(|doc| doc.fields.get("sections"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    // Read straight from the raw entry so a section that no longer parses
    // still keeps its image references
    let previous = raw_sections.get(section_id);
    let previous_str = |key: &str| {
        previous
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let previous_public_id = previous_str("imagePublicId");

    match (change, uploaded) {
        (ImageChange::Keep, _) => {
            section.image = previous_str("image");
            section.image_public_id = previous_public_id.clone();
        }
        (ImageChange::Replace(_), Some(new)) => {
            section.image = Some(new.download_url.clone());
            section.image_public_id = Some(new.public_id.clone());
        }
        _ => {}
    }
    if !matches!(change, ImageChange::Keep) {
        if let Some(old) = previous_public_id.as_deref() {
            delete_quietly(media, old);
        }
    }

    raw_sections.insert(section_id.to_string(), section.to_value());

    let mut fields = Fields::new();
    fields.insert("sections".into(), Value::Object(raw_sections));
    let id = write_page_fields(store, page, latest.as_ref(), fields)?;
    tracing::info!(page = %page, section = section_id, "section saved");

    reload(&*store, &id)
}

/// Sets the page's SEO fields. `None` leaves a field as stored.
pub fn write_page_meta<S: DocumentStore + ?Sized>(
    store: &mut S,
    page: PageKey,
    meta: &PageMeta,
) -> Result<PageContent> {
    if meta.is_empty() {
        return Err(SiteError::Validation(
            "Nothing to update: give a title, description or keywords".to_string(),
        ));
    }
    let latest = load_page_document(&*store, page)?;

    let mut fields = Fields::new();
    for (key, value) in [
        ("metaTitle", &meta.title),
        ("metaDescription", &meta.description),
        ("metaKeywords", &meta.keywords),
    ] {
        if let Some(value) = value {
            fields.insert(key.to_string(), Value::String(value.trim().to_string()));
        }
    }

    let id = write_page_fields(store, page, latest.as_ref(), fields)?;
    tracing::info!(page = %page, "page meta saved");
    reload(&*store, &id)
}

/// Updates the existing document or creates the page's first one.
fn write_page_fields<S: DocumentStore + ?Sized>(
    store: &mut S,
    page: PageKey,
    existing: Option<&Document>,
    mut fields: Fields,
) -> Result<String> {
    fields.insert("pageId".into(), Value::String(page.as_str().to_string()));
    fields.insert("lastUpdated".into(), timestamp_value(Utc::now()));

    match existing {
        Some(doc) => {
            store.update_document(PAGE_CONTENT_COLLECTION, &doc.id, fields)?;
            Ok(doc.id.clone())
        }
        None => store.add_document(PAGE_CONTENT_COLLECTION, fields),
    }
}

fn reload<S: DocumentStore + ?Sized>(store: &S, id: &str) -> Result<PageContent> {
    store
        .get_document(PAGE_CONTENT_COLLECTION, id)?
        .map(|doc| PageContent::from_document(&doc))
        .ok_or_else(|| SiteError::not_found(PAGE_CONTENT_COLLECTION, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FaqEntry;
    use crate::media::memory::{InMemoryMedia, MediaCall};
    use crate::store::memory::fixtures::{text_section, StoreFixture};
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    fn faq_write() -> SectionWrite {
        SectionWrite::new(SectionContent::Faq(vec![FaqEntry::new("Q1", "A1")]))
    }

    #[test]
    fn first_save_creates_page_document() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();

        let page = write_section(&mut store, &media, PageKey::Pricing, "faq", &faq_write()).unwrap();

        assert_eq!(page.page_id, "pricing");
        let faq = page.section("faq").unwrap();
        assert_eq!(faq.title, "Sıkça Sorulan Sorular");
        assert_eq!(faq.content, r#"[{"question":"Q1","answer":"A1"}]"#);
        assert!(page.last_updated.is_some());
        assert_eq!(store.get_collection(PAGE_CONTENT_COLLECTION).unwrap().len(), 1);
    }

    #[test]
    fn second_save_updates_same_document() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let first = write_section(&mut store, &media, PageKey::Pricing, "faq", &faq_write()).unwrap();
        let second = write_section(
            &mut store,
            &media,
            PageKey::Pricing,
            "hero",
            &SectionWrite::new(SectionContent::PlainText("Ücretler".into())),
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.section("faq").is_some());
        assert!(second.section("hero").is_some());
    }

    #[test]
    fn other_sections_are_written_back_verbatim() {
        let mut store = InMemoryStore::new();
        let raw_mission = json!({
            "title": "Eski Başlık",
            "content": "<p>Misyon</p>",
            "legacyFlag": true,
            "image": "/m.jpg"
        });
        let mut fields = Fields::new();
        fields.insert("pageId".into(), json!("about"));
        fields.insert("sections".into(), json!({"mission": raw_mission.clone()}));
        store.add_document(PAGE_CONTENT_COLLECTION, fields).unwrap();

        write_section(
            &mut store,
            &InMemoryMedia::new(),
            PageKey::About,
            "hero",
            &SectionWrite::new(SectionContent::PlainText("Merhaba".into())),
        )
        .unwrap();

        let doc = load_page_document(&store, PageKey::About).unwrap().unwrap();
        assert_eq!(doc.fields["sections"]["mission"], raw_mission);
    }

    #[test]
    fn keep_preserves_image_of_unparseable_section() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        media.seed("p1");
        let mut fields = Fields::new();
        fields.insert("pageId".into(), json!("home"));
        fields.insert(
            "sections".into(),
            json!({"hero": {"title": null, "content": "x", "image": "/a.jpg", "imagePublicId": "p1"}}),
        );
        store.add_document(PAGE_CONTENT_COLLECTION, fields).unwrap();

        let page = write_section(
            &mut store,
            &media,
            PageKey::Home,
            "hero",
            &SectionWrite::new(SectionContent::PlainText("y".into())),
        )
        .unwrap();

        let hero = page.section("hero").unwrap();
        assert_eq!(hero.content, "y");
        assert_eq!(hero.image.as_deref(), Some("/a.jpg"));
        assert_eq!(hero.image_public_id.as_deref(), Some("p1"));
        assert_eq!(media.journal().deletes_of("p1"), 0);
        assert!(media.contains("p1"));
    }

    #[test]
    fn removing_image_of_unparseable_section_deletes_it() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        media.seed("p1");
        let mut fields = Fields::new();
        fields.insert("pageId".into(), json!("home"));
        fields.insert(
            "sections".into(),
            json!({"hero": {"title": 7, "content": "x", "image": "/a.jpg", "imagePublicId": "p1"}}),
        );
        store.add_document(PAGE_CONTENT_COLLECTION, fields).unwrap();

        let mut write = SectionWrite::new(SectionContent::PlainText("y".into()));
        write.image = ImageChange::Remove;
        let page = write_section(&mut store, &media, PageKey::Home, "hero", &write).unwrap();

        assert_eq!(page.section("hero").unwrap().image, None);
        assert_eq!(media.journal().deletes_of("p1"), 1);
    }

    #[test]
    fn unknown_section_is_rejected_before_any_call() {
        let mut store = InMemoryStore::new();
        let media = InMemoryMedia::new();
        let mut write = faq_write();
        write.image = ImageChange::Replace(MediaFile::new("a.png", vec![]));

        let result = write_section(&mut store, &media, PageKey::Home, "faq", &write);
        assert!(matches!(result, Err(SiteError::Api(_))));
        assert!(media.journal().calls().is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn replacing_image_uploads_then_deletes_old() {
        let mut store = StoreFixture::new()
            .with_page(
                PageKey::About,
                &[(
                    "hero",
                    Section {
                        image: Some("/old.jpg".into()),
                        image_public_id: Some("pages/about/old".into()),
                        ..text_section("Hero", "Merhaba")
                    },
                )],
            )
            .build();
        let media = InMemoryMedia::new();
        let journal = media.journal();

        let mut write = SectionWrite::new(SectionContent::PlainText("Merhaba".into()));
        write.image = ImageChange::Replace(MediaFile::new("new.jpg", vec![1]));
        let page = write_section(&mut store, &media, PageKey::About, "hero", &write).unwrap();

        let calls = journal.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], MediaCall::Upload { .. }));
        assert_eq!(
            calls[1],
            MediaCall::Delete {
                public_id: "pages/about/old".into()
            }
        );
        let hero = page.section("hero").unwrap();
        assert!(hero.image_public_id.as_deref().unwrap().starts_with("pages/about/"));
        assert_ne!(hero.image_public_id.as_deref(), Some("pages/about/old"));
    }

    #[test]
    fn keep_preserves_image_and_remove_clears_it() {
        let mut store = StoreFixture::new()
            .with_page(
                PageKey::Home,
                &[(
                    "hero",
                    Section {
                        image: Some("/hero.jpg".into()),
                        image_public_id: Some("hero1".into()),
                        ..text_section("Hero", "Eski")
                    },
                )],
            )
            .build();
        let media = InMemoryMedia::new();

        let kept = write_section(
            &mut store,
            &media,
            PageKey::Home,
            "hero",
            &SectionWrite::new(SectionContent::PlainText("Yeni".into())),
        )
        .unwrap();
        assert_eq!(kept.section("hero").unwrap().image.as_deref(), Some("/hero.jpg"));
        assert!(media.journal().calls().is_empty());

        let mut remove = SectionWrite::new(SectionContent::PlainText("Yeni".into()));
        remove.image = ImageChange::Remove;
        let removed = write_section(&mut store, &media, PageKey::Home, "hero", &remove).unwrap();
        assert!(removed.section("hero").unwrap().image.is_none());
        assert_eq!(media.journal().deletes_of("hero1"), 1);
    }

    #[test]
    fn failed_write_leaves_document_and_cleans_upload() {
        let mut store = StoreFixture::new()
            .with_page(PageKey::Home, &[("hero", text_section("Hero", "Eski"))])
            .build();
        let before = load_page_document(&store, PageKey::Home).unwrap().unwrap();
        store.backend().set_simulate_write_error(true);
        let media = InMemoryMedia::new();

        let mut write = SectionWrite::new(SectionContent::PlainText("Yeni".into()));
        write.image = ImageChange::Replace(MediaFile::new("a.png", vec![]));
        assert!(write_section(&mut store, &media, PageKey::Home, "hero", &write).is_err());

        store.backend().set_simulate_write_error(false);
        let after = load_page_document(&store, PageKey::Home).unwrap().unwrap();
        assert_eq!(before, after);
        let journal = media.journal();
        assert_eq!(journal.uploads(), 1);
        assert_eq!(journal.calls().len(), 2);
    }

    #[test]
    fn read_failure_propagates_on_write_path() {
        let mut store = InMemoryStore::new();
        store.backend().set_simulate_read_error(true);
        let result = write_section(&mut store, &InMemoryMedia::new(), PageKey::Pricing, "faq", &faq_write());
        assert!(result.is_err());
    }

    #[test]
    fn latest_duplicate_wins() {
        let mut store = InMemoryStore::new();
        for (content, at) in [("older", "2024-01-01T00:00:00Z"), ("newer", "2024-06-01T00:00:00Z")] {
            let mut fields = Fields::new();
            fields.insert("pageId".into(), json!("home"));
            fields.insert("lastUpdated".into(), json!(at));
            fields.insert("sections".into(), json!({"hero": {"content": content}}));
            store.add_document(PAGE_CONTENT_COLLECTION, fields).unwrap();
        }
        let page = load_page(&store, PageKey::Home).unwrap().unwrap();
        assert_eq!(page.section("hero").unwrap().content, "newer");
    }

    #[test]
    fn meta_is_merged_field_by_field() {
        let mut store = InMemoryStore::new();
        write_page_meta(
            &mut store,
            PageKey::About,
            &PageMeta {
                title: Some("Hakkımızda | Okul".into()),
                description: Some("Okulumuz".into()),
                keywords: None,
            },
        )
        .unwrap();
        let page = write_page_meta(
            &mut store,
            PageKey::About,
            &PageMeta {
                keywords: Some("okul, anaokulu".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(page.meta.title.as_deref(), Some("Hakkımızda | Okul"));
        assert_eq!(page.meta.keywords.as_deref(), Some("okul, anaokulu"));
        assert!(write_page_meta(&mut store, PageKey::About, &PageMeta::default()).is_err());
    }
}
