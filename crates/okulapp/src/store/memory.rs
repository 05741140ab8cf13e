use super::doc_store::DocStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = DocStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        DocStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::entities::EntityKind;
    use crate::model::{Fields, Section, PAGE_CONTENT_COLLECTION};
    use crate::registry::PageKey;
    use crate::store::DocumentStore;
    use serde_json::{json, Map, Value};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds a page document holding the given raw sections.
        pub fn with_page(mut self, page: PageKey, sections: &[(&str, Section)]) -> Self {
            let raw: Map<String, Value> = sections
                .iter()
                .map(|(id, section)| (id.to_string(), section.to_value()))
                .collect();
            let mut fields = Fields::new();
            fields.insert("pageId".into(), json!(page.as_str()));
            fields.insert("sections".into(), Value::Object(raw));
            self.store
                .add_document(PAGE_CONTENT_COLLECTION, fields)
                .unwrap();
            self
        }

        /// Adds one entity document with the given fields.
        pub fn with_entity(mut self, kind: EntityKind, fields: Value) -> Self {
            let fields = match fields {
                Value::Object(map) => map,
                _ => panic!("entity fields must be an object"),
            };
            self.store
                .add_document(kind.schema().collection, fields)
                .unwrap();
            self
        }

        pub fn build(self) -> InMemoryStore {
            self.store
        }
    }

    /// Section with only title and content set.
    pub fn text_section(title: &str, content: &str) -> Section {
        Section {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }
}
