//! # Domain Model: Documents, Pages and Sections
//!
//! The store is schemaless: every record is a [`Document`], an id plus a JSON
//! object of fields. Two kinds of documents live in it:
//!
//! - **Page content** (collection `pageContent`): one document per logical page,
//!   read into a [`PageContent`] that maps section ids to [`Section`] values.
//! - **Entities** (teachers, events, ...): fixed-field documents handled by
//!   [`crate::entities`], which never go through the section model.
//!
//! ## Stored Layout
//!
//! ```text
//! pageContent/{id}
//! ├── pageId: "about"
//! ├── sections
//! │   ├── hero:   { title, content, image?, imagePublicId?, buttonText?, buttonUrl? }
//! │   └── values: { title, content: "[{\"title\":...}]" }
//! ├── metaTitle?, metaDescription?, metaKeywords?
//! └── lastUpdated: "2024-05-01T09:30:00Z"
//! ```
//!
//! ## Reading Is Tolerant
//!
//! [`PageContent::from_document`] never fails. Missing fields read as empty,
//! and a section entry that is not an object is skipped (and logged) rather
//! than poisoning the rest of the page. Writers never go through this typed
//! view for sections they did not edit; see [`crate::sections`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Collection holding one [`PageContent`] document per logical page.
pub const PAGE_CONTENT_COLLECTION: &str = "pageContent";

/// Field stamped by the store when a document is added.
pub const CREATED_AT: &str = "createdAt";
/// Field stamped by the store on every add and update.
pub const UPDATED_AT: &str = "updatedAt";

pub type Fields = Map<String, Value>;

/// A schemaless document: store-assigned id plus arbitrary fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Integer field, accepting numeric strings as written by older forms.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.fields.get(key).and_then(parse_timestamp)
    }
}

/// Timestamps are stored as RFC 3339 strings.
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339())
}

/// Parses an RFC 3339 timestamp, or a plain `YYYY-MM-DD` date at midnight UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One independently editable block of a page.
///
/// `content` is interpreted per (page, section id) by [`crate::content::codec`].
/// `image_public_id` only exists so the media object can be deleted later and is
/// never shown to visitors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_url: Option<String>,
}

impl Section {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Page-level SEO metadata, independent of any section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl PageMeta {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.keywords.is_none()
    }
}

/// Typed read view of a `pageContent` document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub id: String,
    pub page_id: String,
    pub sections: BTreeMap<String, Section>,
    pub meta: PageMeta,
    pub last_updated: Option<DateTime<Utc>>,
}

impl PageContent {
    pub fn from_document(doc: &Document) -> Self {
        let mut sections = BTreeMap::new();
        if let Some(Value::Object(raw)) = doc.fields.get("sections") {
            for (section_id, value) in raw {
                match serde_json::from_value::<Section>(value.clone()) {
                    Ok(section) => {
                        sections.insert(section_id.clone(), section);
                    }
                    Err(e) => tracing::debug!(
                        page = doc.get_str("pageId").unwrap_or_default(),
                        section = %section_id,
                        "skipping malformed section: {}",
                        e
                    ),
                }
            }
        }

        let text = |key: &str| doc.get_str(key).map(str::to_string);

        Self {
            id: doc.id.clone(),
            page_id: text("pageId").unwrap_or_default(),
            sections,
            meta: PageMeta {
                title: text("metaTitle"),
                description: text("metaDescription"),
                keywords: text("metaKeywords"),
            },
            last_updated: doc.get_timestamp("lastUpdated"),
        }
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.get(section_id)
    }
}
