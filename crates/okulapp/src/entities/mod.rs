//! # Entity Collections
//!
//! Teachers, events, gallery items and the other lists shown on the site are
//! plain fixed-field documents, one collection per kind. They never go through
//! the section/codec model.
//!
//! Every kind is described by a static [`EntitySchema`]: which collection it
//! lives in, which fields the admin form has, how lists are sorted, whether it
//! carries an image and whether it has a moderation status. A single
//! [`EntityManager`] implements list/create/update/delete for all of them.
//!
//! | Kind | Collection | Sort | Image | Status |
//! |------|------------|------|-------|--------|
//! | `teacher` | `teachers` | `order` | yes | - |
//! | `event` | `events` | `date`, newest first | yes | - |
//! | `gallery` | `gallery` | `order` | yes | - |
//! | `announcement` | `announcements` | `createdAt`, newest first | yes | - |
//! | `achievement` | `achievements` | `order` | - | - |
//! | `pricing` | `pricing` | `order` | - | - |
//! | `menu` | `menuItems` | `order` | - | - |
//! | `slider` | `sliders` | `order` | yes | - |
//! | `message` | `contactMessages` | `createdAt`, newest first | - | yes |

use crate::error::{Result, SiteError};
use crate::model::{parse_timestamp, Document, CREATED_AT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::{Ordering, Reverse};
use std::str::FromStr;

mod manager;

pub use manager::EntityManager;

/// Field holding the public image URL of an entity.
pub const IMAGE: &str = "image";
/// Field holding the media id needed to delete the image.
pub const IMAGE_PUBLIC_ID: &str = "imagePublicId";
/// Moderation status of contact messages.
pub const STATUS: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Teacher,
    Event,
    GalleryItem,
    Announcement,
    Achievement,
    PricingTier,
    MenuItem,
    Slider,
    ContactMessage,
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Teacher,
            EntityKind::Event,
            EntityKind::GalleryItem,
            EntityKind::Announcement,
            EntityKind::Achievement,
            EntityKind::PricingTier,
            EntityKind::MenuItem,
            EntityKind::Slider,
            EntityKind::ContactMessage,
        ]
    }

    /// Short name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Teacher => "teacher",
            EntityKind::Event => "event",
            EntityKind::GalleryItem => "gallery",
            EntityKind::Announcement => "announcement",
            EntityKind::Achievement => "achievement",
            EntityKind::PricingTier => "pricing",
            EntityKind::MenuItem => "menu",
            EntityKind::Slider => "slider",
            EntityKind::ContactMessage => "message",
        }
    }

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Teacher => &TEACHER,
            EntityKind::Event => &EVENT,
            EntityKind::GalleryItem => &GALLERY_ITEM,
            EntityKind::Announcement => &ANNOUNCEMENT,
            EntityKind::Achievement => &ACHIEVEMENT,
            EntityKind::PricingTier => &PRICING_TIER,
            EntityKind::MenuItem => &MENU_ITEM,
            EntityKind::Slider => &SLIDER,
            EntityKind::ContactMessage => &CONTACT_MESSAGE,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        EntityKind::all()
            .iter()
            .copied()
            .find(|k| {
                k.as_str() == key
                    || k.schema().collection.eq_ignore_ascii_case(&key)
                    || format!("{}s", k.as_str()) == key
            })
            .ok_or_else(|| SiteError::Api(format!("Unknown entity kind \"{}\"", s)))
    }
}

/// How a form value is typed before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Date,
    Bool,
    Url,
}

impl FieldKind {
    /// Converts a raw form string into the stored JSON value.
    pub fn parse(self, field: &str, raw: &str) -> Result<Value> {
        let trimmed = raw.trim();
        match self {
            FieldKind::Text | FieldKind::Url => Ok(Value::String(trimmed.to_string())),
            FieldKind::LongText => Ok(Value::String(raw.to_string())),
            FieldKind::Number => {
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                trimmed
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| invalid(field, "a whole number", raw))
            }
            FieldKind::Date => {
                if trimmed.is_empty() {
                    return Ok(Value::String(String::new()));
                }
                parse_timestamp(&Value::String(trimmed.to_string()))
                    .map(|_| Value::String(trimmed.to_string()))
                    .ok_or_else(|| invalid(field, "a date (YYYY-MM-DD)", raw))
            }
            FieldKind::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "1" | "evet" => Ok(Value::Bool(true)),
                "false" | "no" | "0" | "hayır" | "" => Ok(Value::Bool(false)),
                _ => Err(invalid(field, "true or false", raw)),
            },
        }
    }
}

fn invalid(field: &str, expected: &str, raw: &str) -> SiteError {
    SiteError::Validation(format!(
        "Field \"{}\" must be {}, got \"{}\"",
        field, expected, raw
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Ascending by the integer `order` field; missing values last.
    Order,
    /// Descending by a timestamp field; missing values last.
    NewestFirst(&'static str),
}

impl SortPolicy {
    /// Stable sort in place.
    pub fn sort(self, docs: &mut [Document]) {
        match self {
            SortPolicy::Order => {
                docs.sort_by(|a, b| missing_last(a.get_i64("order"), b.get_i64("order")))
            }
            SortPolicy::NewestFirst(key) => docs.sort_by(|a, b| {
                missing_last(
                    a.get_timestamp(key).map(Reverse),
                    b.get_timestamp(key).map(Reverse),
                )
            }),
        }
    }
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive match on the `category` field.
pub fn in_category(doc: &Document, category: &str) -> bool {
    let wanted = category.trim().to_lowercase();
    doc.get_str("category")
        .is_some_and(|c| c.trim().to_lowercase() == wanted)
}

/// Static description of one entity kind.
#[derive(Debug, Serialize)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub collection: &'static str,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub sort: SortPolicy,
    /// Media folder for uploads; `None` when the kind has no image.
    pub image_folder: Option<&'static str>,
    pub has_status: bool,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_image(&self) -> bool {
        self.image_folder.is_some()
    }
}

use FieldKind::{Bool, Date, LongText, Number, Text, Url};

static TEACHER: EntitySchema = EntitySchema {
    kind: EntityKind::Teacher,
    collection: "teachers",
    label: "Öğretmen",
    fields: &[
        field("name", Text, true),
        field("title", Text, true),
        field("branch", Text, false),
        field("bio", LongText, false),
        field("email", Text, false),
        field("order", Number, false),
    ],
    sort: SortPolicy::Order,
    image_folder: Some("teachers"),
    has_status: false,
};

static EVENT: EntitySchema = EntitySchema {
    kind: EntityKind::Event,
    collection: "events",
    label: "Etkinlik",
    fields: &[
        field("title", Text, true),
        field("description", LongText, false),
        field("date", Date, true),
        field("time", Text, false),
        field("location", Text, false),
        field("category", Text, false),
    ],
    sort: SortPolicy::NewestFirst("date"),
    image_folder: Some("events"),
    has_status: false,
};

static GALLERY_ITEM: EntitySchema = EntitySchema {
    kind: EntityKind::GalleryItem,
    collection: "gallery",
    label: "Galeri Görseli",
    fields: &[
        field("title", Text, true),
        field("description", LongText, false),
        field("category", Text, false),
        field("order", Number, false),
    ],
    sort: SortPolicy::Order,
    image_folder: Some("gallery"),
    has_status: false,
};

static ANNOUNCEMENT: EntitySchema = EntitySchema {
    kind: EntityKind::Announcement,
    collection: "announcements",
    label: "Duyuru",
    fields: &[
        field("title", Text, true),
        field("content", LongText, true),
        field("date", Date, false),
        field("important", Bool, false),
    ],
    sort: SortPolicy::NewestFirst(CREATED_AT),
    image_folder: Some("announcements"),
    has_status: false,
};

static ACHIEVEMENT: EntitySchema = EntitySchema {
    kind: EntityKind::Achievement,
    collection: "achievements",
    label: "Başarı",
    fields: &[
        field("title", Text, true),
        field("description", LongText, false),
        field("year", Text, false),
        field("icon", Text, false),
        field("order", Number, false),
    ],
    sort: SortPolicy::Order,
    image_folder: None,
    has_status: false,
};

static PRICING_TIER: EntitySchema = EntitySchema {
    kind: EntityKind::PricingTier,
    collection: "pricing",
    label: "Ücret Paketi",
    fields: &[
        field("name", Text, true),
        field("price", Text, true),
        field("period", Text, false),
        field("description", LongText, false),
        field("features", LongText, false),
        field("highlighted", Bool, false),
        field("order", Number, false),
    ],
    sort: SortPolicy::Order,
    image_folder: None,
    has_status: false,
};

static MENU_ITEM: EntitySchema = EntitySchema {
    kind: EntityKind::MenuItem,
    collection: "menuItems",
    label: "Menü",
    fields: &[
        field("day", Text, true),
        field("meal", Text, true),
        field("items", LongText, true),
        field("order", Number, false),
    ],
    sort: SortPolicy::Order,
    image_folder: None,
    has_status: false,
};

static SLIDER: EntitySchema = EntitySchema {
    kind: EntityKind::Slider,
    collection: "sliders",
    label: "Slayt",
    fields: &[
        field("title", Text, true),
        field("subtitle", Text, false),
        field("buttonText", Text, false),
        field("buttonUrl", Url, false),
        field("order", Number, false),
    ],
    sort: SortPolicy::Order,
    image_folder: Some("sliders"),
    has_status: false,
};

static CONTACT_MESSAGE: EntitySchema = EntitySchema {
    kind: EntityKind::ContactMessage,
    collection: "contactMessages",
    label: "İletişim Mesajı",
    fields: &[
        field("name", Text, true),
        field("email", Text, true),
        field("phone", Text, false),
        field("subject", Text, false),
        field("message", LongText, true),
    ],
    sort: SortPolicy::NewestFirst(CREATED_AT),
    image_folder: None,
    has_status: true,
};

/// Moderation status of a contact message. Any status may be set at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(MessageStatus::New),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            "archived" => Ok(MessageStatus::Archived),
            _ => Err(SiteError::Api(format!(
                "Unknown message status \"{}\" (expected new, read, replied or archived)",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        match fields {
            Value::Object(map) => Document::new(id, map),
            _ => panic!("fields must be an object"),
        }
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn order_sort_is_ascending() {
        let mut docs = vec![
            doc("c", json!({"order": 3})),
            doc("a", json!({"order": 1})),
            doc("b", json!({"order": 2})),
        ];
        SortPolicy::Order.sort(&mut docs);
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn order_sort_is_stable_and_puts_missing_last() {
        let mut docs = vec![
            doc("x", json!({})),
            doc("first", json!({"order": 1})),
            doc("second", json!({"order": 1})),
            doc("y", json!({"order": "0"})),
        ];
        SortPolicy::Order.sort(&mut docs);
        assert_eq!(ids(&docs), vec!["y", "first", "second", "x"]);
    }

    #[test]
    fn newest_first_sort() {
        let mut docs = vec![
            doc("t1", json!({"createdAt": "2024-01-01T10:00:00Z"})),
            doc("none", json!({})),
            doc("t3", json!({"createdAt": "2024-03-01T10:00:00Z"})),
            doc("t2", json!({"createdAt": "2024-02-01T10:00:00Z"})),
        ];
        SortPolicy::NewestFirst(CREATED_AT).sort(&mut docs);
        assert_eq!(ids(&docs), vec!["t3", "t2", "t1", "none"]);
    }

    #[test]
    fn field_kinds_parse_form_strings() {
        assert_eq!(FieldKind::Number.parse("order", " 4 ").unwrap(), json!(4));
        assert_eq!(FieldKind::Number.parse("order", "").unwrap(), Value::Null);
        assert!(FieldKind::Number.parse("order", "four").is_err());
        assert_eq!(FieldKind::Bool.parse("important", "evet").unwrap(), json!(true));
        assert!(FieldKind::Bool.parse("important", "maybe").is_err());
        assert_eq!(
            FieldKind::Date.parse("date", "2024-09-01").unwrap(),
            json!("2024-09-01")
        );
        assert!(matches!(
            FieldKind::Date.parse("date", "yarın"),
            Err(SiteError::Validation(_))
        ));
        assert_eq!(FieldKind::Text.parse("name", " Ayşe ").unwrap(), json!("Ayşe"));
    }

    #[test]
    fn kinds_parse_from_names_and_collections() {
        assert_eq!("teacher".parse::<EntityKind>().unwrap(), EntityKind::Teacher);
        assert_eq!("teachers".parse::<EntityKind>().unwrap(), EntityKind::Teacher);
        assert_eq!("menuItems".parse::<EntityKind>().unwrap(), EntityKind::MenuItem);
        assert_eq!("messages".parse::<EntityKind>().unwrap(), EntityKind::ContactMessage);
        assert!("students".parse::<EntityKind>().is_err());
    }

    #[test]
    fn every_schema_points_back_to_its_kind() {
        for kind in EntityKind::all() {
            let schema = kind.schema();
            assert_eq!(schema.kind, *kind);
            assert!(schema.fields.iter().any(|f| f.required), "{}", kind);
        }
        let only_messages: Vec<_> = EntityKind::all()
            .iter()
            .filter(|k| k.schema().has_status)
            .collect();
        assert_eq!(only_messages, vec![&EntityKind::ContactMessage]);
    }

    #[test]
    fn message_status_parses() {
        assert_eq!("Replied".parse::<MessageStatus>().unwrap(), MessageStatus::Replied);
        assert!("spam".parse::<MessageStatus>().is_err());
    }
}
