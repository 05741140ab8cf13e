//! # Content Codec
//!
//! Converts between a section's stored `content` string and [`SectionContent`].
//!
//! ## Conventions
//!
//! - **Record arrays** (cards, team, FAQ): a JSON array of objects.
//! - **Bullets**: items joined with `|`, e.g. `"Taze meyve|Ev yapımı yoğurt"`.
//! - **Plain text / HTML**: the string itself.
//!
//! The convention is chosen from the registry entry for (page, section).
//! Unknown pairs are plain text. Structured parsing is never inferred from the
//! content itself, so HTML that happens to start with `[` stays HTML.
//!
//! ## Decode Never Fails
//!
//! - Malformed JSON or a non-array value decodes to an empty list, so editors
//!   can still offer an "add first item" action.
//! - Array elements that are not objects of the expected record are skipped.
//! - Missing record fields read as empty strings.
//!
//! ## Round Trip
//!
//! `decode(encode(v)) == v` for every structured value. For bullets this holds
//! when items are trimmed, non-empty and free of `|`; the editor rejects
//! items containing the delimiter before saving.

use super::{Card, ContentShape, FaqEntry, SectionContent, TeamMember};
use crate::registry::{section_spec, PageKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const BULLET_DELIMITER: char = '|';

/// Storage convention for a (page, section) pair; unknown pairs are plain text.
pub fn shape_for(page: PageKey, section_id: &str) -> ContentShape {
    section_spec(page, section_id)
        .map(|spec| spec.shape)
        .unwrap_or(ContentShape::PlainText)
}

pub fn decode(page: PageKey, section_id: &str, raw: &str) -> SectionContent {
    decode_shape(shape_for(page, section_id), raw)
}

/// Storage string for a section value. Takes the same key as [`decode`] so
/// call sites read symmetrically; the value's variant decides the format.
pub fn encode(_page: PageKey, _section_id: &str, value: &SectionContent) -> String {
    encode_content(value)
}

pub fn decode_shape(shape: ContentShape, raw: &str) -> SectionContent {
    match shape {
        ContentShape::PlainText => SectionContent::PlainText(raw.to_string()),
        ContentShape::Html => SectionContent::Html(raw.to_string()),
        ContentShape::ValueCards | ContentShape::ApproachCards | ContentShape::PaymentOptions => {
            SectionContent::Cards(decode_records::<Card>(shape, raw))
        }
        ContentShape::Team => SectionContent::Team(decode_records::<TeamMember>(shape, raw)),
        ContentShape::Faq => SectionContent::Faq(decode_records::<FaqEntry>(shape, raw)),
        ContentShape::Bullets => SectionContent::Bullets(decode_bullets(raw)),
    }
}

/// Storage string for a typed value. The variant alone decides the format.
pub fn encode_content(value: &SectionContent) -> String {
    match value {
        SectionContent::PlainText(s) | SectionContent::Html(s) => s.clone(),
        SectionContent::Cards(items) => encode_records(items),
        SectionContent::Team(items) => encode_records(items),
        SectionContent::Faq(items) => encode_records(items),
        SectionContent::Bullets(items) => encode_bullets(items),
    }
}

fn decode_records<T: DeserializeOwned>(shape: ContentShape, raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let elements = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(elements)) => elements,
        Ok(other) => {
            tracing::debug!(%shape, "expected a JSON array, found {}", json_kind(&other));
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!(%shape, "content is not valid JSON: {}", e);
            return Vec::new();
        }
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| {
            if !element.is_object() {
                tracing::debug!(%shape, index = i, "skipping non-object record");
                return None;
            }
            match serde_json::from_value(element) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!(%shape, index = i, "skipping malformed record: {}", e);
                    None
                }
            }
        })
        .collect()
}

fn encode_records<T: Serialize>(items: &[T]) -> String {
    // Records only hold strings, so serialization cannot fail.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn decode_bullets(raw: &str) -> Vec<String> {
    raw.split(BULLET_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn encode_bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(&BULLET_DELIMITER.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
