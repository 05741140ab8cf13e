//! # Section Content
//!
//! A section's `content` is stored as one string, but what that string means
//! depends on which page and section it belongs to: plain text, HTML, a JSON
//! array of cards, or a `|`-joined bullet list. In memory, content is always
//! carried as the tagged union [`SectionContent`], so editors and views match
//! on a variant instead of re-parsing strings.
//!
//! The mapping between the two lives in [`codec`]. Which variant a section
//! holds is declared by the registry as a [`ContentShape`].
//!
//! ## Record Types
//!
//! | Shape | Variant | Record |
//! |-------|---------|--------|
//! | `ValueCards` | `Cards` | [`Card`] (icon: symbolic name) |
//! | `ApproachCards` | `Cards` | [`Card`] (icon: symbolic name) |
//! | `PaymentOptions` | `Cards` | [`Card`] (icon: raw SVG path data) |
//! | `Team` | `Team` | [`TeamMember`] |
//! | `Faq` | `Faq` | [`FaqEntry`] |
//! | `Bullets` | `Bullets` | `String` |
//!
//! Record fields default to the empty string when missing from stored JSON.

use serde::{Deserialize, Serialize};

pub mod codec;

/// Storage convention for one (page, section) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentShape {
    PlainText,
    Html,
    ValueCards,
    ApproachCards,
    PaymentOptions,
    Team,
    Faq,
    Bullets,
}

impl ContentShape {
    /// Record-array and bullet shapes; everything else passes through as text.
    pub fn is_structured(self) -> bool {
        !matches!(self, ContentShape::PlainText | ContentShape::Html)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentShape::PlainText => "plain-text",
            ContentShape::Html => "html",
            ContentShape::ValueCards => "value-cards",
            ContentShape::ApproachCards => "approach-cards",
            ContentShape::PaymentOptions => "payment-options",
            ContentShape::Team => "team",
            ContentShape::Faq => "faq",
            ContentShape::Bullets => "bullets",
        }
    }
}

impl std::fmt::Display for ContentShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value, approach and payment-option card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl Card {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub initials: String,
}

impl TeamMember {
    /// New member with initials derived from the name.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            initials: initials_from_name(&name),
            name,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Stored initials, or the ones derived from the name when left blank.
    pub fn display_initials(&self) -> String {
        if self.initials.trim().is_empty() {
            initials_from_name(&self.name)
        } else {
            self.initials.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// First letter of each whitespace-separated token, uppercased.
///
/// `"Ayşe Kaya"` → `"AK"`, `"Mehmet"` → `"M"`.
pub fn initials_from_name(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Typed content of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum SectionContent {
    PlainText(String),
    Html(String),
    Cards(Vec<Card>),
    Team(Vec<TeamMember>),
    Faq(Vec<FaqEntry>),
    Bullets(Vec<String>),
}

impl SectionContent {
    /// The empty value editors start from for a shape.
    pub fn empty_for(shape: ContentShape) -> Self {
        match shape {
            ContentShape::PlainText => SectionContent::PlainText(String::new()),
            ContentShape::Html => SectionContent::Html(String::new()),
            ContentShape::ValueCards | ContentShape::ApproachCards | ContentShape::PaymentOptions => {
                SectionContent::Cards(Vec::new())
            }
            ContentShape::Team => SectionContent::Team(Vec::new()),
            ContentShape::Faq => SectionContent::Faq(Vec::new()),
            ContentShape::Bullets => SectionContent::Bullets(Vec::new()),
        }
    }

    /// True for blank text and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            SectionContent::PlainText(s) | SectionContent::Html(s) => s.trim().is_empty(),
            SectionContent::Cards(v) => v.is_empty(),
            SectionContent::Team(v) => v.is_empty(),
            SectionContent::Faq(v) => v.is_empty(),
            SectionContent::Bullets(v) => v.is_empty(),
        }
    }

    /// Number of records for list variants, `None` for text.
    pub fn item_count(&self) -> Option<usize> {
        match self {
            SectionContent::PlainText(_) | SectionContent::Html(_) => None,
            SectionContent::Cards(v) => Some(v.len()),
            SectionContent::Team(v) => Some(v.len()),
            SectionContent::Faq(v) => Some(v.len()),
            SectionContent::Bullets(v) => Some(v.len()),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            SectionContent::PlainText(_) => "plain-text",
            SectionContent::Html(_) => "html",
            SectionContent::Cards(_) => "cards",
            SectionContent::Team(_) => "team",
            SectionContent::Faq(_) => "faq",
            SectionContent::Bullets(_) => "bullets",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_for_two_names() {
        assert_eq!(initials_from_name("Ayşe Kaya"), "AK");
    }

    #[test]
    fn initials_for_single_name() {
        assert_eq!(initials_from_name("Mehmet"), "M");
    }

    #[test]
    fn initials_ignore_extra_whitespace_and_lowercase() {
        assert_eq!(initials_from_name("  zeynep   nur  demir "), "ZND");
        assert_eq!(initials_from_name(""), "");
    }

    #[test]
    fn team_member_derives_initials_but_keeps_edits() {
        let mut member = TeamMember::new("Ali Veli", "Müdür");
        assert_eq!(member.initials, "AV");
        member.initials = "Dr".into();
        assert_eq!(member.display_initials(), "Dr");
        member.initials = " ".into();
        assert_eq!(member.display_initials(), "AV");
    }

    #[test]
    fn empty_values_per_shape() {
        assert!(SectionContent::empty_for(ContentShape::PaymentOptions).is_empty());
        assert_eq!(
            SectionContent::empty_for(ContentShape::Faq).item_count(),
            Some(0)
        );
        assert_eq!(
            SectionContent::empty_for(ContentShape::Html).item_count(),
            None
        );
        assert!(SectionContent::PlainText("  \n".into()).is_empty());
    }

    #[test]
    fn structured_shapes() {
        assert!(ContentShape::Bullets.is_structured());
        assert!(ContentShape::Team.is_structured());
        assert!(!ContentShape::Html.is_structured());
        assert!(!ContentShape::PlainText.is_structured());
    }
}
