//! # Command Layer
//!
//! One function per admin or public operation. Commands take the store (and
//! media host when they upload or delete images), call into the core modules
//! and return a [`CmdResult`] describing what happened.
//!
//! Commands never print, prompt or pick exit codes. Input parsing (page keys,
//! entity kinds, `key=value` assignments) happens one layer up, in
//! [`crate::api`]; commands receive typed values.
//!
//! ## Modules
//!
//! - [`pages`]: page listing, section status, rendering, SEO fields
//! - [`section`]: show and save one section through the editor
//! - [`entity`]: entity list/create/update/delete and message status
//!
//! Tests for each command live beside it and run against
//! [`crate::store::memory::InMemoryStore`] and
//! [`crate::media::memory::InMemoryMedia`].

use crate::content::{ContentShape, SectionContent};
use crate::model::Document;
use crate::registry::PageKey;
use crate::render::RenderedPage;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod entity;
pub mod pages;
pub mod section;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// One row of `okul pages`.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub page: PageKey,
    pub route: &'static str,
    pub title: &'static str,
    pub sections: usize,
    pub stored_sections: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A registry section and whether the page document holds it.
#[derive(Debug, Clone, Serialize)]
pub struct SectionStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub shape: ContentShape,
    pub stored: bool,
    pub has_image: bool,
}

/// Editable view of one section, as the editor sees it.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub page: PageKey,
    pub id: String,
    pub title: &'static str,
    pub shape: ContentShape,
    pub content: SectionContent,
    pub image: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub stored: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    /// Entities to display.
    pub listed: Vec<Document>,
    /// Entities created, changed or removed by the command.
    pub affected: Vec<Document>,
    pub pages: Vec<PageSummary>,
    pub sections: Vec<SectionStatus>,
    pub section: Option<SectionView>,
    pub page: Option<RenderedPage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, docs: Vec<Document>) -> Self {
        self.listed = docs;
        self
    }

    pub fn with_affected(mut self, docs: Vec<Document>) -> Self {
        self.affected = docs;
        self
    }
}
