//! # Public Page Renderer
//!
//! Builds the visitor-facing view of a page: every registry section, in
//! registry order, plus the entity lists the page shows.
//!
//! Rendering never fails:
//!
//! - A store failure while loading the page document or a list is logged and
//!   treated as "nothing stored".
//! - A section that is absent, or whose content decodes to nothing, is
//!   replaced by its built-in default from [`defaults`].
//! - A section without an image gets the default image path, if it has one.
//!
//! The displayed section title is the registry title; titles stored in the
//! document are not shown. Media ids (`imagePublicId`) never appear in the
//! output. HTML content is passed through as stored, without sanitization.

use crate::content::{codec, SectionContent};
use crate::entities::{EntityKind, EntityManager, IMAGE_PUBLIC_ID};
use crate::model::{Document, PageContent};
use crate::registry::{collections_for, page_for_route, sections_for, PageKey};
use crate::sections;
use crate::store::DocumentStore;
use serde::Serialize;

pub mod defaults;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedButton {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub id: String,
    pub title: String,
    pub content: SectionContent,
    pub image: Option<String>,
    pub button: Option<RenderedButton>,
    /// True when built-in copy was shown instead of stored content.
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCollection {
    pub kind: EntityKind,
    pub label: String,
    pub items: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub page: PageKey,
    pub route: String,
    pub meta: RenderedMeta,
    pub sections: Vec<RenderedSection>,
    pub collections: Vec<RenderedCollection>,
}

impl RenderedPage {
    pub fn section(&self, id: &str) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn collection(&self, kind: EntityKind) -> Option<&RenderedCollection> {
        self.collections.iter().find(|c| c.kind == kind)
    }
}

pub struct PageRenderer {
    site_name: String,
}

impl PageRenderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    /// Renders a public URL path; `None` when no page lives there.
    pub fn render_route<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        route: &str,
    ) -> Option<RenderedPage> {
        page_for_route(route).map(|page| self.render(store, page))
    }

    pub fn render<S: DocumentStore + ?Sized>(&self, store: &S, page: PageKey) -> RenderedPage {
        let stored = sections::load_page(store, page).unwrap_or_else(|e| {
            tracing::warn!(page = %page, "could not load page content, using defaults: {}", e);
            None
        });

        let sections = sections_for(page)
            .iter()
            .map(|spec| render_section(page, spec.id, spec.title, stored.as_ref()))
            .collect();

        let collections = collections_for(page)
            .iter()
            .map(|kind| {
                let manager = EntityManager::new(*kind);
                RenderedCollection {
                    kind: *kind,
                    label: manager.schema().label.to_string(),
                    items: manager.list(store).into_iter().map(public_view).collect(),
                }
            })
            .collect();

        RenderedPage {
            page,
            route: page.route().to_string(),
            meta: self.meta(page, stored.as_ref()),
            sections,
            collections,
        }
    }

    fn meta(&self, page: PageKey, stored: Option<&PageContent>) -> RenderedMeta {
        let meta = stored.map(|p| p.meta.clone()).unwrap_or_default();
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        RenderedMeta {
            title: non_blank(meta.title)
                .unwrap_or_else(|| format!("{} | {}", page.title(), self.site_name)),
            description: non_blank(meta.description).unwrap_or_else(|| self.site_name.clone()),
            keywords: non_blank(meta.keywords).unwrap_or_default(),
        }
    }
}

fn render_section(
    page: PageKey,
    section_id: &str,
    title: &str,
    stored: Option<&PageContent>,
) -> RenderedSection {
    let stored = stored.and_then(|p| p.section(section_id));
    let default = defaults::section_default(page, section_id);

    let decoded = stored
        .map(|s| codec::decode(page, section_id, &s.content))
        .filter(|content| !content.is_empty());
    let is_default = decoded.is_none();
    let content = match decoded {
        Some(content) => fill_initials(content),
        None => default
            .as_ref()
            .map(|d| d.content.clone())
            .unwrap_or_else(|| SectionContent::empty_for(codec::shape_for(page, section_id))),
    };

    let image = stored
        .and_then(|s| s.image.clone())
        .filter(|url| !url.trim().is_empty())
        .or_else(|| default.as_ref().and_then(|d| d.image.clone()));

    let stored_button = stored.and_then(|s| match (&s.button_text, &s.button_url) {
        (Some(text), Some(url)) if !text.trim().is_empty() && !url.trim().is_empty() => {
            Some(RenderedButton {
                text: text.clone(),
                url: url.clone(),
            })
        }
        _ => None,
    });
    let button = stored_button.or_else(|| {
        default.as_ref().and_then(|d| d.button).map(|(text, url)| RenderedButton {
            text: text.to_string(),
            url: url.to_string(),
        })
    });

    RenderedSection {
        id: section_id.to_string(),
        title: title.to_string(),
        content,
        image,
        button,
        is_default,
    }
}

fn fill_initials(content: SectionContent) -> SectionContent {
    match content {
        SectionContent::Team(members) => SectionContent::Team(
            members
                .into_iter()
                .map(|mut m| {
                    m.initials = m.display_initials();
                    m
                })
                .collect(),
        ),
        other => other,
    }
}

fn public_view(mut doc: Document) -> Document {
    doc.fields.remove(IMAGE_PUBLIC_ID);
    doc
}
