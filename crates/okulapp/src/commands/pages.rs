use crate::commands::{CmdMessage, CmdResult, PageSummary, SectionStatus};
use crate::error::Result;
use crate::model::PageMeta;
use crate::registry::{sections_for, PageKey};
use crate::render::PageRenderer;
use crate::sections;
use crate::store::DocumentStore;

/// All pages with their routes and how many sections are stored.
pub fn list<S: DocumentStore + ?Sized>(store: &S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for page in PageKey::all() {
        let stored = sections::load_page(store, *page)?;
        let registry = sections_for(*page);
        result.pages.push(PageSummary {
            page: *page,
            route: page.route(),
            title: page.title(),
            sections: registry.len(),
            stored_sections: stored
                .as_ref()
                .map(|p| registry.iter().filter(|s| p.section(s.id).is_some()).count())
                .unwrap_or(0),
            last_updated: stored.and_then(|p| p.last_updated),
        });
    }
    Ok(result)
}

/// Registry sections of a page, marked stored or absent.
pub fn sections<S: DocumentStore + ?Sized>(store: &S, page: PageKey) -> Result<CmdResult> {
    let stored = sections::load_page(store, page)?;
    let mut result = CmdResult::default();
    for spec in sections_for(page) {
        let section = stored.as_ref().and_then(|p| p.section(spec.id));
        result.sections.push(SectionStatus {
            id: spec.id,
            title: spec.title,
            description: spec.description,
            shape: spec.shape,
            stored: section.is_some(),
            has_image: section.is_some_and(|s| s.image.is_some()),
        });
    }
    if stored.is_none() {
        result.add_message(CmdMessage::info(format!(
            "Page \"{}\" has no stored content yet; defaults are shown",
            page
        )));
    }
    Ok(result)
}

pub fn render<S: DocumentStore + ?Sized>(
    store: &S,
    renderer: &PageRenderer,
    page: PageKey,
) -> Result<CmdResult> {
    Ok(CmdResult {
        page: Some(renderer.render(store, page)),
        ..Default::default()
    })
}

pub fn set_meta<S: DocumentStore + ?Sized>(
    store: &mut S,
    page: PageKey,
    meta: &PageMeta,
) -> Result<CmdResult> {
    sections::write_page_meta(store, page, meta)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Meta saved for page \"{}\"", page)));
    Ok(result)
}
