use crate::commands::{CmdMessage, CmdResult, SectionView};
use crate::content::{Card, ContentShape, FaqEntry, SectionContent, TeamMember};
use crate::editor::{SectionDraft, SectionEditor};
use crate::error::{Result, SiteError};
use crate::media::{MediaFile, MediaStore};
use crate::registry::{require_section, PageKey};
use crate::store::DocumentStore;
use serde::de::DeserializeOwned;

/// Changes requested for one section. Anything left `None` stays as stored.
#[derive(Debug, Clone, Default)]
pub struct SectionInput {
    /// Text or HTML for text sections; a JSON array for structured ones.
    pub content: Option<String>,
    pub image: Option<MediaFile>,
    pub remove_image: bool,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
}

impl SectionInput {
    fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.image.is_none()
            && !self.remove_image
            && self.button_text.is_none()
            && self.button_url.is_none()
    }
}

pub fn show<S: DocumentStore + ?Sized>(
    store: &S,
    page: PageKey,
    section_id: &str,
) -> Result<CmdResult> {
    let mut editor = SectionEditor::new();
    editor.select_page(store, page, Some(section_id))?;
    let stored = editor
        .snapshot()
        .is_some_and(|p| p.section(section_id).is_some());
    let draft = editor
        .draft()
        .ok_or_else(|| SiteError::Api("No section selected".to_string()))?;

    let mut result = CmdResult {
        section: Some(view(page, draft, stored)?),
        ..Default::default()
    };
    if !stored {
        result.add_message(CmdMessage::info(
            "Section is not stored yet; the public page shows its default",
        ));
    }
    Ok(result)
}

pub fn save<S, M>(
    store: &mut S,
    media: &M,
    page: PageKey,
    section_id: &str,
    input: SectionInput,
) -> Result<CmdResult>
where
    S: DocumentStore + ?Sized,
    M: MediaStore + ?Sized,
{
    let spec = require_section(page, section_id)?;
    if input.is_empty() {
        return Err(SiteError::Validation(
            "Nothing to save: give content, an image or a button".to_string(),
        ));
    }
    if input.image.is_some() && input.remove_image {
        return Err(SiteError::Validation(
            "Cannot attach and remove an image in the same save".to_string(),
        ));
    }
    let content = input
        .content
        .as_deref()
        .map(|raw| parse_content(spec.shape, raw))
        .transpose()?;

    let mut editor = SectionEditor::new();
    editor.select_page(&*store, page, Some(section_id))?;
    if let Some(content) = content {
        editor.set_content(content)?;
    }
    if input.button_text.is_some() || input.button_url.is_some() {
        let (text, url) = match editor.draft() {
            Some(draft) => (
                input.button_text.or_else(|| draft.button_text.clone()),
                input.button_url.or_else(|| draft.button_url.clone()),
            ),
            None => (input.button_text, input.button_url),
        };
        editor.set_button(non_blank(text), non_blank(url))?;
    }
    if let Some(file) = input.image {
        editor.attach_image(file)?;
    } else if input.remove_image {
        editor.remove_image()?;
    }

    editor.save(store, media)?;
    let draft = editor
        .draft()
        .ok_or_else(|| SiteError::Api("No section selected".to_string()))?;

    let mut result = CmdResult {
        section: Some(view(page, draft, true)?),
        ..Default::default()
    };
    result.add_message(CmdMessage::success(format!(
        "Saved {} / {} ({})",
        page, section_id, spec.title
    )));
    Ok(result)
}

fn view(page: PageKey, draft: &SectionDraft, stored: bool) -> Result<SectionView> {
    let spec = require_section(page, &draft.section_id)?;
    Ok(SectionView {
        page,
        id: draft.section_id.clone(),
        title: spec.title,
        shape: spec.shape,
        content: draft.content.clone(),
        image: draft.image.clone(),
        button_text: draft.button_text.clone(),
        button_url: draft.button_url.clone(),
        stored,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strict parse of admin input. Unlike stored content, bad input is an error.
pub fn parse_content(shape: ContentShape, raw: &str) -> Result<SectionContent> {
    match shape {
        ContentShape::PlainText => Ok(SectionContent::PlainText(raw.trim().to_string())),
        ContentShape::Html => Ok(SectionContent::Html(raw.trim().to_string())),
        ContentShape::ValueCards | ContentShape::ApproachCards | ContentShape::PaymentOptions => {
            Ok(SectionContent::Cards(parse_records::<Card>(shape, raw)?))
        }
        ContentShape::Team => {
            let mut members = parse_records::<TeamMember>(shape, raw)?;
            for member in &mut members {
                member.initials = member.display_initials();
            }
            Ok(SectionContent::Team(members))
        }
        ContentShape::Faq => Ok(SectionContent::Faq(parse_records::<FaqEntry>(shape, raw)?)),
        ContentShape::Bullets => {
            let items = if raw.trim_start().starts_with('[') {
                parse_records::<String>(shape, raw)?
            } else {
                raw.lines().map(str::to_string).collect()
            };
            Ok(SectionContent::Bullets(
                items
                    .into_iter()
                    .map(|i| i.trim().to_string())
                    .filter(|i| !i.is_empty())
                    .collect(),
            ))
        }
    }
}

fn parse_records<T: DeserializeOwned>(shape: ContentShape, raw: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| {
        SiteError::Validation(format!("Content for a {} section must be a JSON array: {}", shape, e))
    })
}
