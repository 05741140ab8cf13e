//! # Section Editor
//!
//! Admin-side editing session for one page at a time, one section at a time.
//!
//! ```text
//! Idle ──select_page──▶ Loaded ──select_section──▶ SectionSelected
//!                         ▲                              │ edit
//!                         │ save ok                      ▼
//!                         └──────── Saving ◀──save──── Dirty
//!                                     │ save failed      ▲
//!                                     └──────────────────┘
//! ```
//!
//! The draft is a typed copy of one section. Switching sections re-derives
//! the draft from the last loaded snapshot, so unsaved edits to the previous
//! section are dropped. A failed save keeps the draft, including a pending
//! image, so the same save can be retried.
//!
//! Persisting is delegated to [`crate::sections::write_section`]; the editor
//! never writes the page document itself.

use crate::content::{codec, Card, FaqEntry, SectionContent, TeamMember};
use crate::error::{Result, SiteError};
use crate::media::{MediaFile, MediaStore};
use crate::model::PageContent;
use crate::registry::{require_section, sections_for, PageKey};
use crate::sections::{self, ImageChange, SectionWrite};
use crate::store::DocumentStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorState {
    Idle,
    Loaded,
    SectionSelected,
    Dirty,
    Saving,
}

/// In-memory, typed copy of the section being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDraft {
    pub section_id: String,
    pub content: SectionContent,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    /// Image currently stored for the section.
    pub image: Option<String>,
    pub pending_image: ImageChange,
}

impl SectionDraft {
    fn from_snapshot(page: PageKey, section_id: &str, snapshot: Option<&PageContent>) -> Self {
        let stored = snapshot.and_then(|p| p.section(section_id));
        let content = match stored {
            Some(section) => codec::decode(page, section_id, &section.content),
            None => SectionContent::empty_for(codec::shape_for(page, section_id)),
        };
        Self {
            section_id: section_id.to_string(),
            content,
            button_text: stored.and_then(|s| s.button_text.clone()),
            button_url: stored.and_then(|s| s.button_url.clone()),
            image: stored.and_then(|s| s.image.clone()),
            pending_image: ImageChange::Keep,
        }
    }

    fn to_write(&self) -> SectionWrite {
        SectionWrite {
            content: self.content.clone(),
            button_text: self.button_text.clone(),
            button_url: self.button_url.clone(),
            image: self.pending_image.clone(),
        }
    }

    /// Bullet items must not contain the delimiter, or they would split on
    /// the next load.
    pub fn validate(&self) -> Result<()> {
        if let SectionContent::Bullets(items) = &self.content {
            if let Some(bad) = items.iter().find(|i| i.contains(codec::BULLET_DELIMITER)) {
                return Err(SiteError::Validation(format!(
                    "List items cannot contain \"{}\": {}",
                    codec::BULLET_DELIMITER,
                    bad
                )));
            }
        }
        Ok(())
    }
}

pub struct SectionEditor {
    state: EditorState,
    page: Option<PageKey>,
    snapshot: Option<PageContent>,
    draft: Option<SectionDraft>,
}

impl Default for SectionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionEditor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Idle,
            page: None,
            snapshot: None,
            draft: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn page(&self) -> Option<PageKey> {
        self.page
    }

    /// Last loaded or saved page document; `None` while the page has none yet.
    pub fn snapshot(&self) -> Option<&PageContent> {
        self.snapshot.as_ref()
    }

    pub fn draft(&self) -> Option<&SectionDraft> {
        self.draft.as_ref()
    }

    /// Loads `page` and selects `section`, or the page's first section.
    ///
    /// A failed read is treated as "no document yet".
    pub fn select_page<S: DocumentStore + ?Sized>(
        &mut self,
        store: &S,
        page: PageKey,
        section: Option<&str>,
    ) -> Result<()> {
        let section_id = match section {
            Some(id) => require_section(page, id)?.id,
            None => match sections_for(page).first() {
                Some(spec) => spec.id,
                None => return Err(SiteError::Api(format!("Page \"{}\" has no sections", page))),
            },
        };

        self.snapshot = sections::load_page(store, page).unwrap_or_else(|e| {
            tracing::warn!(page = %page, "could not load page, starting empty: {}", e);
            None
        });
        self.page = Some(page);
        self.state = EditorState::Loaded;
        self.select_section(section_id)
    }

    /// Selects another section of the loaded page, discarding unsaved edits.
    pub fn select_section(&mut self, section_id: &str) -> Result<()> {
        let page = self.loaded_page()?;
        if require_section(page, section_id).is_err() {
            return Err(SiteError::Validation(format!(
                "Page \"{}\" has no section \"{}\"",
                page, section_id
            )));
        }
        if self.state == EditorState::Dirty {
            tracing::debug!(page = %page, "discarding unsaved section edits");
        }
        self.draft = Some(SectionDraft::from_snapshot(
            page,
            section_id,
            self.snapshot.as_ref(),
        ));
        self.state = EditorState::SectionSelected;
        Ok(())
    }

    /// Applies an arbitrary change to the draft.
    pub fn edit(&mut self, f: impl FnOnce(&mut SectionDraft)) -> Result<()> {
        let draft = self.draft.as_mut().ok_or_else(no_section)?;
        f(draft);
        self.state = EditorState::Dirty;
        Ok(())
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.edit_content(|content| match content {
            SectionContent::PlainText(s) | SectionContent::Html(s) => {
                *s = text;
                true
            }
            _ => false,
        })
    }

    /// Replaces the whole content. The variant must match the section's.
    pub fn set_content(&mut self, value: SectionContent) -> Result<()> {
        self.edit_content(|content| {
            if std::mem::discriminant(content) == std::mem::discriminant(&value) {
                *content = value;
                true
            } else {
                false
            }
        })
    }

    pub fn push_card(&mut self, card: Card) -> Result<()> {
        self.edit_content(|content| match content {
            SectionContent::Cards(items) => {
                items.push(card);
                true
            }
            _ => false,
        })
    }

    /// Adds a team member; blank initials are derived from the name.
    pub fn push_team_member(&mut self, mut member: TeamMember) -> Result<()> {
        if member.initials.trim().is_empty() {
            member.initials = member.display_initials();
        }
        self.edit_content(|content| match content {
            SectionContent::Team(items) => {
                items.push(member);
                true
            }
            _ => false,
        })
    }

    pub fn push_faq(&mut self, entry: FaqEntry) -> Result<()> {
        self.edit_content(|content| match content {
            SectionContent::Faq(items) => {
                items.push(entry);
                true
            }
            _ => false,
        })
    }

    pub fn push_bullet(&mut self, item: impl Into<String>) -> Result<()> {
        let item = item.into();
        self.edit_content(|content| match content {
            SectionContent::Bullets(items) => {
                items.push(item);
                true
            }
            _ => false,
        })
    }

    pub fn remove_item(&mut self, index: usize) -> Result<()> {
        let len = self.item_count()?;
        if index >= len {
            return Err(out_of_range(index, len));
        }
        self.edit_content(|content| {
            match content {
                SectionContent::Cards(v) => {
                    v.remove(index);
                }
                SectionContent::Team(v) => {
                    v.remove(index);
                }
                SectionContent::Faq(v) => {
                    v.remove(index);
                }
                SectionContent::Bullets(v) => {
                    v.remove(index);
                }
                SectionContent::PlainText(_) | SectionContent::Html(_) => return false,
            }
            true
        })
    }

    /// Moves one item so it ends up at index `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.item_count()?;
        if from >= len {
            return Err(out_of_range(from, len));
        }
        if to >= len {
            return Err(out_of_range(to, len));
        }
        self.edit_content(|content| {
            match content {
                SectionContent::Cards(v) => move_in(v, from, to),
                SectionContent::Team(v) => move_in(v, from, to),
                SectionContent::Faq(v) => move_in(v, from, to),
                SectionContent::Bullets(v) => move_in(v, from, to),
                SectionContent::PlainText(_) | SectionContent::Html(_) => return false,
            }
            true
        })
    }

    pub fn set_button(&mut self, text: Option<String>, url: Option<String>) -> Result<()> {
        self.edit(|draft| {
            draft.button_text = text;
            draft.button_url = url;
        })
    }

    pub fn attach_image(&mut self, file: MediaFile) -> Result<()> {
        self.edit(|draft| draft.pending_image = ImageChange::Replace(file))
    }

    pub fn remove_image(&mut self) -> Result<()> {
        self.edit(|draft| draft.pending_image = ImageChange::Remove)
    }

    /// Validates and persists the draft.
    ///
    /// On success the editor holds the freshly written page and a clean draft
    /// of the same section. On failure it stays dirty with the draft intact.
    pub fn save<S, M>(&mut self, store: &mut S, media: &M) -> Result<&PageContent>
    where
        S: DocumentStore + ?Sized,
        M: MediaStore + ?Sized,
    {
        let page = self.loaded_page()?;
        let draft = self.draft.as_ref().ok_or_else(no_section)?;
        draft.validate()?;
        let write = draft.to_write();
        let section_id = draft.section_id.clone();

        self.state = EditorState::Saving;
        match sections::write_section(store, media, page, &section_id, &write) {
            Ok(saved) => {
                self.draft = Some(SectionDraft::from_snapshot(page, &section_id, Some(&saved)));
                self.state = EditorState::Loaded;
                let saved = self.snapshot.insert(saved);
                Ok(&*saved)
            }
            Err(e) => {
                tracing::warn!(page = %page, section = %section_id, "save failed: {}", e);
                self.state = EditorState::Dirty;
                Err(e)
            }
        }
    }

    fn loaded_page(&self) -> Result<PageKey> {
        self.page
            .ok_or_else(|| SiteError::Validation("No page selected".to_string()))
    }

    fn item_count(&self) -> Result<usize> {
        let draft = self.draft.as_ref().ok_or_else(no_section)?;
        draft.content.item_count().ok_or_else(|| {
            SiteError::Validation(format!(
                "Section \"{}\" holds text, not a list",
                draft.section_id
            ))
        })
    }

    /// Runs `apply` on the content; `false` means the variant did not fit.
    fn edit_content(&mut self, apply: impl FnOnce(&mut SectionContent) -> bool) -> Result<()> {
        let draft = self.draft.as_mut().ok_or_else(no_section)?;
        let variant = draft.content.variant_name();
        if !apply(&mut draft.content) {
            return Err(SiteError::Validation(format!(
                "Section \"{}\" holds {} content",
                draft.section_id, variant
            )));
        }
        self.state = EditorState::Dirty;
        Ok(())
    }
}

fn move_in<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

fn no_section() -> SiteError {
    SiteError::Validation("No section selected".to_string())
}

fn out_of_range(index: usize, len: usize) -> SiteError {
    SiteError::Validation(format!(
        "Item {} does not exist (section has {} items)",
        index, len
    ))
}
