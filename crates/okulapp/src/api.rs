//! # API Facade
//!
//! [`SiteApi`] is the single entry point for every client of the library. It
//! is a thin layer over [`crate::commands`]:
//!
//! - **Parses string input**: page keys or routes, entity kinds, message
//!   statuses and `key=value` field assignments.
//! - **Gates admin operations** on the [`SessionContext`]: anything that
//!   writes to the store or media host needs a signed-in admin. Reading and
//!   public rendering do not.
//! - **Dispatches** to the matching command and returns its [`CmdResult`].
//!
//! ## Generic Over Store and Media
//!
//! `SiteApi<S: DocumentStore, M: MediaStore>`:
//! - Production: `SiteApi<FileStore, FsMedia>`
//! - Testing: `SiteApi<InMemoryStore, InMemoryMedia>`
//!
//! API tests check parsing and gating; behavior is tested in the commands.

use crate::commands::{self, section::SectionInput, CmdResult};
use crate::entities::{EntityKind, MessageStatus};
use crate::error::{Result, SiteError};
use crate::media::{MediaFile, MediaStore};
use crate::model::{Fields, PageMeta};
use crate::registry::{page_for_route, PageKey};
use crate::render::PageRenderer;
use crate::session::SessionContext;
use crate::store::DocumentStore;

pub struct SiteApi<S: DocumentStore, M: MediaStore> {
    store: S,
    media: M,
    session: SessionContext,
    renderer: PageRenderer,
}

impl<S: DocumentStore, M: MediaStore> SiteApi<S, M> {
    pub fn new(store: S, media: M, session: SessionContext, renderer: PageRenderer) -> Self {
        Self {
            store,
            media,
            session,
            renderer,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    // --- Pages and sections ---

    pub fn list_pages(&self) -> Result<CmdResult> {
        commands::pages::list(&self.store)
    }

    pub fn page_sections(&self, page: &str) -> Result<CmdResult> {
        commands::pages::sections(&self.store, parse_page(page)?)
    }

    /// Renders a page given its key (`pricing`) or route (`/fiyat-bilgileri`).
    pub fn render(&self, target: &str) -> Result<CmdResult> {
        commands::pages::render(&self.store, &self.renderer, parse_page(target)?)
    }

    pub fn set_meta(&mut self, page: &str, meta: PageMeta) -> Result<CmdResult> {
        self.session.require_admin()?;
        commands::pages::set_meta(&mut self.store, parse_page(page)?, &meta)
    }

    pub fn show_section(&self, page: &str, section: &str) -> Result<CmdResult> {
        commands::section::show(&self.store, parse_page(page)?, section)
    }

    pub fn save_section(
        &mut self,
        page: &str,
        section: &str,
        input: SectionInput,
    ) -> Result<CmdResult> {
        self.session.require_admin()?;
        commands::section::save(
            &mut self.store,
            &self.media,
            parse_page(page)?,
            section,
            input,
        )
    }

    // --- Entities ---

    pub fn list_entities(&self, kind: &str, category: Option<&str>) -> Result<CmdResult> {
        commands::entity::list(&self.store, kind.parse()?, category)
    }

    pub fn create_entity<A: AsRef<str>>(
        &mut self,
        kind: &str,
        assignments: &[A],
        image: Option<MediaFile>,
    ) -> Result<CmdResult> {
        self.session.require_admin()?;
        let kind: EntityKind = kind.parse()?;
        let fields = parse_assignments(kind, assignments)?;
        commands::entity::create(&mut self.store, &self.media, kind, fields, image.as_ref())
    }

    pub fn update_entity<A: AsRef<str>>(
        &mut self,
        kind: &str,
        id: &str,
        assignments: &[A],
        image: Option<MediaFile>,
    ) -> Result<CmdResult> {
        self.session.require_admin()?;
        let kind: EntityKind = kind.parse()?;
        let fields = parse_assignments(kind, assignments)?;
        if fields.is_empty() && image.is_none() {
            return Err(SiteError::Validation(
                "Nothing to update: give at least one field or an image".to_string(),
            ));
        }
        commands::entity::update(
            &mut self.store,
            &self.media,
            kind,
            id,
            fields,
            image.as_ref(),
        )
    }

    pub fn delete_entity(&mut self, kind: &str, id: &str) -> Result<CmdResult> {
        self.session.require_admin()?;
        commands::entity::delete(&mut self.store, &self.media, kind.parse()?, id)
    }

    pub fn set_message_status(&mut self, id: &str, status: &str) -> Result<CmdResult> {
        self.session.require_admin()?;
        let status: MessageStatus = status.parse()?;
        commands::entity::set_status(&mut self.store, id, status)
    }
}

/// Accepts a page key or a public route.
pub fn parse_page(input: &str) -> Result<PageKey> {
    if input.trim_start().starts_with('/') {
        return page_for_route(input)
            .ok_or_else(|| SiteError::Api(format!("No page at route \"{}\"", input)));
    }
    input.parse()
}

/// Parses `key=value` pairs into typed fields of `kind`.
///
/// Later assignments to the same key win.
pub fn parse_assignments<A: AsRef<str>>(kind: EntityKind, assignments: &[A]) -> Result<Fields> {
    let schema = kind.schema();
    let mut fields = Fields::new();
    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            SiteError::Api(format!(
                "Expected key=value, got \"{}\"",
                assignment
            ))
        })?;
        let key = key.trim();
        let spec = schema.field(key).ok_or_else(|| {
            let known: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();
            SiteError::Api(format!(
                "{} has no field \"{}\" (fields: {})",
                schema.label,
                key,
                known.join(", ")
            ))
        })?;
        fields.insert(key.to_string(), spec.kind.parse(key, raw)?);
    }
    Ok(fields)
}
