//! # Rendering
//!
//! Turns a [`CmdResult`] into terminal text, or into JSON with `--output json`.
//! Each non-empty part of the result gets its own block, in a fixed order:
//! pages, sections, the section view, the rendered page, listed entries,
//! affected entries, then messages.
//!
//! Text rendering builds a `String` so tests can compare output without a
//! terminal. Columns are padded by display width, so Turkish letters and wide
//! glyphs line up.

use super::setup::OutputFormat;
use super::styles::styles;
use chrono::{DateTime, Utc};
use okulapp::commands::{
    CmdMessage, CmdResult, MessageLevel, PageSummary, SectionStatus, SectionView,
};
use okulapp::content::SectionContent;
use okulapp::model::{Document, CREATED_AT};
use okulapp::render::{RenderedPage, RenderedSection};
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const COL_ID: usize = 10;
const COL_TIME: usize = 16;
const COL_SECTION: usize = 14;

/// Fields tried in order for an entry's list label.
const LABEL_FIELDS: &[&str] = &["name", "title", "day", "email"];
/// Fields tried in order for the second column.
const DETAIL_FIELDS: &[&str] = &["status", "category", "date", "price", "meal", "position"];

pub fn print_result(result: &CmdResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Text => print!("{}", render_text(result)),
    }
    Ok(())
}

pub fn render_text(result: &CmdResult) -> String {
    let mut out = String::new();
    if !result.pages.is_empty() {
        render_pages(&mut out, &result.pages);
    }
    if !result.sections.is_empty() {
        render_section_statuses(&mut out, &result.sections);
    }
    if let Some(view) = &result.section {
        render_section_view(&mut out, view);
    }
    if let Some(page) = &result.page {
        render_page(&mut out, page);
    }
    if !result.listed.is_empty() {
        render_entries(&mut out, &result.listed);
    }
    if !result.affected.is_empty() && result.listed.is_empty() {
        render_entries(&mut out, &result.affected);
    }
    render_messages(&mut out, &result.messages);
    out
}

fn render_pages(out: &mut String, pages: &[PageSummary]) {
    let s = styles();
    for page in pages {
        let updated = page
            .last_updated
            .map(format_time_ago)
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(
            out,
            "{} {} {} {}",
            s.key.apply_to(pad(page.page.as_str(), 10)),
            pad(page.title, 18),
            s.muted.apply_to(pad(page.route, 20)),
            s.time.apply_to(format!(
                "{}/{} stored, {}",
                page.stored_sections, page.sections, updated
            )),
        );
    }
}

fn render_section_statuses(out: &mut String, sections: &[SectionStatus]) {
    let s = styles();
    for section in sections {
        let marker = if section.stored {
            s.stored.apply_to("●").to_string()
        } else {
            s.faint.apply_to("○").to_string()
        };
        let image = if section.has_image { " [img]" } else { "" };
        let _ = writeln!(
            out,
            "{} {} {} {}{}",
            marker,
            s.key.apply_to(pad(section.id, COL_SECTION)),
            pad(section.title, 28),
            s.muted.apply_to(section.shape),
            s.faint.apply_to(image),
        );
    }
}

fn render_section_view(out: &mut String, view: &SectionView) {
    let s = styles();
    let _ = writeln!(
        out,
        "{} {}",
        s.title.apply_to(view.title),
        s.muted.apply_to(format!("({}/{}, {})", view.page, view.id, view.shape)),
    );
    if !view.stored {
        let _ = writeln!(out, "{}", s.default_content.apply_to("not stored yet"));
    }
    render_content(out, &view.content);
    if let Some(image) = &view.image {
        let _ = writeln!(out, "{} {}", s.muted.apply_to("image:"), image);
    }
    if view.button_text.is_some() || view.button_url.is_some() {
        let _ = writeln!(
            out,
            "{} {} -> {}",
            s.muted.apply_to("button:"),
            view.button_text.as_deref().unwrap_or(""),
            view.button_url.as_deref().unwrap_or(""),
        );
    }
}

fn render_page(out: &mut String, page: &RenderedPage) {
    let s = styles();
    let _ = writeln!(
        out,
        "{} {}",
        s.title.apply_to(&page.meta.title),
        s.muted.apply_to(&page.route)
    );
    if !page.meta.description.is_empty() {
        let _ = writeln!(out, "{}", s.muted.apply_to(&page.meta.description));
    }
    for section in &page.sections {
        let _ = writeln!(out);
        render_rendered_section(out, section);
    }
    for collection in &page.collections {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}",
            s.title.apply_to(&collection.label),
            s.muted.apply_to(format!("({})", collection.items.len()))
        );
        render_entries(out, &collection.items);
    }
}

fn render_rendered_section(out: &mut String, section: &RenderedSection) {
    let s = styles();
    let hint = if section.is_default {
        s.default_content.apply_to(" (default)").to_string()
    } else {
        String::new()
    };
    let _ = writeln!(out, "{}{}", s.title.apply_to(&section.title), hint);
    render_content(out, &section.content);
    if let Some(image) = &section.image {
        let _ = writeln!(out, "{} {}", s.muted.apply_to("image:"), image);
    }
    if let Some(button) = &section.button {
        let _ = writeln!(
            out,
            "{} {} -> {}",
            s.muted.apply_to("button:"),
            button.text,
            button.url
        );
    }
}

fn render_content(out: &mut String, content: &SectionContent) {
    let s = styles();
    match content {
        SectionContent::PlainText(text) | SectionContent::Html(text) => {
            let _ = writeln!(out, "{}", text);
        }
        SectionContent::Cards(cards) => {
            for card in cards {
                let _ = writeln!(
                    out,
                    "  {} {} {}",
                    s.faint.apply_to(format!("[{}]", card.icon)),
                    s.title.apply_to(&card.title),
                    card.description
                );
            }
        }
        SectionContent::Team(members) => {
            for member in members {
                let _ = writeln!(
                    out,
                    "  {} {} {}",
                    s.key.apply_to(pad(&member.display_initials(), 4)),
                    s.title.apply_to(&member.name),
                    s.muted.apply_to(&member.title)
                );
            }
        }
        SectionContent::Faq(entries) => {
            for entry in entries {
                let _ = writeln!(out, "  {} {}", s.key.apply_to("Q:"), entry.question);
                let _ = writeln!(out, "  {} {}", s.muted.apply_to("A:"), entry.answer);
            }
        }
        SectionContent::Bullets(items) => {
            for item in items {
                let _ = writeln!(out, "  • {}", item);
            }
        }
    }
}

fn render_entries(out: &mut String, docs: &[Document]) {
    let s = styles();
    let label_width = LINE_WIDTH.saturating_sub(COL_ID + COL_TIME + 24 + 3);
    for doc in docs {
        let label = first_field(doc, LABEL_FIELDS).unwrap_or_default();
        let detail = first_field(doc, DETAIL_FIELDS).unwrap_or_default();
        let created = doc
            .get_timestamp(CREATED_AT)
            .map(format_time_ago)
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{} {} {} {}",
            s.key.apply_to(pad(&short_id(&doc.id), COL_ID)),
            pad(&truncate_to_width(&label, label_width), label_width),
            s.muted.apply_to(pad(&truncate_to_width(&detail, 24), 24)),
            s.time.apply_to(format!("{:>width$}", created, width = COL_TIME)),
        );
    }
}

fn render_messages(out: &mut String, messages: &[CmdMessage]) {
    let s = styles();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &s.info,
            MessageLevel::Success => &s.success,
            MessageLevel::Warning => &s.warning,
        };
        let _ = writeln!(out, "{}", style.apply_to(&message.content));
    }
}

fn first_field(doc: &Document, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match doc.fields.get(*key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Pads `s` with spaces to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let used = s.width();
    if used >= width {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(width - used))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
