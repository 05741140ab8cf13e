//! # CLI Behavior
//!
//! `okul` stands in for the school site's admin panel: every page section and
//! every entity list can be edited from the shell, and `okul render` shows a
//! page the way visitors get it.
//!
//! Writes need a signed-in admin. The CLI signs in as `admin_email` from
//! `okul.toml`; setting it to an empty string makes the store read-only.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context setup, dispatch to the API, config and completions
//! - `render`: text and JSON output
//! - `styles`: terminal styles

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
