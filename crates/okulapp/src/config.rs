//! # Configuration
//!
//! Site configuration is managed by [`clapfig`], which loads `okul.toml` from
//! the data directory and layers `OKUL__*` environment variables on top.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `site_name` | `Okulumuz` | Used in page titles when a page has no meta title |
//! | `media_base_url` | `/uploads` | URL prefix under which uploaded media is served |
//! | `media_dir` | `<data>/uploads` | Where uploaded media files are written |
//! | `admin_email` | `admin@localhost` | Admin the CLI signs in as; empty disables writes |
//!
//! ## CLI Usage
//!
//! - `okul config`: Show all configuration values.
//! - `okul config get <key>`: Get a specific value.
//! - `okul config set <key> <value>`: Set a value.
//! - `okul config gen`: Generate a sample `okul.toml`.

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "okul.toml";

/// Configuration for the site, stored in `okul.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// School name shown in page titles and descriptions
    #[config(default = "Okulumuz")]
    pub site_name: String,

    /// URL prefix for uploaded media (e.g. "/uploads" or "https://cdn.example.com")
    #[config(default = "/uploads")]
    pub media_base_url: String,

    /// Directory for uploaded media. When absent, "uploads" inside the data directory.
    pub media_dir: Option<String>,

    /// Admin account used for write operations. Empty means signed out.
    #[config(default = "admin@localhost")]
    pub admin_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Okulumuz".to_string(),
            media_base_url: "/uploads".to_string(),
            media_dir: None,
            admin_email: "admin@localhost".to_string(),
        }
    }
}

impl SiteConfig {
    /// Resolved media directory; relative paths are taken from the data directory.
    pub fn media_dir(&self, data_dir: &Path) -> PathBuf {
        match self.media_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() {
                    dir
                } else {
                    data_dir.join(dir)
                }
            }
            _ => data_dir.join("uploads"),
        }
    }

    pub fn admin_email(&self) -> Option<&str> {
        Some(self.admin_email.trim()).filter(|e| !e.is_empty())
    }
}
