//! # Data Directory and Context Setup
//!
//! Everything the site stores lives in one data directory: the collection
//! files, `okul.toml`, and (by default) uploaded media.
//!
//! ## Resolution Order
//!
//! [`resolve_data_dir`] picks the first that applies:
//!
//! 1. An explicit override (the CLI's `--data` flag).
//! 2. The `OKUL_DATA` environment variable.
//! 3. `.okul/` in the current directory, if it exists.
//! 4. The OS-appropriate data directory (via the `directories` crate).
//!
//! [`initialize`] then loads the configuration from that directory and wires
//! the file store, the media host, the session and the renderer into a
//! [`SiteApi`].

use crate::api::SiteApi;
use crate::config::{SiteConfig, CONFIG_FILE};
use crate::error::{Result, SiteError};
use crate::media::fs::FsMedia;
use crate::render::PageRenderer;
use crate::session::{AdminUser, SessionContext};
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_ENV: &str = "OKUL_DATA";
pub const LOCAL_DATA_DIR: &str = ".okul";

pub struct SiteContext {
    pub api: SiteApi<FileStore, FsMedia>,
    pub config: SiteConfig,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(cwd: &Path, data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let local = cwd.join(LOCAL_DATA_DIR);
    if local.is_dir() {
        return Ok(local);
    }
    ProjectDirs::from("com", "okul", "okul")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SiteError::Api("Could not determine a data directory".to_string()))
}

/// Loads `okul.toml` from `data_dir`. A missing or unreadable file yields defaults.
pub fn load_config(data_dir: &Path) -> SiteConfig {
    Clapfig::builder()
        .app_name("okul")
        .file_name(CONFIG_FILE)
        .search_paths(vec![SearchPath::Path(data_dir.to_path_buf())])
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, dir = %data_dir.display(), "config load failed, using defaults");
            SiteConfig::default()
        })
}

/// Builds the site context for `cwd`.
///
/// The session is signed in as `admin_email` unless that setting is empty.
pub fn initialize(cwd: &Path, data_override: Option<PathBuf>) -> Result<SiteContext> {
    let data_dir = resolve_data_dir(cwd, data_override)?;
    let config = load_config(&data_dir);
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let store = FileStore::open(data_dir.clone());
    let media = FsMedia::new(config.media_dir(&data_dir), config.media_base_url.clone());
    let session = match config.admin_email() {
        Some(email) => SessionContext::signed_in(AdminUser::new(email)),
        None => SessionContext::new(),
    };
    let renderer = PageRenderer::new(config.site_name.clone());
    let api = SiteApi::new(store, media, session, renderer);

    Ok(SiteContext {
        api,
        config,
        data_dir,
    })
}
