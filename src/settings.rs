//! Tool settings.
//!
//! Handles loading, validating, and merging `sitekit.toml`. Stock defaults are
//! overridden by whatever the user file specifies; everything else keeps its
//! default, so a settings file only needs the keys it changes.
//!
//! ## Options
//!
//! ```toml
//! [store]
//! path = "data/blog_posts.db"
//!
//! [feed]
//! url = "https://world.hey.com/ian.mulvany/feed.atom"
//! blog_name = "hey"
//!
//! [scrape]
//! container_class = "trix-content"
//! timeout_secs = 30
//! user_agent = "sitekit/<version>"
//!
//! [archive]
//! output = "all-my-posts.html"
//! title = "Blog Posts Archive"
//!
//! [gallery]
//! config_file = "gallery-config.md"
//! cdn_base = "https://cdn.mulvany.net"
//! default_location = "Germany"
//! default_year = "2025"
//! collection_title = "Familienfest"
//! collection_subtitle = "Gallery Collection"
//! footer = "© 2025"
//!
//! [resize]
//! thumb_size = 200
//! medium_size = 1200
//! quality = 80
//!
//! [log]
//! level = "info"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default settings filename, looked up in the working directory.
pub const SETTINGS_FILE: &str = "sitekit.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Settings validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub store: StoreSettings,
    pub feed: FeedSettings,
    pub scrape: ScrapeSettings,
    pub archive: ArchiveSettings,
    pub gallery: GallerySettings,
    pub resize: ResizeSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.resize.quality == 0 || self.resize.quality > 100 {
            return Err(SettingsError::Validation(
                "resize.quality must be 1-100".into(),
            ));
        }
        if self.resize.thumb_size == 0 || self.resize.medium_size == 0 {
            return Err(SettingsError::Validation(
                "resize sizes must be non-zero".into(),
            ));
        }
        if self.feed.blog_name.trim().is_empty() {
            return Err(SettingsError::Validation(
                "feed.blog_name must not be empty".into(),
            ));
        }
        let class = &self.scrape.container_class;
        if class.is_empty()
            || !class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SettingsError::Validation(format!(
                "scrape.container_class must be a single CSS class name, got {class:?}"
            )));
        }
        if self.gallery.config_file.trim().is_empty() {
            return Err(SettingsError::Validation(
                "gallery.config_file must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Location of the posts database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/blog_posts.db"),
        }
    }
}

/// The syndication feed compared against the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedSettings {
    pub url: String,
    /// Source name stored in `blog_name`; scopes the feed diff.
    pub blog_name: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: "https://world.hey.com/ian.mulvany/feed.atom".to_string(),
            blog_name: "hey".to_string(),
        }
    }
}

/// Post-body scraping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeSettings {
    /// Class of the `div` holding the post body.
    pub container_class: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            container_class: "trix-content".to_string(),
            timeout_secs: 30,
            user_agent: concat!("sitekit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// The static "all posts" page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveSettings {
    pub output: PathBuf,
    pub title: String,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("all-my-posts.html"),
            title: "Blog Posts Archive".to_string(),
        }
    }
}

/// Gallery page generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySettings {
    /// Markdown file holding the `## Configuration` block, relative to the base path.
    pub config_file: String,
    /// Root URL images are served from; galleries live at `{cdn_base}/{directory}/`.
    pub cdn_base: String,
    pub default_location: String,
    /// Used when a directory name has no 4-digit year prefix.
    pub default_year: String,
    pub collection_title: String,
    pub collection_subtitle: String,
    pub footer: String,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            config_file: "gallery-config.md".to_string(),
            cdn_base: "https://cdn.mulvany.net".to_string(),
            default_location: "Germany".to_string(),
            default_year: "2025".to_string(),
            collection_title: "Familienfest".to_string(),
            collection_subtitle: "Gallery Collection".to_string(),
            footer: "© 2025".to_string(),
        }
    }
}

impl GallerySettings {
    /// Base URL for one gallery's images, always ending in `/`.
    pub fn gallery_base_url(&self, directory: &str) -> String {
        format!("{}/{}/", self.cdn_base.trim_end_matches('/'), directory)
    }
}

/// Thumbnail and medium variant generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeSettings {
    /// Bounding box (both edges) for `thumbs/` variants.
    pub thumb_size: u32,
    /// Bounding box (both edges) for `medium/` variants.
    pub medium_size: u32,
    /// JPEG quality (1-100).
    pub quality: u32,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            thumb_size: 200,
            medium_size: 1200,
            quality: 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub level: LogLevel,
}

// =============================================================================
// Loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a settings file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_settings(path: &Path) -> Result<Option<toml::Value>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_settings(overlay: Option<toml::Value>) -> Result<Settings, SettingsError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `path`, falling back to stock defaults when it is absent.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    resolve_settings(load_raw_settings(path)?)
}

/// Returns a fully-commented stock `sitekit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_settings_toml() -> &'static str {
    r###"# sitekit settings
# ================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Posts database
# ---------------------------------------------------------------------------
[store]
path = "data/blog_posts.db"

# ---------------------------------------------------------------------------
# Feed compared against the database
# ---------------------------------------------------------------------------
[feed]
url = "https://world.hey.com/ian.mulvany/feed.atom"
# Stored as blog_name; only rows with this name count as already present.
blog_name = "hey"

# ---------------------------------------------------------------------------
# Post body scraping
# ---------------------------------------------------------------------------
[scrape]
# Class of the <div> that holds the post body.
container_class = "trix-content"
timeout_secs = 30
# Defaults to "sitekit/<version>".
# user_agent = "sitekit"

# ---------------------------------------------------------------------------
# "All posts" archive page
# ---------------------------------------------------------------------------
[archive]
output = "all-my-posts.html"
title = "Blog Posts Archive"

# ---------------------------------------------------------------------------
# Gallery pages
# ---------------------------------------------------------------------------
[gallery]
# Markdown file with the "## Configuration" block, relative to the base path.
config_file = "gallery-config.md"
# Images are served from {cdn_base}/{directory}/ (thumbs/, medium/, full size).
cdn_base = "https://cdn.mulvany.net"
default_location = "Germany"
# Used when the directory name has no 4-digit year prefix.
default_year = "2025"
collection_title = "Familienfest"
collection_subtitle = "Gallery Collection"
footer = "© 2025"

# ---------------------------------------------------------------------------
# Thumbnail / medium variants
# ---------------------------------------------------------------------------
[resize]
# Bounding box in pixels; images are never upscaled.
thumb_size = 200
medium_size = 1200
# JPEG quality (1-100).
quality = 80

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[log]
# critical | error | warn | info | debug | trace
level = "info"
"###
}
