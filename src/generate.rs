//! Gallery page generation.
//!
//! Reads the gallery configuration, lists each gallery's images, and renders
//! two kinds of self-contained HTML documents with inline CSS and JS:
//!
//! - **Gallery pages** (`{dir}/index.html`): header with a download-all link,
//!   a progressively loaded thumbnail grid, and a lightbox with keyboard
//!   navigation and a slideshow.
//! - **Master page** (`master-gallery.html`): one card per configured gallery,
//!   in configuration order, including galleries that have no images yet.
//!
//! ## Image URLs
//!
//! Images are never copied; pages point at the CDN, which mirrors the
//! gallery directory layout:
//!
//! ```text
//! {cdn_base}/{dir}/{file}                 # full size (lightbox download)
//! {cdn_base}/{dir}/medium/{file}          # lightbox display
//! {cdn_base}/{dir}/thumbs/{file}          # grid + master card
//! {cdn_base}/{dir}/{dir}-images.zip       # download-all archive
//! ```
//!
//! ## Data and markup
//!
//! A gallery page embeds its image list as a JSON data block
//! (`<script type="application/json" id="gallery-data">`) that the static
//! `gallery.js` reads at load time. Filenames never get spliced into script
//! source, and [`GalleryPage`] can be inspected in tests without parsing HTML.

use crate::gallery_config::{GalleryConfigError, load_gallery_config};
use crate::scan::{ScanError, list_images};
use crate::settings::Settings;
use crate::types::GalleryDescriptor;
use crate::write::{WriteError, write_gallery_page, write_master_page};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use spdlog::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] GalleryConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const GALLERY_CSS: &str = include_str!("../static/gallery.css");
const GALLERY_JS: &str = include_str!("../static/gallery.js");
const MASTER_CSS: &str = include_str!("../static/master.css");

/// Everything a gallery page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPage {
    pub directory: String,
    pub title: String,
    pub year: String,
    /// `{cdn_base}/{directory}/`, always with a trailing slash
    pub cdn_base: String,
    pub images: Vec<String>,
}

/// Payload of the embedded `gallery-data` block.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GalleryData<'a> {
    cdn_base: &'a str,
    images: &'a [String],
}

impl GalleryPage {
    /// `None` when there are no images to show.
    pub fn new(descriptor: &GalleryDescriptor, images: Vec<String>, settings: &Settings) -> Option<Self> {
        if images.is_empty() {
            return None;
        }
        Some(Self {
            directory: descriptor.directory.clone(),
            title: descriptor.title.clone(),
            year: descriptor.year.clone(),
            cdn_base: settings.gallery.gallery_base_url(&descriptor.directory),
            images,
        })
    }

    pub fn download_url(&self) -> String {
        format!("{}{}-images.zip", self.cdn_base, self.directory)
    }

    /// JSON for the data block, safe to place inside a `<script>` element.
    pub fn data_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(&GalleryData {
            cdn_base: &self.cdn_base,
            images: &self.images,
        })?;
        Ok(json.replace('<', "\\u003c"))
    }
}

/// One card on the master page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterCard {
    pub descriptor: GalleryDescriptor,
    pub image_count: usize,
    /// Thumbnail URL; `None` when the gallery has no images.
    pub thumbnail: Option<String>,
}

impl MasterCard {
    pub fn new(descriptor: &GalleryDescriptor, images: &[String], settings: &Settings) -> Self {
        let thumbnail = images.first().map(|first| {
            let file = descriptor.profile_image.as_deref().unwrap_or(first);
            format!(
                "{}thumbs/{}",
                settings.gallery.gallery_base_url(&descriptor.directory),
                file
            )
        });
        Self {
            descriptor: descriptor.clone(),
            image_count: images.len(),
            thumbnail,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryStatus {
    Written { path: PathBuf, images: usize },
    /// No images found; no page written.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryOutcome {
    pub directory: String,
    pub title: String,
    pub status: GalleryStatus,
}

/// What [`build_galleries`] produced, for CLI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub config_path: PathBuf,
    pub galleries: Vec<GalleryOutcome>,
    pub master_path: PathBuf,
}

/// Generate every gallery page and the master page under `base`.
///
/// Fails if the configuration file is missing or lists no galleries.
/// Galleries without images are skipped with a warning but still get a
/// "Coming soon" card on the master page.
pub fn build_galleries(base: &Path, settings: &Settings) -> Result<BuildReport, GenerateError> {
    let config_path = base.join(&settings.gallery.config_file);
    info!("Reading configuration from: {}", config_path.display());
    let descriptors = load_gallery_config(&config_path, &settings.gallery)?;
    info!("Found {} galleries in configuration", descriptors.len());

    let mut outcomes = Vec::with_capacity(descriptors.len());
    let mut cards = Vec::with_capacity(descriptors.len());

    for descriptor in &descriptors {
        let images = list_images(&base.join(&descriptor.directory))?;
        let count = images.len();
        cards.push(MasterCard::new(descriptor, &images, settings));

        let status = match render_gallery_page(descriptor, images, settings)? {
            Some(markup) => {
                let path = write_gallery_page(base, &descriptor.directory, &markup.into_string())?;
                info!("Generated: {}", path.display());
                GalleryStatus::Written {
                    path,
                    images: count,
                }
            }
            None => {
                warn!("No images found in {}", descriptor.directory);
                GalleryStatus::Skipped
            }
        };

        outcomes.push(GalleryOutcome {
            directory: descriptor.directory.clone(),
            title: descriptor.title.clone(),
            status,
        });
    }

    let master = render_master_page(&cards, settings);
    let master_path = write_master_page(base, &master.into_string())?;
    info!("Generated: {}", master_path.display());

    Ok(BuildReport {
        config_path,
        galleries: outcomes,
        master_path,
    })
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
pub(crate) fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

fn lightbox() -> Markup {
    html! {
        div.lightbox id="lightbox" {
            button.lightbox-close id="lightbox-close" aria-label="Schließen" { "×" }
            button.lightbox-nav.lightbox-prev id="lightbox-prev" aria-label="Zurück" { "‹" }
            div.lightbox-content {
                img id="lightbox-img" src="" alt="";
            }
            button.lightbox-nav.lightbox-next id="lightbox-next" aria-label="Weiter" { "›" }
            a.lightbox-download id="lightbox-download" href="" download { "Herunterladen" }
            button.slideshow-btn id="slideshow-btn" { "Diashow abspielen" }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one gallery page. `None` when `images` is empty.
pub fn render_gallery_page(
    descriptor: &GalleryDescriptor,
    images: Vec<String>,
    settings: &Settings,
) -> Result<Option<Markup>, serde_json::Error> {
    match GalleryPage::new(descriptor, images, settings) {
        Some(page) => render_gallery(&page).map(Some),
        None => Ok(None),
    }
}

fn render_gallery(page: &GalleryPage) -> Result<Markup, serde_json::Error> {
    let data = page.data_json()?;

    let content = html! {
        header {
            h1 { (page.title) }
            p { "Fotogalerie" }
            a.download-btn href=(page.download_url()) download { "Alle Bilder herunterladen" }
        }

        div.gallery id="gallery" {}

        div.load-more-container id="load-more-container" {
            div.loader {}
        }

        (lightbox())

        footer {
            p { "© " (page.year) " " (page.title) " Gallery" }
        }

        script type="application/json" id="gallery-data" { (PreEscaped(data)) }
        script { (PreEscaped(GALLERY_JS)) }
    };

    Ok(base_document(&format!("{} Gallery", page.title), GALLERY_CSS, content))
}

/// Renders the master page listing every gallery card in order.
pub fn render_master_page(cards: &[MasterCard], settings: &Settings) -> Markup {
    let gallery = &settings.gallery;

    let content = html! {
        header {
            h1 { (gallery.collection_title) }
            p.subtitle { (gallery.collection_subtitle) }
        }
        main {
            div.galleries-list {
                @for card in cards {
                    (render_card(card))
                }
            }
        }
        footer {
            p { (gallery.footer) }
        }
    };

    base_document(
        &format!("{} Galleries", gallery.collection_title),
        MASTER_CSS,
        content,
    )
}

fn render_card(card: &MasterCard) -> Markup {
    let d = &card.descriptor;
    html! {
        a.gallery-link href={ (d.directory) "/index.html" } {
            div.gallery-main {
                @if let Some(src) = &card.thumbnail {
                    img.gallery-icon src=(src) alt=(d.title);
                } @else {
                    span.gallery-icon.placeholder { "📸" }
                }
                div.gallery-details {
                    h2 { (d.title) }
                    p.gallery-location-year { (d.location) " · " (d.year) }
                }
            }
            div.gallery-meta {
                @if card.image_count > 0 {
                    span.status-badge.available { (card.image_count) " photos" }
                } @else {
                    span.status-badge.soon { "Coming soon" }
                }
                span.arrow { "→" }
            }
        }
    }
}
