//! Gallery configuration parsing.
//!
//! The gallery list lives in a markdown document (by default
//! `gallery-config.md` in the base path) under a `## Configuration` heading,
//! as a fenced block with one gallery per line:
//!
//! ~~~text
//! ## Configuration
//!
//! ```
//! 2025-ff-cologne: DSC_0042.jpg: Familienfest Köln: Köln: 2025
//! 2024-ff-berlin: : Familienfest Berlin
//! 2023-ff-hamburg: cover.jpg
//! ```
//! ~~~
//!
//! Fields are positional and colon-separated:
//! `directory: profile_image[: title[: location[: year]]]`.
//!
//! - Lines without a colon are skipped.
//! - An empty profile image means "use the first image of the gallery".
//! - Missing or empty title falls back to the directory name.
//! - Missing or empty location falls back to the configured default.
//! - Missing or empty year falls back to the directory's 4-digit prefix
//!   (`2025-ff-cologne` → `2025`), then to the configured default.
//!
//! A document without the heading or without a fence directly after it parses
//! to an empty list. That is not an error here; [`load_gallery_config`] is
//! where an empty list becomes fatal.

use crate::settings::GallerySettings;
use crate::types::GalleryDescriptor;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use spdlog::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SECTION_HEADING: &str = "Configuration";

#[derive(Error, Debug)]
pub enum GalleryConfigError {
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No galleries found in configuration {0}")]
    NoGalleries(PathBuf),
}

/// Read and parse the gallery configuration file.
///
/// Fails when the file is missing or when it yields no galleries.
pub fn load_gallery_config(
    path: &Path,
    defaults: &GallerySettings,
) -> Result<Vec<GalleryDescriptor>, GalleryConfigError> {
    if !path.is_file() {
        return Err(GalleryConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let galleries = parse_gallery_config(&content, defaults);
    if galleries.is_empty() {
        return Err(GalleryConfigError::NoGalleries(path.to_path_buf()));
    }
    Ok(galleries)
}

/// Parse every gallery line of the configuration block, in document order.
pub fn parse_gallery_config(text: &str, defaults: &GallerySettings) -> Vec<GalleryDescriptor> {
    let Some(block) = extract_config_block(text) else {
        return Vec::new();
    };

    block
        .lines()
        .filter_map(|line| {
            let parsed = parse_line(line, defaults);
            if parsed.is_none() && !line.trim().is_empty() {
                debug!("Skipping configuration line without gallery: {:?}", line);
            }
            parsed
        })
        .collect()
}

/// Return the interior of the fenced block that directly follows the
/// `## Configuration` heading.
fn extract_config_block(text: &str) -> Option<String> {
    let mut events = Parser::new(text);

    while let Some(event) = events.next() {
        let Event::Start(Tag::Heading {
            level: HeadingLevel::H2,
            ..
        }) = event
        else {
            continue;
        };

        let mut heading = String::new();
        for event in events.by_ref() {
            match event {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => heading.push_str(&t),
                _ => {}
            }
        }
        if heading.trim() != SECTION_HEADING {
            continue;
        }

        if !matches!(
            events.next(),
            Some(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))))
        ) {
            continue;
        }

        let mut block = String::new();
        for event in events.by_ref() {
            match event {
                Event::End(TagEnd::CodeBlock) => break,
                Event::Text(t) => block.push_str(&t),
                _ => {}
            }
        }
        return Some(block);
    }

    None
}

fn parse_line(line: &str, defaults: &GallerySettings) -> Option<GalleryDescriptor> {
    if !line.contains(':') {
        return None;
    }

    let parts: Vec<&str> = line.split(':').map(str::trim).collect();
    let directory = parts[0];
    if directory.is_empty() {
        return None;
    }

    let field = |idx: usize| parts.get(idx).copied().filter(|p| !p.is_empty());

    Some(GalleryDescriptor {
        directory: directory.to_string(),
        profile_image: field(1).map(str::to_string),
        title: field(2).unwrap_or(directory).to_string(),
        location: field(3)
            .unwrap_or(defaults.default_location.as_str())
            .to_string(),
        year: field(4)
            .map(str::to_string)
            .unwrap_or_else(|| extract_year(directory, &defaults.default_year)),
    })
}

/// Extract a leading 4-digit year from a directory name.
///
/// `2025-ff-cologne` → `2025`; anything else → `fallback`.
pub fn extract_year(directory: &str, fallback: &str) -> String {
    let prefix: String = directory.chars().take(4).collect();
    if prefix.len() == 4 && prefix.chars().all(|c| c.is_ascii_digit()) {
        prefix
    } else {
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn defaults() -> GallerySettings {
        GallerySettings::default()
    }

    const SAMPLE: &str = "# Galleries\n\
\n\
Some notes about the galleries.\n\
\n\
## Configuration\n\
\n\
```\n\
2025-ff-cologne: DSC_0042.jpg: Familienfest Köln: Köln: 2025\n\
2024-ff-berlin: : Familienfest Berlin\n\
\n\
this line has no colon\n\
summer-party: cover.jpg\n\
```\n\
\n\
## Notes\n\
\n\
```\n\
ignored: entry\n\
```\n";

    #[test]
    fn parses_all_positional_fields() {
        let galleries = parse_gallery_config(SAMPLE, &defaults());
        assert_eq!(
            galleries[0],
            GalleryDescriptor {
                directory: "2025-ff-cologne".to_string(),
                profile_image: Some("DSC_0042.jpg".to_string()),
                title: "Familienfest Köln".to_string(),
                location: "Köln".to_string(),
                year: "2025".to_string(),
            }
        );
    }

    #[test]
    fn missing_fields_fall_back() {
        let galleries = parse_gallery_config(SAMPLE, &defaults());

        let berlin = &galleries[1];
        assert_eq!(berlin.profile_image, None);
        assert_eq!(berlin.title, "Familienfest Berlin");
        assert_eq!(berlin.location, "Germany");
        assert_eq!(berlin.year, "2024");

        let party = &galleries[2];
        assert_eq!(party.profile_image.as_deref(), Some("cover.jpg"));
        assert_eq!(party.title, "summer-party");
        assert_eq!(party.year, "2025");
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let galleries = parse_gallery_config(SAMPLE, &defaults());
        let dirs: Vec<&str> = galleries.iter().map(|g| g.directory.as_str()).collect();
        assert_eq!(dirs, vec!["2025-ff-cologne", "2024-ff-berlin", "summer-party"]);
    }

    #[test]
    fn only_the_configuration_section_is_read() {
        let galleries = parse_gallery_config(SAMPLE, &defaults());
        assert!(galleries.iter().all(|g| g.directory != "ignored"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_gallery_config(SAMPLE, &defaults());
        let second = parse_gallery_config(SAMPLE, &defaults());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_heading_yields_empty() {
        let text = "# Galleries\n\n```\n2025-a: b.jpg\n```\n";
        assert!(parse_gallery_config(text, &defaults()).is_empty());
    }

    #[test]
    fn heading_without_fence_yields_empty() {
        let text = "## Configuration\n\n2025-a: b.jpg\n";
        assert!(parse_gallery_config(text, &defaults()).is_empty());
    }

    #[test]
    fn deeper_heading_does_not_count() {
        let text = "### Configuration\n\n```\n2025-a: b.jpg\n```\n";
        assert!(parse_gallery_config(text, &defaults()).is_empty());
    }

    #[test]
    fn fence_with_info_string_accepted() {
        let text = "## Configuration\n```text\n2025-a: b.jpg\n```\n";
        let galleries = parse_gallery_config(text, &defaults());
        assert_eq!(galleries.len(), 1);
        assert_eq!(galleries[0].directory, "2025-a");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let text = "## Configuration\n```\nd: p.jpg: T: L: 1999: extra\n```\n";
        let g = &parse_gallery_config(text, &defaults())[0];
        assert_eq!(g.year, "1999");
        assert_eq!(g.location, "L");
    }

    #[test]
    fn custom_defaults_are_used() {
        let mut d = defaults();
        d.default_location = "Ireland".to_string();
        d.default_year = "2019".to_string();
        let text = "## Configuration\n```\nparty: p.jpg\n```\n";
        let g = &parse_gallery_config(text, &d)[0];
        assert_eq!(g.location, "Ireland");
        assert_eq!(g.year, "2019");
    }

    #[test]
    fn extract_year_from_prefix() {
        assert_eq!(extract_year("2025-ff-cologne", "2000"), "2025");
        assert_eq!(extract_year("1999", "2000"), "1999");
        assert_eq!(extract_year("ff-2025", "2000"), "2000");
        assert_eq!(extract_year("202", "2000"), "2000");
    }

    #[test]
    fn load_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_gallery_config(&tmp.path().join("gallery-config.md"), &defaults());
        assert!(matches!(result, Err(GalleryConfigError::NotFound(_))));
    }

    #[test]
    fn load_empty_configuration_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery-config.md");
        fs::write(&path, "# Nothing configured yet\n").unwrap();
        let result = load_gallery_config(&path, &defaults());
        assert!(matches!(result, Err(GalleryConfigError::NoGalleries(_))));
    }

    #[test]
    fn load_reads_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/gallery-config.md");
        let galleries = load_gallery_config(&path, &defaults()).unwrap();
        assert_eq!(galleries.len(), 3);
    }
}
