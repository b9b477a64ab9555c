//! Shared types used across the gallery and blog pipelines.
//!
//! Nothing here holds state across runs: descriptors and feed entries live for
//! one invocation, and posts are the row shape of the store.

use serde::{Deserialize, Serialize};

/// One gallery, parsed from a line of the configuration block.
///
/// Line format: `directory: profile_image[: title[: location[: year]]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryDescriptor {
    /// Gallery directory name, relative to the base path
    pub directory: String,
    /// Image used on the master page card. `None` when the field is empty.
    pub profile_image: Option<String>,
    /// Display title (defaults to the directory name)
    pub title: String,
    /// Display location (defaults to the configured location)
    pub location: String,
    /// Display year (defaults to the directory's 4-digit prefix)
    pub year: String,
}

/// A blog post as persisted in the store.
///
/// `link` is the de-duplication key: no two rows share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// Publish date, always `YYYY-MM-DD`
    pub date: String,
    pub blog_name: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

/// An entry read from a syndication feed, before it becomes a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Published date exactly as the feed wrote it
    pub published: String,
}
