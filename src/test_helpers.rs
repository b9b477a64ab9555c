//! Shared test utilities for the sitekit test suite.
//!
//! Provides fixture loading, post builders, a canned-response [`Fetcher`], and
//! gallery directory setup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fetcher = MockFetcher::new().with_page("https://blog/1", "<div class=\"trix-content\">x</div>");
//! let store = Store::open_in_memory().unwrap();
//! store.insert_post(&post("Title", "2024-03-03", "hey", "https://blog/0")).unwrap();
//!
//! let tmp = setup_gallery_base();
//! touch_images(&tmp.path().join("2025-ff-cologne"), &["a.jpg", "b.jpg"]);
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use crate::fetch::{FetchError, Fetcher};
use crate::types::Post;

// =========================================================================
// Fixtures
// =========================================================================

/// Contents of `fixtures/<name>`.
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {e}", path.display()))
}

/// Temp base directory holding a copy of `fixtures/gallery-config.md`.
///
/// No gallery directories exist yet; use [`touch_images`] to add them.
pub fn setup_gallery_base() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("gallery-config.md"),
        fixture("gallery-config.md"),
    )
    .unwrap();
    tmp
}

/// Create empty files named `names` inside `dir`, creating `dir` first.
pub fn touch_images(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

// =========================================================================
// Builders
// =========================================================================

/// A post without a stored body.
pub fn post(title: &str, date: &str, blog_name: &str, link: &str) -> Post {
    Post {
        title: title.to_string(),
        date: date.to_string(),
        blog_name: blog_name.to_string(),
        link: link.to_string(),
        full_text: None,
    }
}

// =========================================================================
// MockFetcher
// =========================================================================

/// Fetcher serving canned pages. Unknown URLs answer with a 404 status error.
///
/// Every requested URL is recorded, in order.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
