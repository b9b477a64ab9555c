//! Output of generated gallery documents.
//!
//! ```text
//! base/
//! ├── master-gallery.html
//! ├── 2025-ff-cologne/
//! │   └── index.html
//! └── 2024-ff-berlin/
//!     └── index.html
//! ```
//!
//! Files are overwritten unconditionally with a single write each.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GALLERY_PAGE: &str = "index.html";
pub const MASTER_PAGE: &str = "master-gallery.html";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn write_file(path: PathBuf, html: &str) -> Result<PathBuf, WriteError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, html).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write `base/directory/index.html`, creating the directory if needed.
pub fn write_gallery_page(base: &Path, directory: &str, html: &str) -> Result<PathBuf, WriteError> {
    write_file(base.join(directory).join(GALLERY_PAGE), html)
}

/// Write `base/master-gallery.html`.
pub fn write_master_page(base: &Path, html: &str) -> Result<PathBuf, WriteError> {
    write_file(base.join(MASTER_PAGE), html)
}
