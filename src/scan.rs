//! Image discovery in gallery directories.
//!
//! A gallery directory is flat: full-size images sit directly inside it, with
//! generated variants in subdirectories that are never listed themselves.
//!
//! ```text
//! 2025-ff-cologne/
//! ├── DSC_0042.jpg        # listed
//! ├── DSC_0043.JPG        # listed
//! ├── notes.txt           # ignored: extension not allowed
//! ├── index.html          # ignored
//! ├── thumbs/             # ignored: not a regular file
//! │   └── DSC_0042.jpg
//! └── medium/
//!     └── DSC_0042.jpg
//! ```
//!
//! Extension matching is exact and case-sensitive against an allow-list, so
//! `photo.Jpg` is not an image. Results are sorted by filename. Entries that
//! cannot be read, such as dangling symlinks, are skipped with a warning.

use spdlog::warn;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions shown on gallery pages.
pub const GALLERY_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "JPG", "JPEG", "PNG", "GIF"];

/// Extensions the resizer produces variants for.
pub const RESIZE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "JPG", "JPEG"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Gallery images directly inside `dir`, sorted. A missing directory has none.
pub fn list_images(dir: &Path) -> Result<Vec<String>, ScanError> {
    list_files_with_extensions(dir, GALLERY_EXTENSIONS)
}

/// Names of regular files directly inside `dir` whose extension is one of
/// `extensions`, sorted ascending.
pub fn list_files_with_extensions(
    dir: &Path,
    extensions: &[&str],
) -> Result<Vec<String>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The directory itself is unreadable.
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if has_extension(name, extensions) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}
