//! CLI output formatting for every subcommand.
//!
//! Diagnostics (warnings, per-request progress) go through the logger; the
//! lines here are the report a user reads once a command finishes, plus the
//! live progress of `resize`.
//!
//! # Output Format
//!
//! ## Galleries
//!
//! ```text
//! Config: ./gallery-config.md
//! 001 Familienfest Köln (12 photos) → 2025-ff-cologne/index.html
//! 002 Familienfest Berlin → skipped, no images
//!
//! Master → master-gallery.html
//! Generated 1 of 2 galleries
//! ```
//!
//! ## Resize
//!
//! ```text
//! [1/3] DSC_0042.jpg
//!     thumbs: 200x150
//!     medium: 1200x900
//! [2/3] DSC_0043.jpg
//!     skipped, variants exist
//!
//! Processed: 1  Skipped: 1  Failed: 1  Total: 3
//! ```
//!
//! ## Missing posts / ingest
//!
//! ```text
//! Post not found in database: Title - 2024-03-03T10:15:00Z - https://…
//! 2 missing posts
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::archive::ArchiveSummary;
use crate::generate::{BuildReport, GalleryStatus};
use crate::imaging::{ResizeEvent, ResizeSummary};
use crate::ingest::{IngestFailure, IngestReport};
use crate::types::FeedEntry;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to `base` with forward slashes, or the full path if it
/// lies elsewhere.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// Galleries
// ============================================================================

pub fn format_build_report(report: &BuildReport, base: &Path) -> Vec<String> {
    let mut lines = vec![format!("Config: {}", report.config_path.display())];
    let mut written = 0;

    for (i, gallery) in report.galleries.iter().enumerate() {
        let header = format!("{} {}", format_index(i + 1), gallery.title);
        match &gallery.status {
            GalleryStatus::Written { path, images } => {
                written += 1;
                lines.push(format!(
                    "{} ({}) \u{2192} {}",
                    header,
                    plural(*images, "photo", "photos"),
                    relative_display(path, base)
                ));
            }
            GalleryStatus::Skipped => {
                lines.push(format!("{} \u{2192} skipped, no images", header));
                lines.push(format!("{}Directory: {}/", indent(1), gallery.directory));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Master \u{2192} {}",
        relative_display(&report.master_path, base)
    ));
    lines.push(format!(
        "Generated {} of {}",
        written,
        plural(report.galleries.len(), "gallery", "galleries")
    ));
    lines
}

pub fn print_build_report(report: &BuildReport, base: &Path) {
    for line in format_build_report(report, base) {
        println!("{}", line);
    }
}

// ============================================================================
// Resize
// ============================================================================

/// Format a single resize progress event as display lines.
pub fn format_resize_event(event: &ResizeEvent) -> Vec<String> {
    match event {
        ResizeEvent::Started {
            index,
            total,
            filename,
        } => vec![format!("[{}/{}] {}", index, total, filename)],
        ResizeEvent::Skipped { .. } => {
            vec![format!("{}skipped, variants exist", indent(1))]
        }
        ResizeEvent::VariantCreated {
            kind,
            width,
            height,
            ..
        } => vec![format!(
            "{}{}: {}x{}",
            indent(1),
            kind.dir_name(),
            width,
            height
        )],
        ResizeEvent::Failed { error, .. } => {
            vec![format!("{}failed: {}", indent(1), error)]
        }
    }
}

pub fn format_resize_summary(summary: &ResizeSummary) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Processed: {}  Skipped: {}  Failed: {}  Total: {}",
            summary.processed, summary.skipped, summary.failed, summary.total
        ),
    ]
}

pub fn print_resize_summary(summary: &ResizeSummary) {
    for line in format_resize_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Missing posts
// ============================================================================

pub fn format_missing_posts(entries: &[FeedEntry]) -> Vec<String> {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "Post not found in database: {} - {} - {}",
                e.title, e.published, e.link
            )
        })
        .collect();
    lines.push(plural(entries.len(), "missing post", "missing posts"));
    lines
}

/// Missing entries as a pretty JSON array of `{title, link, published}`.
pub fn missing_posts_json(entries: &[FeedEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

pub fn print_missing_posts(entries: &[FeedEntry]) {
    for line in format_missing_posts(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Ingest
// ============================================================================

pub fn format_ingest_report(report: &IngestReport) -> Vec<String> {
    let mut lines = Vec::new();
    let verb = if report.dry_run {
        "Would insert"
    } else {
        "Inserted"
    };

    for post in &report.inserted {
        lines.push(format!("{}: {} ({})", verb, post.title, post.date));
        if !report.dry_run && !post.content_found {
            lines.push(format!("{}content unavailable, placeholder stored", indent(1)));
        }
    }

    for failure in &report.failures {
        match failure {
            IngestFailure::Date { title, error, .. } => {
                lines.push(format!("Skipped: {} ({})", title, error));
            }
            IngestFailure::Store { title, error, .. } => {
                lines.push(format!("Failed: {} ({})", title, error));
            }
        }
        lines.push(format!("{}Link: {}", indent(1), failure.link()));
    }

    let total = if report.dry_run {
        format!(
            "Dry run: {} would be inserted",
            plural(report.inserted.len(), "post", "posts")
        )
    } else {
        format!("Inserted {}", plural(report.inserted.len(), "post", "posts"))
    };
    if report.failures.is_empty() {
        lines.push(total);
    } else {
        lines.push(format!("{}, {} failed", total, report.failures.len()));
    }
    lines
}

pub fn print_ingest_report(report: &IngestReport) {
    for line in format_ingest_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Archive
// ============================================================================

pub fn format_archive_summary(summary: &ArchiveSummary, output: &Path) -> Vec<String> {
    vec![format!(
        "Archive \u{2192} {} ({} in {})",
        output.display(),
        plural(summary.posts, "post", "posts"),
        plural(summary.months, "month", "months")
    )]
}

pub fn print_archive_summary(summary: &ArchiveSummary, output: &Path) {
    for line in format_archive_summary(summary, output) {
        println!("{}", line);
    }
}
