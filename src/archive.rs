//! The "all my posts" archive page.
//!
//! Every stored post, newest first, grouped under month headings:
//!
//! ```text
//! Blog Posts Archive
//! Last Updated: 2024-03-05
//!
//! March 2024                      <h2 class="month-heading" id="March_2024">
//!   2024-03-03  Notes on a quiet week  — hey
//!   2024-03-01  Another post           — hey
//! February 2024
//!   2024-02-20  Reading list & links   — hey
//! ```

use crate::generate::base_document;
use crate::store::{Store, StoreError};
use crate::types::Post;
use chrono::NaiveDate;
use maud::{Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

const ARCHIVE_CSS: &str = include_str!("../static/archive.css");

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Post {link} has unparseable date {date:?}")]
    Date { link: String, date: String },
}

/// Posts sharing one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    /// e.g. `March 2024`
    pub label: String,
    /// Label with spaces replaced by underscores, e.g. `March_2024`
    pub anchor: String,
    pub posts: Vec<Post>,
}

/// Group posts by month of their `YYYY-MM-DD` date.
///
/// Groups appear in the order their month is first seen; posts keep their
/// input order within a group.
pub fn group_by_month(posts: Vec<Post>) -> Result<Vec<MonthGroup>, ArchiveError> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for post in posts {
        let date = NaiveDate::parse_from_str(&post.date, "%Y-%m-%d").map_err(|_| {
            ArchiveError::Date {
                link: post.link.clone(),
                date: post.date.clone(),
            }
        })?;
        let label = date.format("%B %Y").to_string();

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.posts.push(post),
            None => groups.push(MonthGroup {
                anchor: label.replace(' ', "_"),
                label,
                posts: vec![post],
            }),
        }
    }

    Ok(groups)
}

pub fn render_archive(groups: &[MonthGroup], title: &str, today: NaiveDate) -> Markup {
    let content = html! {
        h1 { (title) }
        div.last-updated { "Last Updated: " (today.format("%Y-%m-%d").to_string()) }
        @for group in groups {
            h2.month-heading id=(group.anchor) { (group.label) }
            ul.post-list {
                @for post in &group.posts {
                    li.post-item {
                        span.post-date { (post.date) }
                        a.post-title href=(post.link) { (post.title) }
                        span.post-blog { "— " (post.blog_name) }
                    }
                }
            }
        }
    };

    base_document(title, ARCHIVE_CSS, content)
}

/// Summary of a written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub posts: usize,
    pub months: usize,
}

/// Render every stored post into `output`.
pub fn write_archive(
    store: &Store,
    output: &Path,
    title: &str,
    today: NaiveDate,
) -> Result<ArchiveSummary, ArchiveError> {
    let posts = store.all_posts_desc()?;
    let count = posts.len();
    let groups = group_by_month(posts)?;
    let html = render_archive(&groups, title, today);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, html.into_string())?;

    Ok(ArchiveSummary {
        posts: count,
        months: groups.len(),
    })
}
