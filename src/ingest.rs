//! Insert feed entries that are missing from the store.
//!
//! For each entry, in feed order:
//!
//! 1. Normalise the published date. An unparseable date is recorded as an
//!    [`IngestFailure::Date`] and the entry is skipped before any request is
//!    made.
//! 2. Fetch the post page and extract its body (see [`fetch_post_content`]).
//!    Fetch problems never stop an entry: the body becomes placeholder markup.
//! 3. Insert the post. A store error is recorded as
//!    [`IngestFailure::Store`] and the batch moves on.
//!
//! A dry run normalises dates (so bad ones are still reported) but neither
//! fetches nor writes.

use crate::dates::{DateError, normalize_date};
use crate::fetch::{Fetcher, fetch_post_content};
use crate::settings::Settings;
use crate::store::{Store, StoreError};
use crate::types::{FeedEntry, Post};
use spdlog::{error, info};

#[derive(Debug)]
pub enum IngestFailure {
    Date {
        title: String,
        link: String,
        error: DateError,
    },
    Store {
        title: String,
        link: String,
        error: StoreError,
    },
}

impl IngestFailure {
    pub fn link(&self) -> &str {
        match self {
            IngestFailure::Date { link, .. } | IngestFailure::Store { link, .. } => link,
        }
    }
}

/// A post that was (or in a dry run, would be) inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedPost {
    pub title: String,
    pub date: String,
    pub link: String,
    /// `false` when the body is placeholder markup
    pub content_found: bool,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub dry_run: bool,
    pub inserted: Vec<IngestedPost>,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn date_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| matches!(f, IngestFailure::Date { .. }))
            .count()
    }
}

/// Fetch and insert every entry, collecting per-entry outcomes.
pub fn ingest_missing(
    entries: &[FeedEntry],
    store: &Store,
    fetcher: &dyn Fetcher,
    settings: &Settings,
    dry_run: bool,
) -> IngestReport {
    let mut report = IngestReport {
        dry_run,
        ..Default::default()
    };

    for entry in entries {
        let date = match normalize_date(&entry.published) {
            Ok(date) => date,
            Err(e) => {
                error!("Skipping \"{}\" ({}): {}", entry.title, entry.link, e);
                report.failures.push(IngestFailure::Date {
                    title: entry.title.clone(),
                    link: entry.link.clone(),
                    error: e,
                });
                continue;
            }
        };

        if dry_run {
            info!("Dry run: would insert \"{}\" ({})", entry.title, date);
            report.inserted.push(IngestedPost {
                title: entry.title.clone(),
                date,
                link: entry.link.clone(),
                content_found: false,
            });
            continue;
        }

        info!("Fetching content for post: {}", entry.title);
        let content = fetch_post_content(fetcher, &entry.link, &settings.scrape.container_class);
        let content_found = content.is_found();

        let post = Post {
            title: entry.title.clone(),
            date: date.clone(),
            blog_name: settings.feed.blog_name.clone(),
            link: entry.link.clone(),
            full_text: Some(content.into_body()),
        };

        match store.insert_post(&post) {
            Ok(()) => {
                info!("Post inserted into database: {}", entry.title);
                report.inserted.push(IngestedPost {
                    title: post.title,
                    date,
                    link: post.link,
                    content_found,
                });
            }
            Err(e) => {
                error!("Error inserting post into database: {}", e);
                report.failures.push(IngestFailure::Store {
                    title: post.title,
                    link: post.link,
                    error: e,
                });
            }
        }
    }

    report
}
