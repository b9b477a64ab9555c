//! Syndication feed parsing and diffing against the store.
//!
//! [`parse_feed`] reads both Atom and RSS 2.0 with one pass of `quick-xml`
//! events, keyed on local names so namespace prefixes don't matter:
//!
//! | Field | Atom | RSS 2.0 |
//! |-------|------|---------|
//! | container | `<entry>` | `<item>` |
//! | title | `<title>` | `<title>` |
//! | link | `<link href>` (rel `alternate` or no rel preferred) | `<link>` text |
//! | published | `<published>`, else `<updated>` | `<pubDate>` / `<dc:date>` |
//!
//! The published date is kept exactly as written; normalising it is the
//! ingest step's job. Entries without any link are dropped since the link is
//! the identity of a post.

use crate::fetch::{FetchError, Fetcher};
use crate::store::{Store, StoreError};
use crate::types::FeedEntry;
use quick_xml::events::{BytesStart, Event};
use spdlog::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Feed fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Link,
    Published,
    Updated,
}

#[derive(Default)]
struct PartialEntry {
    title: String,
    preferred_link: Option<String>,
    other_link: Option<String>,
    text_link: String,
    published: String,
    updated: String,
}

impl PartialEntry {
    fn finish(self) -> Option<FeedEntry> {
        let text_link = Some(self.text_link.trim().to_string()).filter(|l| !l.is_empty());
        let link = self.preferred_link.or(text_link).or(self.other_link)?;
        let published = if self.published.trim().is_empty() {
            self.updated
        } else {
            self.published
        };
        Some(FeedEntry {
            title: self.title.trim().to_string(),
            link,
            published: published.trim().to_string(),
        })
    }

    /// Record an Atom `<link href=...>` element.
    fn add_link(&mut self, e: &BytesStart) -> Result<(), quick_xml::Error> {
        let mut href = None;
        let mut rel = None;
        for attr in e.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"href" => href = Some(attr.unescape_value()?.into_owned()),
                b"rel" => rel = Some(attr.unescape_value()?.into_owned()),
                _ => {}
            }
        }
        let Some(href) = href else {
            return Ok(());
        };
        let preferred = matches!(rel.as_deref(), None | Some("alternate"));
        if preferred && self.preferred_link.is_none() {
            self.preferred_link = Some(href);
        } else if self.other_link.is_none() {
            self.other_link = Some(href);
        }
        Ok(())
    }
}

fn is_entry(name: &[u8]) -> bool {
    name == b"entry" || name == b"item"
}

fn field_for(name: &[u8]) -> Field {
    match name {
        b"title" => Field::Title,
        b"link" => Field::Link,
        b"published" | b"pubDate" | b"date" => Field::Published,
        b"updated" => Field::Updated,
        _ => Field::None,
    }
}

/// Parse an Atom or RSS document into entries, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = quick_xml::Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<PartialEntry> = None;
    let mut field = Field::None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name();
                if is_entry(name.as_ref()) {
                    current = Some(PartialEntry::default());
                    field = Field::None;
                } else if let Some(entry) = current.as_mut() {
                    field = field_for(name.as_ref());
                    if field == Field::Link && e.try_get_attribute("href").ok().flatten().is_some()
                    {
                        entry.add_link(&e)?;
                        field = Field::None;
                    }
                    // Titles of nested elements (e.g. Atom <source>) don't override.
                    if field == Field::Title && !entry.title.is_empty() {
                        field = Field::None;
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(entry) = current.as_mut() {
                    if e.local_name().as_ref() == b"link" {
                        entry.add_link(&e)?;
                    }
                }
            }
            Event::Text(te) => {
                if let Some(entry) = current.as_mut() {
                    push_field(entry, field, &te.unescape()?);
                }
            }
            Event::CData(cd) => {
                if let Some(entry) = current.as_mut() {
                    push_field(entry, field, &String::from_utf8_lossy(&cd.into_inner()));
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if is_entry(name.as_ref()) {
                    if let Some(entry) = current.take() {
                        match entry.finish() {
                            Some(done) => entries.push(done),
                            None => debug!("Dropping feed entry without a link"),
                        }
                    }
                }
                field = Field::None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

fn push_field(entry: &mut PartialEntry, field: Field, text: &str) {
    match field {
        Field::Title => entry.title.push_str(text),
        Field::Link => entry.text_link.push_str(text),
        Field::Published => entry.published.push_str(text),
        Field::Updated => entry.updated.push_str(text),
        Field::None => {}
    }
}

/// Download and parse a feed.
pub fn fetch_feed(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let xml = fetcher.get(url)?;
    parse_feed(&xml)
}

/// Feed entries whose link is not yet stored, in feed order.
///
/// Links stored under `blog_name` are checked in one query. Anything else is
/// looked up individually, so a link already stored under another source is
/// not missing either: the store would refuse it.
pub fn missing_entries(
    entries: &[FeedEntry],
    store: &Store,
    blog_name: &str,
) -> Result<Vec<FeedEntry>, FeedError> {
    let known = store.links_for_source(blog_name)?;
    let mut missing = Vec::new();
    for entry in entries {
        if known.contains(&entry.link) {
            continue;
        }
        if store.contains_link(&entry.link)? {
            debug!("{} is already stored under another source", entry.link);
            continue;
        }
        missing.push(entry.clone());
    }
    Ok(missing)
}
