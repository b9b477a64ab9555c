//! # sitekit
//!
//! Small, independent build utilities for a personal static website: photo
//! galleries from a markdown configuration file, resized image variants, and a
//! blog archive fed from an Atom/RSS feed into a local SQLite store.
//!
//! # Pipelines
//!
//! ```text
//! Galleries  gallery-config.md → descriptors → image sets → HTML pages
//! Resize     photos/*.jpg      → thumbs/ + medium/
//! Blog       feed → missing entries → fetched bodies → store → archive page
//! ```
//!
//! The pipelines share no state. Each command reads its inputs, writes its
//! outputs and exits; the blog store is the only thing that persists between
//! runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`gallery_config`] | Finds the `## Configuration` block and parses gallery lines |
//! | [`scan`] | Lists image files directly inside a gallery directory |
//! | [`generate`] | Renders gallery and master pages with Maud |
//! | [`write`] | Writes generated pages under the base directory |
//! | [`imaging`] | Thumbnail and medium JPEG variants, pure Rust |
//! | [`feed`] | Atom/RSS parsing and the diff against the store |
//! | [`fetch`] | HTTP access and post body extraction |
//! | [`dates`] | Normalises feed date text to `YYYY-MM-DD` |
//! | [`ingest`] | Inserts missing posts, collecting per-entry outcomes |
//! | [`store`] | SQLite persistence for posts |
//! | [`archive`] | Renders the month-grouped archive page |
//! | [`settings`] | `sitekit.toml` loading, merging, and validation |
//! | [`logger`] | Console logging setup |
//! | [`types`] | Shared data types (`GalleryDescriptor`, `Post`, `FeedEntry`) |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are
//! ordinary Rust, interpolation is escaped by default, and CSS/JS are embedded
//! from `static/` at compile time, so the binary needs no runtime files.
//!
//! ## Injected I/O at the Edges
//!
//! Network access sits behind [`fetch::Fetcher`] and pixel work behind
//! [`imaging::ImageBackend`]. The blog and resize pipelines are tested against
//! recording mocks; only the thin production implementations touch the
//! network or decode images.
//!
//! ## Per-Entry Failure Collection
//!
//! Batch commands (`ingest`, `resize`) never abort on a single bad item. Each
//! failure is recorded in the returned report and the batch continues; the CLI
//! decides the exit status from the report.

pub mod archive;
pub mod dates;
pub mod feed;
pub mod fetch;
pub mod gallery_config;
pub mod generate;
pub mod imaging;
pub mod ingest;
pub mod logger;
pub mod output;
pub mod scan;
pub mod settings;
pub mod store;
pub mod types;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
