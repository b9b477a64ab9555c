//! HTTP fetching and post-body extraction.
//!
//! Everything that touches the network goes through the [`Fetcher`] trait so
//! feed diffing and ingestion can be tested against canned responses. The real
//! implementation is [`HttpFetcher`], a blocking `reqwest` client: requests are
//! made one at a time, and the tools are single-shot CLIs.
//!
//! [`fetch_post_content`] never fails. Network and status errors become
//! [`Content::Failed`], a page without the content container becomes
//! [`Content::NotFound`], and [`Content::into_body`] turns either into the
//! placeholder markup the archive has always stored for such posts.

use crate::settings::ScrapeSettings;
use scraper::{Html, Selector};
use spdlog::{error, info, warn};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{status} for url ({url})")]
    Status { url: String, status: u16 },
}

/// Source of remote documents.
pub trait Fetcher {
    /// Fetch `url` and return the response body as text.
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(settings: &ScrapeSettings) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

/// Outcome of fetching one post page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Outer HTML of the content container
    Found(String),
    /// Page fetched, but it has no content container
    NotFound,
    /// Request failed; carries the error text
    Failed(String),
}

impl Content {
    /// The markup to store as the post body.
    pub fn into_body(self) -> String {
        match self {
            Content::Found(html) => html,
            Content::NotFound => "<div>Blog content not found.</div>".to_string(),
            Content::Failed(message) => format!("<div>Error fetching the URL: {message}</div>"),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Content::Found(_))
    }
}

/// Fetch a post page and pull out its content container.
pub fn fetch_post_content(fetcher: &dyn Fetcher, url: &str, container_class: &str) -> Content {
    match fetcher.get(url) {
        Ok(html) => match extract_container(&html, container_class) {
            Some(container) => {
                info!("Content found for {}", url);
                Content::Found(container)
            }
            None => {
                warn!("No div.{} in {}", container_class, url);
                Content::NotFound
            }
        },
        Err(e) => {
            error!("Error fetching the URL {}: {}", url, e);
            Content::Failed(e.to_string())
        }
    }
}

/// Outer HTML of the first `div` whose class list contains `class`.
pub fn extract_container(html: &str, class: &str) -> Option<String> {
    let selector = Selector::parse(&format!("div.{class}")).ok()?;
    let document = Html::parse_document(html);
    document.select(&selector).next().map(|div| div.html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockFetcher;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Post</title></head>
<body>
  <nav class="trix-content-nav">menu</nav>
  <div class="post">
    <div class="trix-content body"><p>Hello <strong>world</strong></p></div>
    <div class="trix-content"><p>Second</p></div>
  </div>
</body></html>"#;

    #[test]
    fn extracts_first_matching_div_with_its_tag() {
        let html = extract_container(PAGE, "trix-content").unwrap();
        assert!(html.starts_with("<div class=\"trix-content body\">"));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
        assert!(html.ends_with("</div>"));
        assert!(!html.contains("Second"));
    }

    #[test]
    fn class_must_match_a_whole_token() {
        let html = r#"<div class="trix-content-nav">x</div>"#;
        assert_eq!(extract_container(html, "trix-content"), None);
    }

    #[test]
    fn only_divs_count() {
        let html = r#"<section class="trix-content">x</section>"#;
        assert_eq!(extract_container(html, "trix-content"), None);
    }

    #[test]
    fn into_body_maps_every_outcome() {
        assert_eq!(Content::Found("<div>x</div>".into()).into_body(), "<div>x</div>");
        assert_eq!(
            Content::NotFound.into_body(),
            "<div>Blog content not found.</div>"
        );
        assert_eq!(
            Content::Failed("timed out".into()).into_body(),
            "<div>Error fetching the URL: timed out</div>"
        );
    }

    #[test]
    fn fetch_found() {
        let fetcher = MockFetcher::new().with_page("https://blog/1", PAGE);
        let content = fetch_post_content(&fetcher, "https://blog/1", "trix-content");
        assert!(content.is_found());
        assert_eq!(fetcher.requests(), vec!["https://blog/1"]);
    }

    #[test]
    fn fetch_without_container() {
        let fetcher = MockFetcher::new().with_page("https://blog/1", "<html><body>hi</body></html>");
        assert_eq!(
            fetch_post_content(&fetcher, "https://blog/1", "trix-content"),
            Content::NotFound
        );
    }

    #[test]
    fn fetch_failure_carries_message() {
        let fetcher = MockFetcher::new();
        let content = fetch_post_content(&fetcher, "https://blog/missing", "trix-content");
        assert_eq!(
            content,
            Content::Failed("404 for url (https://blog/missing)".to_string())
        );
    }
}
