// src/scrape/mod.rs
//! Fetching reference pages and turning them into elements.

pub mod page;
pub mod tokenizer;

use crate::element::Element;
use crate::error::AppError;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub use page::{extract_body, wrap_body};
pub use tokenizer::{tokenize, TokenizeError};

/// Where reference pages come from.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Absolute URL of the page at `path`, used in diagnostics and in the
    /// header of generated files.
    fn url_for(&self, path: &str) -> String;

    /// The raw HTML of the page at `path`.
    async fn fetch_html(&self, path: &str) -> Result<String, AppError>;
}

/// Fetches `path` from `source` and tokenizes its body.
pub async fn fetch_elements(
    source: &dyn DocumentSource,
    path: &str,
) -> Result<Vec<Element>, AppError> {
    let url = source.url_for(path);
    let html = source.fetch_html(path).await?;
    let body = extract_body(&html, &url)?;
    let elements = tokenize(&body).map_err(|e| AppError::MalformedPage {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    log::debug!("Tokenized {} into {} element(s)", url, elements.len());
    Ok(elements)
}

/// The live reference site.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// No retries are attempted; a request slower than `timeout` fails the
    /// page.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("notion2code/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl DocumentSource for HttpSource {
    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_html(&self, path: &str) -> Result<String, AppError> {
        let url = self.url_for(path);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::PageUnavailable {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Pages held in memory, keyed by path. Used to replay recorded pages.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, path: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(path.into(), html.into());
        self
    }

    /// Stores `body` wrapped in the same envelope the live site uses.
    pub fn with_body(self, path: impl Into<String>, body: &str) -> Self {
        self.with_html(path, wrap_body(body))
    }
}

#[async_trait::async_trait]
impl DocumentSource for MemorySource {
    fn url_for(&self, path: &str) -> String {
        format!("memory:{}", path)
    }

    async fn fetch_html(&self, path: &str) -> Result<String, AppError> {
        self.pages
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::PageUnavailable {
                url: self.url_for(path),
                status: 404,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Heading;

    #[tokio::test]
    async fn test_memory_source_round_trips_bodies() {
        let source = MemorySource::new().with_body("emoji-object", "# Emoji object");
        let elements = fetch_elements(&source, "emoji-object").await.unwrap();
        assert_eq!(
            elements,
            vec![Element::Heading(Heading {
                text: "Emoji object".to_string()
            })]
        );
    }

    #[tokio::test]
    async fn test_missing_page_is_unavailable() {
        let source = MemorySource::new();
        let err = fetch_elements(&source, "user").await.unwrap_err();
        assert!(matches!(err, AppError::PageUnavailable { status: 404, .. }));
    }

    #[test]
    fn test_http_urls_join_cleanly() {
        let source = HttpSource::new("https://developers.notion.com/reference/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.url_for("user"),
            "https://developers.notion.com/reference/user"
        );
    }
}
