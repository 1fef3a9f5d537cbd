//! DuckDuckGo HTML endpoint backend.

use crate::config::SearchConfig;
use crate::error::ApiError;
use crate::search::contract::{SearchBackend, SearchHit};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;

pub struct DuckDuckGoBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl DuckDuckGoBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skillmux/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::SearchError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, ApiError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| ApiError::SearchError(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::SearchError(format!(
                "Search endpoint returned {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ApiError::SearchError(format!("Failed to read search response: {}", e)))?;
        let hits = parse_results(&html, max_results)?;
        debug!(query = %query, hits = hits.len(), "Search completed");

        if hits.is_empty() {
            return Err(ApiError::SearchError("No results".to_string()));
        }
        Ok(hits)
    }
}

fn selector(css: &str) -> Result<Selector, ApiError> {
    Selector::parse(css)
        .map_err(|e| ApiError::SearchError(format!("Invalid selector '{}': {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract up to `max_results` hits from a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchHit>, ApiError> {
    let result_sel = selector(".result")?;
    let link_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut hits = Vec::new();
    for result in document.select(&result_sel) {
        if hits.len() >= max_results {
            break;
        }
        let link = match result.select(&link_sel).next() {
            Some(link) => link,
            None => continue,
        };
        let href = match link.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        hits.push(SearchHit {
            title: element_text(link),
            url: unwrap_redirect(href),
            snippet,
        });
    }
    Ok(hits)
}

/// Resolve `//duckduckgo.com/l/?uddg=<encoded>&...` links to their target.
pub fn unwrap_redirect(href: &str) -> String {
    if let Some(start) = href.find("uddg=") {
        let encoded = &href[start + "uddg=".len()..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return decoded.into_owned();
        }
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    href.to_string()
}
