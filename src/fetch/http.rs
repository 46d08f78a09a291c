// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - One shared reqwest Client for the whole crawl (connection pooling)
// - GET the page, treat anything other than 2xx as a failure
// - Read the body under a separate "render" deadline, so a server that
//   trickles bytes forever can't hold a worker hostage
// - Translate reqwest's errors into our own FetchError categories
//
// JavaScript is not executed: the document is the HTML the server sent.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;

use super::{FetchError, Fetcher, HtmlDocument};
use crate::config::FetchConfig;

/// Fetches pages with reqwest and parses them with scraper
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds the HTTP client once; every worker shares it
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(HttpFetcher { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    type Doc = HtmlDocument;

    async fn fetch(&self, url: &str) -> Result<HtmlDocument, FetchError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = tokio::time::timeout(self.config.render_timeout, response.text())
            .await
            .map_err(|_| {
                FetchError::Render(format!(
                    "page not ready after {}s",
                    self.config.render_timeout.as_secs()
                ))
            })?
            .map_err(categorize_error)?;

        Ok(HtmlDocument::parse(&body))
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure / host unreachable
// - Too many redirects
// - A body that isn't valid text
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_redirect() {
        FetchError::Request("too many redirects".to_string())
    } else if error.is_decode() || error.is_body() {
        FetchError::Render(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}
