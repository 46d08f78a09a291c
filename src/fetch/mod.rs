// src/fetch/mod.rs
// =============================================================================
// This module is the boundary between the crawler and the network.
//
// The crawl engine never talks to reqwest directly. It only knows two traits:
// - Fetcher: "give me the document at this URL, or tell me why you can't"
// - Document: "what text is on this page, and which <a> elements does it have"
//
// Submodules:
// - http: the default Fetcher, built on reqwest (no JavaScript)
// - chrome: a Fetcher that renders pages in headless Chrome (`chrome` feature)
// - html: the real Document, built on scraper
//
// Tests plug in an in-memory Fetcher instead (see `testing` below), so the
// crawl logic can be exercised without any network access.
// =============================================================================

#[cfg(feature = "chrome")]
mod chrome;
mod html;
mod http;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "chrome")]
pub use chrome::ChromeFetcher;
pub use html::HtmlDocument;
pub use http::HttpFetcher;

/// An anchor element found on a page
///
/// `href` is None when the element has no href attribute at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
}

/// A fetched, rendered page
pub trait Document: Send + Sync {
    /// The page's readable text
    fn text(&self) -> &str;

    /// Every anchor element on the page, in document order
    ///
    /// An Err item means the rest of the list can't be read.
    fn anchors(&self) -> Box<dyn Iterator<Item = Result<Anchor, LinkError>> + '_>;
}

/// Something that can retrieve pages
#[async_trait]
pub trait Fetcher: Send + Sync {
    type Doc: Document + 'static;

    async fn fetch(&self, url: &str) -> Result<Self::Doc, FetchError>;
}

// Lets the caller keep a handle on a fetcher it hands to the crawl
#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    type Doc = F::Doc;

    async fn fetch(&self, url: &str) -> Result<Self::Doc, FetchError> {
        (**self).fetch(url).await
    }
}

/// Why a single URL could not be fetched
///
/// None of these stop the crawl: the URL is logged and skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("render failed: {0}")]
    Render(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// Why the anchor list of a whole page could not be read
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid selector: {0}")]
    Selector(String),
    #[error("could not enumerate anchors: {0}")]
    Enumerate(String),
}
