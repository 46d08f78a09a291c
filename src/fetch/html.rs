// src/fetch/html.rs
// =============================================================================
// This module turns raw HTML into a Document the crawler can work with.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// scraper's `Html` type can't be sent between threads, so we do all the
// parsing up front and only keep plain Strings around. That way a document
// can be held across an .await inside a tokio task.
// =============================================================================

use scraper::{Html, Selector};

use super::{Anchor, Document, LinkError};

// Elements whose text is code or styling, not something a visitor reads
const SKIPPED_TEXT_PARENTS: [&str; 3] = ["script", "style", "noscript"];

/// A page parsed with scraper
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    text: String,
    anchors: Result<Vec<Anchor>, String>,
}

impl HtmlDocument {
    /// Parses an HTML string
    ///
    /// Never fails: html5ever recovers from any malformed markup. The only
    /// thing that can go wrong is building the anchor selector, and that is
    /// reported later by `anchors()`.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        HtmlDocument {
            text: collect_text(&document),
            anchors: collect_anchors(&document),
        }
    }
}

impl Document for HtmlDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn anchors(&self) -> Box<dyn Iterator<Item = Result<Anchor, LinkError>> + '_> {
        match &self.anchors {
            Ok(anchors) => Box::new(anchors.iter().cloned().map(Ok)),
            Err(msg) => Box::new(std::iter::once(Err(LinkError::Selector(msg.clone())))),
        }
    }
}

// Joins every visible text node with a single space
//
// Spaces matter: "<p>a@b.com</p><p>next</p>" must not become "a@b.comnext"
fn collect_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name().to_string()))
            .map(|name| SKIPPED_TEXT_PARENTS.contains(&name.as_str()))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    parts.join(" ")
}

// Collects every <a> element, with or without an href
fn collect_anchors(document: &Html) -> Result<Vec<Anchor>, String> {
    let selector = Selector::parse("a").map_err(|e| format!("{e:?}"))?;

    let anchors = document
        .select(&selector)
        .map(|element| Anchor {
            href: element.value().attr("href").map(str::to_string),
        })
        .collect();

    Ok(anchors)
}
