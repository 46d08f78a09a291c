// src/extract/mod.rs
// =============================================================================
// This module pulls useful data out of fetched pages.
//
// Submodules:
// - emails: finds email addresses in page text
// - spam: the denylist that throws away disposable/placeholder addresses
// - links: finds the in-domain links to crawl next
//
// Everything in here is a pure function of its inputs: no network, no
// shared state. That makes it the easiest part of the crawler to test.
// =============================================================================

mod emails;
mod links;
mod spam;

pub use emails::extract_emails;
pub use links::{extract_links, normalize_url};
pub use spam::{SpamFilter, DEFAULT_SPAM_PATTERNS};
