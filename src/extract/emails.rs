// src/extract/emails.rs
// =============================================================================
// This module pulls email addresses out of page text.
//
// The pattern is intentionally loose:
//   local-part  [a-zA-Z0-9_.+-]+
//   @
//   host        [a-zA-Z0-9-]+
//   .
//   rest        [a-zA-Z0-9-.]+   (multi-label TLDs, and yes, trailing dots)
//
// Every match is lowercased, checked against the spam filter and collected
// into a HashSet, so repeats on the same page collapse into one entry.
// =============================================================================

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::spam::SpamFilter;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+").unwrap();
}

/// Extracts emails, dropping every address the filter flags
///
/// Example:
///   text = "Contact Sales@Acme.io or spam@mailinator.com"
///   result = {"sales@acme.io"}
pub fn extract_emails(text: &str, filter: &SpamFilter) -> HashSet<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|address| !filter.is_spam(address))
        .collect()
}
