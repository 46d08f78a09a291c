// src/extract/spam.rs
// =============================================================================
// This module decides which email addresses are junk.
//
// Disposable inboxes (mailinator, yopmail, ...) and placeholder addresses
// (anything at example.com) show up on lots of pages but are never a real
// contact. We drop any address that CONTAINS one of the denylisted patterns.
//
// It's a substring match on purpose: "mailinator" also catches
// "mailinator2.com", "x.mailinator.net" and friends.
// =============================================================================

/// Patterns every crawl starts with
pub const DEFAULT_SPAM_PATTERNS: [&str; 5] = [
    "example.com",
    "tempmail",
    "10minutemail",
    "mailinator",
    "yopmail",
];

/// A substring denylist for email addresses
#[derive(Debug, Clone)]
pub struct SpamFilter {
    // Stored lowercased so matching never has to re-case them
    patterns: Vec<String>,
}

impl SpamFilter {
    /// Builds a filter from any list of patterns
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        SpamFilter { patterns }
    }

    /// Returns true if the address contains any denylisted pattern
    ///
    /// The comparison is case-insensitive: "X@MAILINATOR.com" is spam.
    pub fn is_spam(&self, address: &str) -> bool {
        let address = address.to_lowercase();
        self.patterns.iter().any(|p| address.contains(p.as_str()))
    }

    #[cfg(test)]
    fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for SpamFilter {
    fn default() -> Self {
        SpamFilter::new(DEFAULT_SPAM_PATTERNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let filter = SpamFilter::default();
        assert!(filter.is_spam("someone@mailinator.com"));
        assert!(filter.is_spam("info@example.com"));
        assert!(filter.is_spam("bob@10minutemail.net"));
        assert!(!filter.is_spam("sales@acme.io"));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = SpamFilter::default();
        assert!(filter.is_spam("X@MAILINATOR.com"));
        assert!(filter.is_spam("a@YopMail.fr"));
    }

    #[test]
    fn test_substring_catches_lookalikes() {
        let filter = SpamFilter::default();
        assert!(filter.is_spam("me@mailinator2.com"));
        assert!(filter.is_spam("me@sub.tempmail.org"));
    }

    #[test]
    fn test_custom_patterns_are_normalized() {
        let filter = SpamFilter::new(["  Trash.IO ", ""]);
        assert_eq!(filter.patterns(), &["trash.io".to_string()]);
        assert!(filter.is_spam("x@trash.io"));
        assert!(!filter.is_spam("x@mailinator.com"));
    }
}
