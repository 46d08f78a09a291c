// src/config.rs
// =============================================================================
// Settings for a crawl.
//
// Everything here is filled in from the command line (see cli.rs), but each
// struct also has sensible defaults so tests can build one with
// `..Default::default()` and only override what they care about.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::extract::DEFAULT_SPAM_PATTERNS;

/// How the crawl engine behaves
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Hard cap on the number of pages visited
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Where found emails are appended (truncated at crawl start)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Substrings that mark an address as junk
    #[serde(default = "default_spam_patterns")]
    pub spam_patterns: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_pages: default_max_pages(),
            output: default_output(),
            spam_patterns: default_spam_patterns(),
        }
    }
}

/// How pages are retrieved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Upper bound for a page to finish loading (body download, or the
    /// browser's load event when rendering)
    #[serde(default = "default_render_timeout")]
    pub render_timeout: Duration,

    /// Pause after load so late scripts can fill in the page (rendering only)
    #[serde(default = "default_render_settle")]
    pub render_settle: Duration,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            render_timeout: default_render_timeout(),
            render_settle: default_render_settle(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_workers() -> usize {
    5
}

fn default_max_pages() -> usize {
    5000
}

fn default_output() -> PathBuf {
    PathBuf::from("emails_found.txt")
}

fn default_spam_patterns() -> Vec<String> {
    DEFAULT_SPAM_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_render_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_render_settle() -> Duration {
    Duration::from_millis(500)
}

fn default_user_agent() -> String {
    format!("email-crawler/{}", env!("CARGO_PKG_VERSION"))
}
