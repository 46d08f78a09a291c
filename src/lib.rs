// src/lib.rs
// =============================================================================
// The crawler as a library. main.rs is a thin wrapper around it.
//
// Modules:
// - cli: command-line arguments
// - config: crawl and fetch settings
// - extract: emails and links out of a page (pure functions)
// - fetch: the Fetcher/Document seam and the reqwest + scraper implementation
// - crawl: frontier, workers, output file, and the crawl controller
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod extract;
pub mod fetch;

pub use crawl::{crawl, CrawlReport};
