// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Bad input (missing URL, a URL without a host, zero workers...) is rejected
// here, before any crawling starts.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::config::{CrawlConfig, FetchConfig};

/// Crawl a website and collect the contact emails on its pages
#[derive(Parser, Debug)]
#[command(
    name = "email-crawler",
    version,
    about = "Crawl a website and collect the contact emails found on its pages",
    long_about = "email-crawler visits every page of a domain (subdomains included), \
                  pulls email addresses out of the page text and appends each new one \
                  to an output file as `<email> -> <page url>`."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.org)
    ///
    /// Only links whose hostname ends with this URL's hostname are followed
    #[arg(value_parser = parse_start_url)]
    pub url: Url,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Stop after this many pages
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_pages: u64,

    /// File the found emails are written to (truncated on start)
    #[arg(short, long, default_value = "emails_found.txt")]
    pub output: PathBuf,

    /// Seconds to wait for a server to answer
    #[arg(long = "timeout", default_value_t = 20)]
    pub timeout_secs: u64,

    /// Seconds to wait for a page to finish loading (body, or browser load event)
    #[arg(long = "render-timeout", default_value_t = 10)]
    pub render_timeout_secs: u64,

    /// Extra spam pattern; addresses containing it are dropped (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Render pages in headless Chrome so script-built content is seen
    /// (needs a build with `--features chrome`)
    #[arg(long)]
    pub render: bool,

    /// Print the final report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show debug logging (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The crawl settings these arguments describe
    pub fn crawl_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig {
            workers: self.threads as usize,
            max_pages: self.max_pages as usize,
            output: self.output.clone(),
            ..CrawlConfig::default()
        };
        config.spam_patterns.extend(self.exclude.iter().cloned());
        config
    }

    /// The HTTP settings these arguments describe
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            request_timeout: Duration::from_secs(self.timeout_secs),
            render_timeout: Duration::from_secs(self.render_timeout_secs),
            ..FetchConfig::default()
        }
    }
}

// The start URL must be absolute, http(s), and have a hostname to crawl
fn parse_start_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL '{}': {}", value, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}', use http or https", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("URL has no host: {}", value));
    }

    Ok(url)
}
