// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (bad input exits right away)
// 2. Set up logging to stderr
// 3. Run the crawl, over plain HTTP or (with --render) through headless Chrome
// 4. Print the summary (table or JSON) on stdout
// 5. Exit with 0 when the crawl completed, 2 if something broke the run
//
// Individual pages that fail to load are NOT errors here: they are logged
// during the crawl and skipped.
// =============================================================================

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use email_crawler::cli::Cli;
use email_crawler::config::CrawlConfig;
use email_crawler::crawl::{crawl, CrawlReport};
use email_crawler::fetch::HttpFetcher;

#[tokio::main]
async fn main() {
    // Parsing happens before anything else; clap prints usage and exits
    // with code 2 on invalid arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("email_crawler={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let crawl_config = cli.crawl_config();

    if !cli.json {
        println!("🔍 Crawling: {}", cli.url);
        println!(
            "📊 Workers: {}, page limit: {}",
            crawl_config.workers, crawl_config.max_pages
        );
        println!("📄 Writing emails to {}\n", crawl_config.output.display());
    }

    let report = if cli.render {
        crawl_rendered(&cli, &crawl_config).await?
    } else {
        let fetcher = HttpFetcher::new(cli.fetch_config())?;
        crawl(&cli.url, &crawl_config, fetcher).await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    Ok(())
}

#[cfg(feature = "chrome")]
async fn crawl_rendered(cli: &Cli, crawl_config: &CrawlConfig) -> Result<CrawlReport> {
    use email_crawler::fetch::ChromeFetcher;

    let fetcher = std::sync::Arc::new(ChromeFetcher::launch(cli.fetch_config()).await?);
    let result = crawl(&cli.url, crawl_config, fetcher.clone()).await;

    // Workers are joined by now, so this is the last reference
    match std::sync::Arc::try_unwrap(fetcher) {
        Ok(fetcher) => fetcher.close().await?,
        Err(_) => tracing::warn!("Chrome still in use, leaving it to exit with the process"),
    }
    result
}

#[cfg(not(feature = "chrome"))]
async fn crawl_rendered(_cli: &Cli, _crawl_config: &CrawlConfig) -> Result<CrawlReport> {
    anyhow::bail!("--render needs a build with the `chrome` feature (cargo build --features chrome)")
}

// Prints the found emails as a human-readable table
fn print_table(report: &CrawlReport) {
    println!();
    if report.emails.is_empty() {
        println!("📭 No emails found");
    } else {
        println!("{:<40} {:<60}", "EMAIL", "FOUND ON");
        println!("{}", "=".repeat(100));
        for record in &report.emails {
            println!("{:<40} {:<60}", record.address, truncate(&record.source, 60));
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   🌐 Domain: {}", report.domain);
    println!("   📄 Pages visited: {}", report.pages_visited);
    println!("   ⚠️  Failed pages: {}", report.fetch_failures);
    println!("   ✉️  Emails found: {}", report.emails.len());
    println!("   💾 Saved to: {}", report.output.display());
}

// Shortens long URLs for display, on a char boundary
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
