// src/crawl/worker.rs
// =============================================================================
// One crawl worker.
//
// Each worker loops:
//   take a URL from the frontier (already marked visited)
//   -> fetch it
//   -> record any new emails
//   -> queue the in-domain links it hasn't seen
//   -> tell the frontier it's done with the page
//
// A failed fetch is logged and skipped. The URL stays visited and is never
// retried.
// =============================================================================

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::CrawlContext;
use crate::extract::{extract_emails, extract_links};
use crate::fetch::{Document, Fetcher};

/// Runs until the frontier says the crawl is over
pub(super) async fn run_worker<F>(id: usize, ctx: Arc<CrawlContext<F>>) -> Result<()>
where
    F: Fetcher,
{
    debug!(worker = id, "worker started");

    while let Some(url) = ctx.frontier.next_page().await {
        let result = process_page(&ctx, &url).await;
        // Always give the slot back, even on error, or the others would wait forever
        ctx.frontier.release();
        result?;
    }

    debug!(worker = id, "worker finished");
    Ok(())
}

async fn process_page<F>(ctx: &CrawlContext<F>, url: &str) -> Result<()>
where
    F: Fetcher,
{
    info!("Crawling: {}", url);

    let document = match ctx.fetcher.fetch(url).await {
        Ok(document) => document,
        Err(e) => {
            warn!("Error fetching {}: {}", url, e);
            ctx.fetch_failures.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
    };

    for email in extract_emails(document.text(), &ctx.spam) {
        if ctx.sink.record(&email, url).await? {
            info!("[email found] {}", email);
        }
    }

    let links = extract_links(url, &document, &ctx.domain);
    let queued = ctx.frontier.enqueue_all(links.iter().cloned());
    info!("Found {} links on {} ({} queued)", links.len(), url, queued);

    let emails = ctx.sink.len().await;
    info!(
        "[Status] Processed: {}, Emails: {}, Queue: {}",
        ctx.frontier.visited_count(),
        emails,
        ctx.frontier.queue_len()
    );

    Ok(())
}
