// src/crawl/mod.rs
// =============================================================================
// This module runs a crawl from start to finish.
//
// Features:
// - Breadth-first(ish) crawling starting from a URL
// - Same-domain restriction (subdomains included)
// - A fixed number of concurrent workers sharing one frontier
// - A hard cap on the number of pages visited
// - Stops on its own once no work is queued and no worker is busy
//
// Submodules:
// - frontier: the shared queue + visited-set
// - sink: the output file of found emails
// - worker: what each worker does with a page
// =============================================================================

mod frontier;
mod sink;
mod worker;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use crate::config::CrawlConfig;
use crate::extract::{normalize_url, SpamFilter};
use crate::fetch::Fetcher;

pub use frontier::{Frontier, Next};
pub use sink::{EmailRecord, EmailSink};

/// Everything the workers share
///
/// Owned by `crawl()` and handed to each worker behind an Arc.
pub(crate) struct CrawlContext<F> {
    pub frontier: Frontier,
    pub sink: EmailSink,
    pub fetcher: F,
    pub spam: SpamFilter,
    pub domain: String,
    pub fetch_failures: AtomicUsize,
}

/// What a finished crawl found
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub domain: String,
    pub pages_visited: usize,
    pub fetch_failures: usize,
    pub output: PathBuf,
    pub emails: Vec<EmailRecord>,
}

/// Crawls the domain of `start_url`
///
/// The output file is truncated before the first page is fetched. Returns
/// once every worker has stopped.
pub async fn crawl<F>(start_url: &Url, config: &CrawlConfig, fetcher: F) -> Result<CrawlReport>
where
    F: Fetcher + 'static,
{
    let domain = start_url
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", start_url))?
        .to_string();

    let seed = normalize_url(start_url.as_str())
        .ok_or_else(|| anyhow!("Invalid start URL: {}", start_url))?;

    let sink = EmailSink::create(&config.output).await?;

    let frontier = Frontier::new(config.max_pages);
    frontier.enqueue_if_unvisited(seed.clone());

    let ctx = Arc::new(CrawlContext {
        frontier,
        sink,
        fetcher,
        spam: SpamFilter::new(&config.spam_patterns),
        domain: domain.clone(),
        fetch_failures: AtomicUsize::new(0),
    });

    let workers = config.workers.max(1);
    info!("Starting {} workers on {} (domain {})", workers, seed, domain);

    let handles: Vec<_> = (0..workers)
        .map(|id| tokio::spawn(worker::run_worker(id, ctx.clone())))
        .collect();

    // Join ALL workers before reporting, even if one of them failed
    let mut first_error = None;
    for joined in futures::future::join_all(handles).await {
        let outcome = joined.map_err(anyhow::Error::from).and_then(|result| result);
        if let Err(e) = outcome {
            error!("Worker stopped with an error: {:#}", e);
            first_error.get_or_insert(e);
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    let report = CrawlReport {
        start_url: seed,
        domain,
        pages_visited: ctx.frontier.visited_count(),
        fetch_failures: ctx.fetch_failures.load(Ordering::Relaxed),
        output: ctx.sink.path().to_path_buf(),
        emails: ctx.sink.records().await,
    };

    info!(
        "Crawl finished: {} pages, {} emails, {} failures",
        report.pages_visited,
        report.emails.len(),
        report.fetch_failures
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{SiteFetcher, StaticDocument};
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    fn config(output: &Path, workers: usize, max_pages: usize) -> CrawlConfig {
        CrawlConfig {
            workers,
            max_pages,
            output: output.to_path_buf(),
            ..CrawlConfig::default()
        }
    }

    fn site(pages: &[(&str, StaticDocument)]) -> SiteFetcher {
        let map: HashMap<String, StaticDocument> = pages
            .iter()
            .map(|(url, doc)| (url.to_string(), doc.clone()))
            .collect();
        SiteFetcher::from_map(map)
    }

    async fn run(
        start: &str,
        config: &CrawlConfig,
        fetcher: SiteFetcher,
    ) -> (CrawlReport, Arc<SiteFetcher>) {
        // Arc so the test can still read the fetch counter afterwards
        let fetcher = Arc::new(fetcher);
        let start = Url::parse(start).unwrap();
        let report = tokio::time::timeout(
            Duration::from_secs(10),
            crawl(&start, config, fetcher.clone()),
        )
        .await
        .expect("crawl did not terminate")
        .unwrap();
        (report, fetcher)
    }

    fn addresses(report: &CrawlReport) -> Vec<String> {
        let mut found: Vec<_> = report.emails.iter().map(|r| r.address.clone()).collect();
        found.sort();
        found
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_crawls_whole_site() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails_found.txt");
        let fetcher = site(&[
            (
                "http://site.com/",
                StaticDocument::new("Hello, mail Info@Site.com", &["/about", "/contact#form"]),
            ),
            (
                "http://site.com/about",
                StaticDocument::new("nothing here", &["/", "http://other.com/x"]),
            ),
            (
                "http://site.com/contact",
                StaticDocument::new("jobs@site.com or junk@yopmail.com", &["/about"]),
            ),
        ]);

        let (report, fetcher) = run("http://site.com/", &config(&output, 4, 100), fetcher).await;

        assert_eq!(report.pages_visited, 3);
        assert_eq!(fetcher.fetch_count(), 3);
        assert_eq!(report.fetch_failures, 0);
        assert_eq!(report.domain, "site.com");
        assert_eq!(addresses(&report), vec!["info@site.com", "jobs@site.com"]);

        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("info@site.com -> http://site.com/\n"));
        assert!(contents.contains("jobs@site.com -> http://site.com/contact\n"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_page_cap_on_infinite_site() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails.txt");

        // Every page links to itself and to two fresh pages, forever
        let fetcher = SiteFetcher::new(|url| {
            let n: usize = url.rsplit('/').next()?.parse().ok()?;
            let links = [
                format!("/page/{n}"),
                format!("/page/{}", n + 1),
                format!("/page/{}", n + 2),
            ];
            let links: Vec<&str> = links.iter().map(String::as_str).collect();
            Some(StaticDocument::new("", &links))
        });

        let (report, fetcher) = run("http://site.com/page/0", &config(&output, 5, 3), fetcher).await;

        assert_eq!(report.pages_visited, 3);
        assert!(fetcher.fetch_count() <= 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_terminates_when_all_workers_idle() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails.txt");
        let fetcher = site(&[("http://site.com/", StaticDocument::new("alone", &[]))]);

        let (report, _) = run("http://site.com/", &config(&output, 8, 100), fetcher).await;
        assert_eq!(report.pages_visited, 1);
        assert!(report.emails.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_visited_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails.txt");
        let fetcher = site(&[
            ("http://site.com/", StaticDocument::new("", &["/missing", "/ok"])),
            ("http://site.com/ok", StaticDocument::new("ok@site.com", &["/missing"])),
        ]);

        let (report, fetcher) = run("http://site.com/", &config(&output, 2, 100), fetcher).await;

        assert_eq!(report.pages_visited, 3);
        assert_eq!(report.fetch_failures, 1);
        // Never retried, even though /ok links to it again
        assert_eq!(fetcher.fetch_count(), 3);
        assert_eq!(addresses(&report), vec!["ok@site.com"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_email_on_many_pages_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails.txt");
        let fetcher = site(&[
            ("http://site.com/", StaticDocument::new("hr@site.com", &["/a", "/b", "/c"])),
            ("http://site.com/a", StaticDocument::new("hr@site.com", &[])),
            ("http://site.com/b", StaticDocument::new("HR@site.com", &[])),
            ("http://site.com/c", StaticDocument::new("hr@site.com", &[])),
        ]);

        let (report, _) = run("http://site.com/", &config(&output, 4, 100), fetcher).await;

        assert_eq!(report.pages_visited, 4);
        assert_eq!(report.emails.len(), 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_rerun_resets_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails.txt");

        let first = site(&[("http://site.com/", StaticDocument::new("old@site.com", &[]))]);
        run("http://site.com/", &config(&output, 2, 100), first).await;

        let second = site(&[("http://site.com/", StaticDocument::new("new@site.com", &[]))]);
        run("http://site.com/", &config(&output, 2, 100), second).await;

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "new@site.com -> http://site.com/\n"
        );
    }

    #[cfg(target_os = "linux")]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_output_write_error_stops_crawl() {
        let fetcher = site(&[
            ("http://site.com/", StaticDocument::new("a@site.com", &["/b", "/c", "/d"])),
            ("http://site.com/b", StaticDocument::new("b@site.com", &[])),
            ("http://site.com/c", StaticDocument::new("c@site.com", &[])),
            ("http://site.com/d", StaticDocument::new("nothing", &[])),
        ]);
        let config = config(Path::new("/dev/full"), 4, 100);
        let start = Url::parse("http://site.com/").unwrap();

        // Every worker must give its slot back, or the others would wait forever
        let result = tokio::time::timeout(Duration::from_secs(10), crawl(&start, &config, fetcher))
            .await
            .expect("crawl did not terminate");

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("/dev/full"));
    }

    #[tokio::test]
    async fn test_start_fragment_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("emails.txt");
        let fetcher = site(&[("http://site.com/", StaticDocument::new("", &["/#top"]))]);

        let (report, fetcher) = run("http://site.com/#intro", &config(&output, 1, 100), fetcher).await;

        assert_eq!(report.start_url, "http://site.com/");
        assert_eq!(report.pages_visited, 1);
        assert_eq!(fetcher.fetch_count(), 1);
    }
}
