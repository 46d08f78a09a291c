// src/fetch/chrome.rs
// =============================================================================
// This module fetches pages through a headless Chrome, so content that is
// built by JavaScript ends up in the document too.
//
// Only compiled with `--features chrome`. Selected at runtime with --render.
//
// How a page is fetched:
// 1. Open a blank tab
// 2. Navigate to the URL (bounded by the request timeout)
// 3. Wait for the load to finish (bounded by the render timeout)
// 4. Give scripts a short moment to settle
// 5. Read back the DOM as HTML and parse it like any other page
// 6. Close the tab, whatever happened
//
// One browser is shared by all workers; each fetch uses its own tab.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{FetchError, Fetcher, HtmlDocument};
use crate::config::FetchConfig;

/// Renders pages in headless Chrome
pub struct ChromeFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    config: FetchConfig,
}

impl ChromeFetcher {
    /// Starts the browser and its event loop
    pub async fn launch(config: FetchConfig) -> anyhow::Result<Self> {
        let browser_config = BrowserConfig::builder()
            .request_timeout(config.request_timeout)
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--no-first-run")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch Chrome")?;

        // The browser only makes progress while its handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(ChromeFetcher {
            browser,
            handler,
            config,
        })
    }

    /// Shuts the browser down
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.browser.close().await.context("Failed to close Chrome")?;
        if let Err(e) = self.browser.wait().await {
            warn!("Chrome did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }

    async fn render(&self, page: &Page, url: &str) -> Result<HtmlDocument, FetchError> {
        with_timeout(self.config.request_timeout, async {
            page.goto(url)
                .await
                .map(|_| ())
                .map_err(|e| FetchError::Connect(e.to_string()))
        })
        .await?;

        with_timeout(self.config.render_timeout, async {
            page.wait_for_navigation()
                .await
                .map(|_| ())
                .map_err(|e| FetchError::Render(e.to_string()))
        })
        .await
        .map_err(|e| match e {
            FetchError::Timeout => FetchError::Render(format!(
                "page not ready after {}s",
                self.config.render_timeout.as_secs()
            )),
            other => other,
        })?;

        tokio::time::sleep(self.config.render_settle).await;

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::Render(e.to_string()))?;

        Ok(HtmlDocument::parse(&html))
    }
}

#[async_trait]
impl Fetcher for ChromeFetcher {
    type Doc = HtmlDocument;

    async fn fetch(&self, url: &str) -> Result<HtmlDocument, FetchError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Render(format!("could not open tab: {e}")))?;

        let result = self.render(&page, url).await;

        if let Err(e) = page.close().await {
            debug!("Failed to close tab for {}: {}", url, e);
        }

        result
    }
}

// Runs a browser step with a deadline; running out of time is a Timeout
async fn with_timeout<F, T>(limit: Duration, step: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(limit, step).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Document;

    #[tokio::test]
    async fn test_step_timeout() {
        let result: Result<(), FetchError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(FetchError::Timeout)));
    }

    #[tokio::test]
    #[ignore = "needs a local Chrome/Chromium install"]
    async fn test_renders_script_built_content() {
        let fetcher = ChromeFetcher::launch(FetchConfig::default()).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(
            &path,
            "<body><script>document.body.innerHTML = \
             '<p>js@site.com</p><a href=\"/next\">next</a>';</script></body>",
        )
        .unwrap();
        let url = url::Url::from_file_path(&path).unwrap();
        let document = fetcher.fetch(url.as_str()).await.unwrap();

        assert!(document.text().contains("js@site.com"));
        assert_eq!(document.anchors().count(), 1);
        fetcher.close().await.unwrap();
    }
}
