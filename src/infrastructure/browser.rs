//! Headless browser page fetching.
//!
//! Listing and product pages on Toppreise populate their content through
//! scripts, so a raw HTTP fetch returns an empty shell. Every fetch renders
//! the page in headless Chromium over CDP and returns the final HTML.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::constants::NAV_TIMEOUT_SECS;

/// Fetches the fully rendered HTML of a URL.
///
/// One browser session backs a whole scrape run; the orchestrator calls
/// `close` on every exit path.
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String>;

    /// Release the underlying session. Idempotent.
    async fn close(&mut self);
}

/// Browser fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub headless: bool,
    /// Bound on a single navigation; exceeding it fails that fetch.
    pub nav_timeout: Duration,
    /// Extra Chrome command-line arguments.
    pub chrome_args: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            headless: true,
            nav_timeout: Duration::from_secs(NAV_TIMEOUT_SECS),
            chrome_args: Vec::new(),
        }
    }
}

/// Chromium-backed fetcher. The browser is launched lazily on the first
/// fetch and held for the session; each fetch navigates a fresh page and
/// closes it afterwards, so navigations stay strictly sequential.
pub struct BrowserPageFetcher {
    config: FetcherConfig,
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
}

impl BrowserPageFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            config,
            browser: None,
            handler_task: None,
        }
    }

    async fn ensure_browser(&mut self) -> Result<&Browser> {
        if self.browser.is_none() {
            info!(headless = self.config.headless, "launching browser");

            let mut builder = BrowserConfig::builder()
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--no-first-run")
                .arg("--no-sandbox");
            if !self.config.headless {
                builder = builder.with_head();
            }
            for arg in &self.config.chrome_args {
                builder = builder.arg(arg.as_str());
            }
            let browser_config = builder
                .build()
                .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

            let (browser, mut handler) = Browser::launch(browser_config)
                .await
                .context("failed to launch browser")?;

            // The handler stream must be polled for the CDP connection to
            // make progress.
            let task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            self.browser = Some(browser);
            self.handler_task = Some(task);
        }
        Ok(self.browser.as_ref().expect("browser just launched"))
    }
}

#[async_trait]
impl PageFetcher for BrowserPageFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        let nav_timeout = self.config.nav_timeout;
        let browser = self.ensure_browser().await?;

        debug!("navigating to {url}");
        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open browser page")?;

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            page.content().await
        };

        let html = match tokio::time::timeout(nav_timeout, navigation).await {
            Ok(result) => {
                let html = result.with_context(|| format!("navigation failed for {url}"));
                let _ = page.close().await;
                html?
            }
            Err(_) => {
                let _ = page.close().await;
                bail!(
                    "navigation timed out after {}s for {url}",
                    nav_timeout.as_secs()
                );
            }
        };

        debug!("fetched {} bytes from {url}", html.len());
        Ok(html)
    }

    async fn close(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            let _ = browser.close().await;
            let _ = browser.wait().await;
            debug!("browser session closed");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}
