//! Scrape orchestration.
//!
//! One run walks through four phases: count the total hits, page through
//! the listing, extract each product, and finish with a result table.
//! Navigation is strictly sequential; the browser session spans the run and
//! is closed on every exit path, including aborts.

use anyhow::{Context, Result};
use chrono::Utc;
use scraper::Html;
use tracing::info;

use crate::domain::constants::toppreise;
use crate::domain::product::{ProductRecord, ScrapeResult};
use crate::domain::target::ScrapeTarget;
use crate::infrastructure::browser::{BrowserPageFetcher, FetcherConfig, PageFetcher};
use crate::infrastructure::parsing::{ListingParser, ProductPageParser, SelectorConfig};

/// Orchestrates paginator and extractor over one browser session.
pub struct Scraper<F: PageFetcher> {
    target: ScrapeTarget,
    fetcher: F,
    listing: ListingParser,
    product: ProductPageParser,
}

impl Scraper<BrowserPageFetcher> {
    /// Scraper backed by a headless browser with default selectors.
    pub fn new(target: ScrapeTarget) -> Result<Self> {
        Self::with_fetcher(target, BrowserPageFetcher::new(FetcherConfig::default()))
    }
}

impl<F: PageFetcher> Scraper<F> {
    pub fn with_fetcher(target: ScrapeTarget, fetcher: F) -> Result<Self> {
        let config = SelectorConfig::default();
        Ok(Self {
            target,
            fetcher,
            listing: ListingParser::with_config(&config)?,
            product: ProductPageParser::with_config(&config)?,
        })
    }

    /// Run one scrape, visiting at most `max_products` products (each
    /// visited product consumes one unit of budget whether it is retained
    /// or discarded). The browser session is released before returning,
    /// also when extraction aborts the run.
    pub async fn scrape(&mut self, max_products: Option<usize>) -> Result<ScrapeResult> {
        let result = self.run(max_products).await;
        self.fetcher.close().await;
        result
    }

    async fn run(&mut self, max_products: Option<usize>) -> Result<ScrapeResult> {
        let started_at = Utc::now();

        // Counting: the hit count must be known before any paging, it is
        // the only thing bounding the pagination loop.
        let url = self.target.url().to_string();
        let html = self.fetcher.fetch(&url).await?;
        let hits = {
            let document = Html::parse_document(&html);
            self.listing.hit_count(&document)
        }
        .with_context(|| format!("error while scraping {url}"))?;

        let total = max_products.map_or(hits, |max| hits.min(max));
        info!("{hits} hits reported, scraping {total} products");

        let mut records: Vec<ProductRecord> = Vec::new();
        let mut discarded = 0usize;
        let mut remaining = total;

        // Paging: the offset is the number of records retained so far, so
        // the offset lags behind after discards (kept as documented
        // behavior of the site's sfh parameter usage).
        while remaining > 0 {
            let page_url = format!(
                "{}&{}{}",
                self.target.url(),
                toppreise::OFFSET_PARAM,
                records.len()
            );
            let html = self.fetcher.fetch(&page_url).await?;
            let links = {
                let document = Html::parse_document(&html);
                self.listing.product_links(&document)
            }
            .with_context(|| format!("error while scraping {page_url}"))?;

            // Extracting: each link consumes one unit of budget.
            for link in links {
                if remaining == 0 {
                    break;
                }
                match self.extract_product(&link).await? {
                    Some(record) => records.push(record),
                    None => discarded += 1,
                }
                remaining -= 1;
                info!(
                    collected = records.len(),
                    discarded, remaining, "processed {link}"
                );
            }
        }

        info!("discarded {discarded} products");
        Ok(ScrapeResult {
            records,
            discarded,
            started_at,
        })
    }

    /// Visit one product page. `Ok(None)` is the skip signal: unsupported
    /// URL or missing required features. Parse failures are fatal and carry
    /// the offending URL.
    async fn extract_product(&mut self, url: &str) -> Result<Option<ProductRecord>> {
        // Some listing entries link straight to external shops; skip these
        // together with any other unexpected URL.
        if !url.starts_with(toppreise::PRODUCT_PATH_PREFIX) {
            info!("discarding product {url} at unsupported URL");
            return Ok(None);
        }

        let html = self.fetcher.fetch(url).await?;
        let details = {
            let document = Html::parse_document(&html);
            self.product.parse(&document)
        }
        .with_context(|| format!("error while scraping {url}"))?;

        match details.into_record(url, self.target.features()) {
            Ok(record) => Ok(Some(record)),
            Err(missing) => {
                info!(
                    "discarding product {url} missing required features: {}",
                    missing.join(", ")
                );
                Ok(None)
            }
        }
    }
}
