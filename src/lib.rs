//! Toppreise hardware listing scraper
//!
//! Collects product listings (prices, specifications) from the Toppreise
//! price-comparison site: paginates a search result set of unknown size,
//! visits each product page in a headless browser, extracts the feature
//! table, and emits a CSV with one row per retained product.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::scraper::Scraper;
pub use domain::product::{ProductRecord, ScrapeResult};
pub use domain::target::{FeatureFilter, FeatureSelector, ScrapeTarget};
pub use infrastructure::browser::{BrowserPageFetcher, FetcherConfig, PageFetcher};
