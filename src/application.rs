//! Application layer: the scrape orchestrator.

pub mod scraper;

pub use scraper::Scraper;
