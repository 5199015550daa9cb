//! Domain types: scrape targets, feature maps, records, and site constants.

pub mod constants;
pub mod product;
pub mod target;

pub use product::{FeatureMap, ProductDetails, ProductRecord, ScrapeResult};
pub use target::{FeatureFilter, FeatureSelector, ScrapeTarget};
