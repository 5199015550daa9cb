//! CSS selector configuration.
//!
//! Defaults match the Toppreise markup; all selectors can be overridden,
//! e.g. when the site ships a layout change.

use serde::{Deserialize, Serialize};

use crate::domain::constants::toppreise;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Base URL for resolving relative product links.
    pub base_url: String,
    pub listing: ListingSelectors,
    pub product: ProductSelectors,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            base_url: toppreise::BASE_URL.to_string(),
            listing: ListingSelectors::default(),
            product: ProductSelectors::default(),
        }
    }
}

/// Selectors for search-results pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Element carrying the total hit count text.
    pub hits: Vec<String>,
    /// Result node selectors; matches of every selector are collected, in
    /// selector order.
    pub result_nodes: Vec<String>,
    /// Product detail link inside a result node.
    pub product_link: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            hits: vec!["span.f_hits".to_string()],
            result_nodes: vec![
                r#"[id^="Plugin_Product_"]"#.to_string(),
                r#"[id^="Plugin_Offer_"]"#.to_string(),
            ],
            product_link: vec!["a".to_string()],
        }
    }
}

/// Selectors for product detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSelectors {
    pub price: Vec<String>,
    pub manufacturer: Vec<String>,
    /// Title selectors, tried in order; some pages wrap long titles in an
    /// extra `break` class.
    pub title: Vec<String>,
    /// One node per feature row.
    pub feature_node: Vec<String>,
    /// Key and value inside a feature node.
    pub feature_name: Vec<String>,
    pub feature_value: Vec<String>,
    /// One container per feature category.
    pub feature_group: Vec<String>,
    /// Category heading inside a group container.
    pub group_heading: Vec<String>,
}

impl Default for ProductSelectors {
    fn default() -> Self {
        Self {
            price: vec!["div.Plugin_Price".to_string()],
            manufacturer: vec!["span.manu".to_string()],
            title: vec!["span.title.break".to_string(), "span.title".to_string()],
            feature_node: vec![r#"[id^="Plugin_ProductNgfFeature_"]"#.to_string()],
            feature_name: vec!["div.name".to_string()],
            feature_value: vec!["div.value".to_string()],
            feature_group: vec![r#"[id^="Plugin_ProductNgfFeatureGroup_"]"#.to_string()],
            group_heading: vec!["div.groupName".to_string()],
        }
    }
}
