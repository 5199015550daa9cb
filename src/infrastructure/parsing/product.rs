//! Product detail page extraction.
//!
//! Core fields (price, manufacturer, name) come from fixed markup; the
//! remaining features are key/value rows repeated under
//! `Plugin_ProductNgfFeature_*` nodes, optionally grouped by category
//! containers.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::error::{ParseError, ParseResult};
use super::{compile_selectors, text_by_selector, text_with_fallbacks};
use crate::domain::product::{FeatureMap, ProductDetails};

/// Parser for product detail pages.
pub struct ProductPageParser {
    price_selectors: Vec<Selector>,
    manufacturer_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    feature_node_selectors: Vec<Selector>,
    feature_name_selectors: Vec<Selector>,
    feature_value_selectors: Vec<Selector>,
    feature_group_selectors: Vec<Selector>,
    group_heading_selectors: Vec<Selector>,
}

impl ProductPageParser {
    pub fn new() -> Result<Self> {
        Self::with_config(&super::SelectorConfig::default())
    }

    pub fn with_config(config: &super::SelectorConfig) -> Result<Self> {
        let product = &config.product;
        Ok(Self {
            price_selectors: compile_selectors(&product.price)?,
            manufacturer_selectors: compile_selectors(&product.manufacturer)?,
            title_selectors: compile_selectors(&product.title)?,
            feature_node_selectors: compile_selectors(&product.feature_node)?,
            feature_name_selectors: compile_selectors(&product.feature_name)?,
            feature_value_selectors: compile_selectors(&product.feature_value)?,
            feature_group_selectors: compile_selectors(&product.feature_group)?,
            group_heading_selectors: compile_selectors(&product.group_heading)?,
        })
    }

    pub fn parse(&self, html: &Html) -> ParseResult<ProductDetails> {
        let price_text = text_with_fallbacks(html, &self.price_selectors)
            .ok_or(ParseError::RequiredFieldMissing { field: "price" })?;
        let price = parse_price(&price_text)?;

        let manufacturer = text_with_fallbacks(html, &self.manufacturer_selectors)
            .ok_or(ParseError::RequiredFieldMissing {
                field: "manufacturer",
            })?;

        let title = text_with_fallbacks(html, &self.title_selectors)
            .ok_or(ParseError::RequiredFieldMissing { field: "title" })?;
        // The title packs the variant spec after the name, comma-separated.
        let name = title
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let features = self.extract_features(html.root_element())?;
        let groups = self.extract_groups(html)?;

        debug!(
            "extracted {} features in {} groups for '{name}'",
            features.len(),
            groups.len()
        );

        Ok(ProductDetails {
            manufacturer,
            name,
            price,
            features,
            groups,
        })
    }

    /// Feature rows under `scope`, first occurrence of a key wins.
    // TODO: qualify duplicate keys by their group so same-named features
    // under different groups (e.g. a CPU and an audio "chipset" on
    // motherboards) survive flat extraction.
    fn extract_features(&self, scope: ElementRef<'_>) -> ParseResult<FeatureMap> {
        let mut features = FeatureMap::new();

        for selector in &self.feature_node_selectors {
            for node in scope.select(selector) {
                let key = self
                    .feature_name_selectors
                    .iter()
                    .find_map(|s| text_by_selector(node, s))
                    .ok_or(ParseError::RequiredFieldMissing {
                        field: "feature name",
                    })?;
                let value = self
                    .feature_value_selectors
                    .iter()
                    .find_map(|s| text_by_selector(node, s))
                    .ok_or(ParseError::RequiredFieldMissing {
                        field: "feature value",
                    })?;
                debug!("{key}: {value}");
                features.insert(key, value);
            }
        }

        Ok(features)
    }

    /// Features grouped per category container, in page order. Pages
    /// without group containers yield an empty list; the flat map still
    /// carries every feature.
    fn extract_groups(&self, html: &Html) -> ParseResult<Vec<(String, FeatureMap)>> {
        let mut groups: Vec<(String, FeatureMap)> = Vec::new();

        for selector in &self.feature_group_selectors {
            for container in html.select(selector) {
                let heading = self
                    .group_heading_selectors
                    .iter()
                    .find_map(|s| text_by_selector(container, s))
                    .ok_or(ParseError::RequiredFieldMissing {
                        field: "feature group heading",
                    })?;

                let features = self.extract_features(container)?;
                match groups.iter_mut().find(|(name, _)| *name == heading) {
                    Some((_, existing)) => {
                        for (key, value) in features.iter() {
                            existing.insert(key, value);
                        }
                    }
                    None => groups.push((heading, features)),
                }
            }
        }

        Ok(groups)
    }
}

/// Parse a price string, stripping apostrophe grouping (`1'299.00`).
fn parse_price(text: &str) -> ParseResult<f64> {
    let cleaned = text.trim().replace('\'', "");
    cleaned.parse().map_err(|_| ParseError::InvalidPrice {
        value: text.trim().to_string(),
    })
}
