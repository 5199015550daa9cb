//! Search-results page extraction: hit count and product links.

use anyhow::Result;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::error::{ParseError, ParseResult};
use super::{compile_selectors, text_with_fallbacks};

/// Text of the hit indicator, e.g. `1'234 hits`.
const HITS_PATTERN: &str = r"^([\d']+) hits$";

/// Parser for search-results pages.
pub struct ListingParser {
    base_url: Url,
    hits_selectors: Vec<Selector>,
    node_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    hits_re: Regex,
}

impl ListingParser {
    pub fn new() -> Result<Self> {
        Self::with_config(&super::SelectorConfig::default())
    }

    pub fn with_config(config: &super::SelectorConfig) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            hits_selectors: compile_selectors(&config.listing.hits)?,
            node_selectors: compile_selectors(&config.listing.result_nodes)?,
            link_selectors: compile_selectors(&config.listing.product_link)?,
            hits_re: Regex::new(HITS_PATTERN).expect("hit count pattern is valid"),
        })
    }

    /// Total number of matching products reported by the results page.
    pub fn hit_count(&self, html: &Html) -> ParseResult<usize> {
        let text =
            text_with_fallbacks(html, &self.hits_selectors).ok_or(ParseError::HitCountMissing)?;

        let digits = self
            .hits_re
            .captures(&text)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| ParseError::HitCountFormat { text: text.clone() })?;

        digits
            .as_str()
            .replace('\'', "")
            .parse()
            .map_err(|_| ParseError::HitCountFormat { text })
    }

    /// Product detail links of all result nodes on the page, in node order
    /// per selector. A page without result nodes is a layout mismatch, not
    /// an empty result: the hit count promised more products.
    pub fn product_links(&self, html: &Html) -> ParseResult<Vec<String>> {
        let mut links = Vec::new();
        let mut node_count = 0usize;

        for selector in &self.node_selectors {
            for node in html.select(selector) {
                node_count += 1;
                let href = self
                    .link_selectors
                    .iter()
                    .find_map(|link_selector| {
                        node.select(link_selector)
                            .find_map(|a| a.value().attr("href"))
                    })
                    .ok_or(ParseError::RequiredFieldMissing {
                        field: "product link",
                    })?;

                let resolved = self.base_url.join(href).map_err(|e| {
                    ParseError::LinkResolutionFailed {
                        href: href.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                links.push(resolved.to_string());
            }
        }

        if node_count == 0 {
            return Err(ParseError::NoResultNodes);
        }

        debug!("extracted {} product links", links.len());
        Ok(links)
    }
}
