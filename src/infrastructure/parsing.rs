//! HTML parsing for Toppreise listing and product pages.

pub mod config;
pub mod error;
pub mod listing;
pub mod product;

pub use config::{ListingSelectors, ProductSelectors, SelectorConfig};
pub use error::{ParseError, ParseResult};
pub use listing::ListingParser;
pub use product::ProductPageParser;

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Compile a list of CSS selector strings, skipping invalid ones. Fails
/// only when none compile.
pub(crate) fn compile_selectors(selector_strings: &[String]) -> Result<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("failed to compile selector '{selector_str}': {e}");
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        anyhow::bail!("no valid selectors compiled. Errors: {}", errors.join(", "));
    }
    Ok(selectors)
}

/// First non-empty text content matched by any of the selectors, trimmed.
pub(crate) fn text_with_fallbacks(html: &Html, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .find_map(|selector| text_by_selector(html.root_element(), selector))
}

/// Trimmed text of the first match of `selector` under `element`.
pub(crate) fn text_by_selector(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}
