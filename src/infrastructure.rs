//! Infrastructure layer: headless browser fetching, HTML parsing, CSV
//! export, and logging setup.

pub mod browser;
pub mod export;
pub mod logging;
pub mod parsing;

pub use browser::{BrowserPageFetcher, FetcherConfig, PageFetcher};
pub use export::write_csv;
pub use logging::init_logging;
pub use parsing::{ListingParser, ParseError, ParseResult, ProductPageParser, SelectorConfig};
