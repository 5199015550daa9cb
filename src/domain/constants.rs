//! Site constants for the Toppreise price-comparison website.

/// Toppreise URLs and query parameters.
pub mod toppreise {
    /// Base URL for resolving relative product links.
    pub const BASE_URL: &str = "https://www.toppreise.ch";

    /// Product detail pages live under this prefix; listing entries pointing
    /// elsewhere (external shops, affiliate redirects) are discarded.
    pub const PRODUCT_PATH_PREFIX: &str = "https://www.toppreise.ch/price-comparison";

    /// Query string that switches a search results page to ungrouped
    /// variants, so every variant shows up as its own listing entry.
    pub const UNGROUPED_VARIANTS_QUERY: &str = "1299760721062_fi_pcds_v=0";

    /// Paging parameter: `&sfh=o~{offset}` skips the first `offset` results.
    pub const OFFSET_PARAM: &str = "sfh=o~";
}

/// Per-navigation timeout for the headless browser, in seconds.
pub const NAV_TIMEOUT_SECS: u64 = 60;
