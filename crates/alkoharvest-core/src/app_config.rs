/// Product API root; the listing lives here and details under `/{slug}`.
pub const DEFAULT_API_BASE_URL: &str = "https://alkoteka.com/web-api/v1/product";

/// City whose prices and stock the catalog reports.
pub const DEFAULT_CITY_UUID: &str = "4a70f9e0-46ae-11e7-83ff-00155d026416";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub api_base_url: String,
    pub city_uuid: String,
    /// Root category slugs, already stripped from catalog URLs.
    pub start_categories: Vec<String>,
    pub page_size: u32,
    /// Per-category page cap; reaching it ends that category.
    pub max_pages: u32,
    pub max_concurrent_requests: usize,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}
