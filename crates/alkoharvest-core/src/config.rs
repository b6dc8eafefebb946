use crate::app_config::{HarvestConfig, DEFAULT_API_BASE_URL, DEFAULT_CITY_UUID};
use crate::ConfigError;

/// Load harvest configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_harvest_config() -> Result<HarvestConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_harvest_config_from_env()
}

/// Load harvest configuration from environment variables already in the process.
///
/// Unlike [`load_harvest_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_harvest_config_from_env() -> Result<HarvestConfig, ConfigError> {
    build_harvest_config(|key| std::env::var(key))
}

/// Build harvest configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_harvest_config<F>(lookup: F) -> Result<HarvestConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_base_url = or_default("ALKOHARVEST_API_BASE_URL", DEFAULT_API_BASE_URL);
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "ALKOHARVEST_API_BASE_URL",
            format!("\"{api_base_url}\" is not an http(s) URL"),
        ));
    }

    let city_uuid = or_default("ALKOHARVEST_CITY_UUID", DEFAULT_CITY_UUID);
    uuid::Uuid::parse_str(&city_uuid)
        .map_err(|e| invalid("ALKOHARVEST_CITY_UUID", e.to_string()))?;

    let start_categories = parse_start_categories(&or_default(
        "ALKOHARVEST_START_CATEGORIES",
        "slaboalkogolnye-napitki-2",
    ));
    if start_categories.is_empty() {
        return Err(invalid(
            "ALKOHARVEST_START_CATEGORIES",
            "at least one category slug or catalog URL is required".to_string(),
        ));
    }

    let page_size = parse_u32("ALKOHARVEST_PAGE_SIZE", "100")?;
    if page_size == 0 {
        return Err(invalid(
            "ALKOHARVEST_PAGE_SIZE",
            "page size must be greater than zero".to_string(),
        ));
    }

    let max_pages = parse_u32("ALKOHARVEST_MAX_PAGES", "500")?;
    let max_concurrent_requests = parse_usize("ALKOHARVEST_MAX_CONCURRENT_REQUESTS", "16")?;
    let log_level = or_default("ALKOHARVEST_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("ALKOHARVEST_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ALKOHARVEST_USER_AGENT", "alkoharvest/0.1 (catalog-snapshot)");
    let max_retries = parse_u32("ALKOHARVEST_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("ALKOHARVEST_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(HarvestConfig {
        api_base_url,
        city_uuid,
        start_categories,
        page_size,
        max_pages,
        max_concurrent_requests,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Splits a comma-separated list of category slugs or catalog URLs into
/// slugs, dropping blanks.
fn parse_start_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(category_slug)
        .collect()
}

/// Returns the root category slug for a catalog URL or bare slug.
///
/// `"https://alkoteka.com/catalog/slaboalkogolnye-napitki-2"` and
/// `"slaboalkogolnye-napitki-2"` both yield `"slaboalkogolnye-napitki-2"`.
/// Trailing slashes are ignored; `None` when nothing is left.
#[must_use]
pub fn category_slug(start: &str) -> Option<String> {
    start
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.ends_with(':'))
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
