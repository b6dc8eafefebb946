use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_harvest_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_base_url, "https://alkoteka.com/web-api/v1/product");
    assert_eq!(cfg.city_uuid, "4a70f9e0-46ae-11e7-83ff-00155d026416");
    assert_eq!(cfg.start_categories, vec!["slaboalkogolnye-napitki-2"]);
    assert_eq!(cfg.page_size, 100);
    assert_eq!(cfg.max_pages, 500);
    assert_eq!(cfg.max_concurrent_requests, 16);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "alkoharvest/0.1 (catalog-snapshot)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
}

#[test]
fn start_categories_accept_slugs_and_catalog_urls() {
    let mut map = HashMap::new();
    map.insert(
        "ALKOHARVEST_START_CATEGORIES",
        "https://alkoteka.com/catalog/vino-1/, pivo-2 ,,",
    );
    let cfg = build_harvest_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.start_categories, vec!["vino-1", "pivo-2"]);
}

#[test]
fn start_categories_blank_fails() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_START_CATEGORIES", " , ");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_START_CATEGORIES"),
        "expected InvalidEnvVar(ALKOHARVEST_START_CATEGORIES), got: {result:?}"
    );
}

#[test]
fn city_uuid_override() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_CITY_UUID", "396df2b5-7b2b-11eb-80cd-00155d039009");
    let cfg = build_harvest_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.city_uuid, "396df2b5-7b2b-11eb-80cd-00155d039009");
}

#[test]
fn city_uuid_invalid() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_CITY_UUID", "krasnodar");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_CITY_UUID"),
        "expected InvalidEnvVar(ALKOHARVEST_CITY_UUID), got: {result:?}"
    );
}

#[test]
fn api_base_url_must_be_http() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_API_BASE_URL", "ftp://alkoteka.com/api");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_API_BASE_URL"),
        "expected InvalidEnvVar(ALKOHARVEST_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn page_size_override() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_PAGE_SIZE", "24");
    let cfg = build_harvest_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_size, 24);
}

#[test]
fn page_size_zero_fails() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_PAGE_SIZE", "0");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_PAGE_SIZE"),
        "expected InvalidEnvVar(ALKOHARVEST_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn page_size_invalid() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_PAGE_SIZE", "not-a-number");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_PAGE_SIZE"),
        "expected InvalidEnvVar(ALKOHARVEST_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn max_concurrent_requests_override() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_MAX_CONCURRENT_REQUESTS", "4");
    let cfg = build_harvest_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_requests, 4);
}

#[test]
fn max_concurrent_requests_invalid() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_MAX_CONCURRENT_REQUESTS", "-1");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_MAX_CONCURRENT_REQUESTS"),
        "expected InvalidEnvVar(ALKOHARVEST_MAX_CONCURRENT_REQUESTS), got: {result:?}"
    );
}

#[test]
fn retry_settings_override() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_MAX_RETRIES", "0");
    map.insert("ALKOHARVEST_RETRY_BACKOFF_BASE_MS", "250");
    let cfg = build_harvest_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 250);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("ALKOHARVEST_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_harvest_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALKOHARVEST_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ALKOHARVEST_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn category_slug_from_catalog_url() {
    assert_eq!(
        category_slug("https://alkoteka.com/catalog/slaboalkogolnye-napitki-2").as_deref(),
        Some("slaboalkogolnye-napitki-2")
    );
}

#[test]
fn category_slug_from_bare_slug() {
    assert_eq!(category_slug("pivo-2").as_deref(), Some("pivo-2"));
}

#[test]
fn category_slug_ignores_trailing_slash() {
    assert_eq!(
        category_slug("https://alkoteka.com/catalog/vino-1/").as_deref(),
        Some("vino-1")
    );
}

#[test]
fn category_slug_none_for_bare_origin() {
    assert!(category_slug("https://").is_none());
    assert!(category_slug("").is_none());
}

#[test]
fn config_error_message_names_variable_and_reason() {
    let map = HashMap::from([("ALKOHARVEST_MAX_PAGES", "lots")]);
    let err = build_harvest_config(lookup_from_map(&map)).unwrap_err();
    let ConfigError::InvalidEnvVar { ref var, .. } = err;
    assert_eq!(var, "ALKOHARVEST_MAX_PAGES");
    assert!(
        err.to_string()
            .starts_with("invalid value for ALKOHARVEST_MAX_PAGES: "),
        "{err}"
    );
}
