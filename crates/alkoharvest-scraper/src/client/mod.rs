//! HTTP client for the catalog's product web API.

use std::time::Duration;

use alkoharvest_core::HarvestConfig;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::pagination::ListingQuery;
use crate::retry::retry_with_backoff;
use crate::types::{DetailResponse, ListingResponse};

/// HTTP client for the listing and detail endpoints.
///
/// Maps 429, 404 and other non-2xx responses to typed errors. Transient
/// errors (429, 5xx, timeouts, connection failures) are retried with
/// exponential back-off up to `max_retries` additional attempts.
pub struct AlkotekaClient {
    client: Client,
    /// Listing endpoint; detail URLs append the product slug to its path.
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl AlkotekaClient {
    /// Creates a client with configured timeout, `User-Agent` and retry policy.
    ///
    /// `base_url` is the listing endpoint, e.g.
    /// `"https://alkoteka.com/web-api/v1/product"`. Point it at a mock server
    /// in tests.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] if
    /// `base_url` does not parse as a hierarchical URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = parse_base_url(base_url)?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the harvest configuration.
    ///
    /// # Errors
    ///
    /// See [`AlkotekaClient::new`].
    pub fn from_config(config: &HarvestConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Fetches one listing page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    /// - [`ScraperError::Deserialize`]: body is not the expected JSON (not retried).
    pub async fn fetch_listing_page(
        &self,
        query: &ListingQuery,
    ) -> Result<ListingResponse, ScraperError> {
        let url = self.listing_url(query);
        let context = format!(
            "listing page {} of category {}",
            query.page, query.category_slug
        );
        self.get_json(&url, &context).await
    }

    /// Fetches the detail record for the product identified by `slug`.
    ///
    /// # Errors
    ///
    /// Same as [`AlkotekaClient::fetch_listing_page`].
    pub async fn fetch_product_detail(
        &self,
        slug: &str,
        city_uuid: &str,
    ) -> Result<DetailResponse, ScraperError> {
        let url = self.detail_url(slug, city_uuid)?;
        let context = format!("product detail {slug}");
        self.get_json(&url, &context).await
    }

    fn listing_url(&self, query: &ListingQuery) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("city_uuid", &query.city_uuid)
            .append_pair("page", &query.page.to_string())
            .append_pair("per_page", &query.page_size.to_string())
            .append_pair("root_category_slug", &query.category_slug);
        url.to_string()
    }

    fn detail_url(&self, slug: &str, city_uuid: &str) -> Result<String, ScraperError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ScraperError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot carry path segments".to_owned(),
            })?
            .pop_if_empty()
            .push(slug);
        url.query_pairs_mut().append_pair("city_uuid", city_uuid);
        Ok(url.to_string())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(ScraperError::RateLimited {
                    url: url.to_owned(),
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
                context: context.to_owned(),
                source: e,
            })
        })
        .await
    }
}

/// Parses the listing endpoint URL, dropping any trailing slash so detail
/// URLs come out as `{base}/{slug}`.
fn parse_base_url(base_url: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
        ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        }
    })?;
    if url.cannot_be_a_base() {
        return Err(ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "URL has no hierarchical path".to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
