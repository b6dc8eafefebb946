//! Crawl orchestration: listing pages fan out to detail fetches, detail
//! responses become items on the sink.
//!
//! All requests share one FIFO work queue. At most
//! `max_concurrent_requests` are in flight; each completed request may
//! enqueue more work (detail fetches, the next listing page). A failed page
//! or product is logged and dropped without affecting the rest of the run.

use std::collections::VecDeque;

use alkoharvest_core::{HarvestConfig, NormalizedItem};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;

use crate::client::AlkotekaClient;
use crate::error::ScraperError;
use crate::normalize::normalize_detail;
use crate::pagination::{plan_listing_page, DetailRequest, ListingQuery, PageState};
use crate::types::{DetailResponse, ListingResponse};

/// What to crawl and how hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestPlan {
    pub city_uuid: String,
    pub start_categories: Vec<String>,
    pub page_size: u32,
    pub max_pages: u32,
    pub max_concurrent_requests: usize,
}

impl HarvestPlan {
    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            city_uuid: config.city_uuid.clone(),
            start_categories: config.start_categories.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            max_concurrent_requests: config.max_concurrent_requests,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HarvestSummary {
    pub pages_fetched: usize,
    pub items_emitted: usize,
    /// Listing entries without a slug plus detail responses without a product.
    pub products_skipped: usize,
    /// Requests that failed after retries or returned unparseable JSON.
    pub failed_fetches: usize,
}

enum Fetch {
    Listing(ListingQuery),
    Detail(DetailRequest),
}

enum Fetched {
    Listing(ListingQuery, Result<ListingResponse, ScraperError>),
    Detail(DetailRequest, Result<DetailResponse, ScraperError>),
}

async fn perform(client: &AlkotekaClient, fetch: Fetch) -> Fetched {
    match fetch {
        Fetch::Listing(query) => {
            let result = client.fetch_listing_page(&query).await;
            Fetched::Listing(query, result)
        }
        Fetch::Detail(request) => {
            let result = client
                .fetch_product_detail(&request.slug, &request.city_uuid)
                .await;
            Fetched::Detail(request, result)
        }
    }
}

/// Crawls every start category and sends each normalized item to `sink`.
///
/// Items arrive in completion order; there is no ordering between products.
///
/// # Errors
///
/// Returns [`ScraperError::SinkClosed`] if the receiving side of `sink` is
/// dropped mid-run. Fetch and parse failures are logged and counted in the
/// summary, never returned.
pub async fn run_harvest(
    client: &AlkotekaClient,
    plan: &HarvestPlan,
    sink: mpsc::Sender<NormalizedItem>,
) -> Result<HarvestSummary, ScraperError> {
    let mut summary = HarvestSummary::default();
    let limit = plan.max_concurrent_requests.max(1);

    let mut queue: VecDeque<Fetch> = plan
        .start_categories
        .iter()
        .map(|category| {
            Fetch::Listing(ListingQuery::first_page(
                category,
                plan.page_size,
                &plan.city_uuid,
            ))
        })
        .collect();
    let mut in_flight = FuturesUnordered::new();

    loop {
        while in_flight.len() < limit {
            let Some(fetch) = queue.pop_front() else {
                break;
            };
            in_flight.push(perform(client, fetch));
        }

        let Some(fetched) = in_flight.next().await else {
            break;
        };

        match fetched {
            Fetched::Listing(query, Ok(response)) => {
                summary.pages_fetched += 1;
                let page = plan_listing_page(&query, response, chrono::Utc::now(), plan.max_pages);
                summary.products_skipped += page.skipped;
                queue.extend(page.details.into_iter().map(Fetch::Detail));
                if let PageState::FetchingPage(next) = page.next {
                    queue.push_back(Fetch::Listing(next));
                }
            }
            Fetched::Listing(query, Err(e)) => {
                summary.failed_fetches += 1;
                tracing::error!(
                    category = %query.category_slug,
                    page = query.page,
                    error = %e,
                    "listing page failed, category stops here"
                );
            }
            Fetched::Detail(request, Ok(response)) => {
                match normalize_detail(request.partial, response) {
                    Some(item) => {
                        sink.send(item)
                            .await
                            .map_err(|_| ScraperError::SinkClosed)?;
                        summary.items_emitted += 1;
                    }
                    None => summary.products_skipped += 1,
                }
            }
            Fetched::Detail(request, Err(e)) => {
                summary.failed_fetches += 1;
                tracing::error!(
                    slug = %request.slug,
                    rpc = %request.partial.rpc,
                    error = %e,
                    "product detail failed, skipping"
                );
            }
        }
    }

    tracing::info!(
        pages = summary.pages_fetched,
        items = summary.items_emitted,
        skipped = summary.products_skipped,
        failed = summary.failed_fetches,
        "harvest finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HarvestConfig {
        HarvestConfig {
            api_base_url: "https://alkoteka.com/web-api/v1/product".to_owned(),
            city_uuid: "4a70f9e0-46ae-11e7-83ff-00155d026416".to_owned(),
            start_categories: vec!["pivo-2".to_owned(), "vino-1".to_owned()],
            page_size: 24,
            max_pages: 10,
            max_concurrent_requests: 4,
            log_level: "info".to_owned(),
            request_timeout_secs: 30,
            user_agent: "alkoharvest-test/0.1".to_owned(),
            max_retries: 0,
            retry_backoff_base_ms: 0,
        }
    }

    #[test]
    fn plan_from_config_copies_crawl_settings() {
        let plan = HarvestPlan::from_config(&config());
        assert_eq!(plan.city_uuid, "4a70f9e0-46ae-11e7-83ff-00155d026416");
        assert_eq!(plan.start_categories, vec!["pivo-2", "vino-1"]);
        assert_eq!(plan.page_size, 24);
        assert_eq!(plan.max_pages, 10);
        assert_eq!(plan.max_concurrent_requests, 4);
    }

    #[tokio::test]
    async fn empty_plan_finishes_without_requests() {
        let client = AlkotekaClient::from_config(&config()).unwrap();
        let plan = HarvestPlan {
            start_categories: vec![],
            ..HarvestPlan::from_config(&config())
        };
        let (tx, mut rx) = mpsc::channel(4);
        let summary = run_harvest(&client, &plan, tx).await.unwrap();
        assert_eq!(summary, HarvestSummary::default());
        assert!(rx.recv().await.is_none());
    }
}
