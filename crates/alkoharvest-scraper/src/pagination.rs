//! Page-number pagination over the listing endpoint.
//!
//! The listing API reports no total count, so a page is treated as the last
//! one when it returns fewer entries than were requested. When a category
//! holds an exact multiple of `per_page` products this costs one extra
//! request, which comes back empty and ends the category.
//!
//! ## States
//!
//! ```text
//! FetchingPage(1) -> FetchingPage(2) -> ... -> Exhausted
//! ```

use alkoharvest_core::{PartialProductRecord, NOT_SPECIFIED, UNKNOWN_VENDOR_CODE};
use chrono::{DateTime, Utc};

use crate::types::{scalar_text, ListingEntry, ListingResponse};

/// Parameters of one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Sent as `root_category_slug`.
    pub category_slug: String,
    /// 1-based page number.
    pub page: u32,
    /// Sent as `per_page`.
    pub page_size: u32,
    pub city_uuid: String,
}

impl ListingQuery {
    #[must_use]
    pub fn first_page(category_slug: &str, page_size: u32, city_uuid: &str) -> Self {
        Self {
            category_slug: category_slug.to_owned(),
            page: 1,
            page_size,
            city_uuid: city_uuid.to_owned(),
        }
    }

    /// Same query, one page further.
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }
}

/// Where a category's pagination stands after a page was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    FetchingPage(ListingQuery),
    Exhausted,
}

/// A detail fetch scheduled from a listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    /// Last path segment of the product URL.
    pub slug: String,
    pub city_uuid: String,
    /// Handed unchanged to the normalizer once the detail arrives.
    pub partial: PartialProductRecord,
}

/// Everything one listing page schedules.
#[derive(Debug)]
pub struct ListingPagePlan {
    pub details: Vec<DetailRequest>,
    /// Entries dropped because no slug could be derived from their URL.
    pub skipped: usize,
    pub next: PageState,
}

/// Turns a listing response into detail requests and the next-page decision.
///
/// `collected_at` stamps every partial record built from this page. Pages at
/// or beyond `max_pages` never schedule a successor.
#[must_use]
pub fn plan_listing_page(
    query: &ListingQuery,
    response: ListingResponse,
    collected_at: DateTime<Utc>,
    max_pages: u32,
) -> ListingPagePlan {
    let entries = response.results.unwrap_or_default();
    if entries.is_empty() {
        tracing::info!(
            category = %query.category_slug,
            page = query.page,
            "no products on listing page, category exhausted"
        );
        return ListingPagePlan {
            details: Vec::new(),
            skipped: 0,
            next: PageState::Exhausted,
        };
    }

    tracing::info!(
        category = %query.category_slug,
        page = query.page,
        count = entries.len(),
        "products found on listing page"
    );

    let full_page = u32::try_from(entries.len()).is_ok_and(|n| n == query.page_size);

    let mut details = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for entry in entries {
        match detail_request(entry, &query.city_uuid, collected_at) {
            Some(request) => details.push(request),
            None => skipped += 1,
        }
    }

    let next = if !full_page {
        PageState::Exhausted
    } else if query.page >= max_pages {
        tracing::warn!(
            category = %query.category_slug,
            page = query.page,
            max_pages,
            "page limit reached, stopping category early"
        );
        PageState::Exhausted
    } else {
        let next = query.next_page();
        tracing::info!(
            category = %next.category_slug,
            page = next.page,
            "moving on to next listing page"
        );
        PageState::FetchingPage(next)
    };

    ListingPagePlan {
        details,
        skipped,
        next,
    }
}

/// Builds the detail request for one listing entry, or `None` (with a
/// warning) when the entry has no usable product URL.
fn detail_request(
    entry: ListingEntry,
    city_uuid: &str,
    collected_at: DateTime<Utc>,
) -> Option<DetailRequest> {
    let marketing_tags = marketing_tags(entry.action_labels.as_ref());
    let rpc = entry
        .vendor_code
        .as_ref()
        .and_then(scalar_text)
        .unwrap_or_else(|| UNKNOWN_VENDOR_CODE.to_owned());

    let Some(url) = entry.product_url.filter(|u| !u.trim().is_empty()) else {
        tracing::warn!(rpc = %rpc, "listing entry has no product_url, skipping");
        return None;
    };
    let Some(slug) = product_slug(&url) else {
        tracing::warn!(url = %url, "could not extract product slug from URL, skipping");
        return None;
    };

    let title = entry
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.to_owned());

    Some(DetailRequest {
        slug: slug.to_owned(),
        city_uuid: city_uuid.to_owned(),
        partial: PartialProductRecord {
            timestamp: collected_at,
            rpc,
            url,
            title,
            marketing_tags,
        },
    })
}

/// Returns the last `/`-separated segment of a product URL, or `None` when
/// it is empty (e.g. a trailing slash).
#[must_use]
pub fn product_slug(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Collects the `title` of each object in `action_labels`.
///
/// Non-array values yield no tags; non-object entries and entries without a
/// non-empty string title are skipped.
#[must_use]
pub fn marketing_tags(action_labels: Option<&serde_json::Value>) -> Vec<String> {
    let Some(labels) = action_labels.and_then(serde_json::Value::as_array) else {
        return Vec::new();
    };
    labels
        .iter()
        .filter_map(|label| label.get("title")?.as_str())
        .filter(|title| !title.is_empty())
        .map(str::to_owned)
        .collect()
}
