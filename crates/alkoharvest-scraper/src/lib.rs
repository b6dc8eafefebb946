pub mod client;
pub mod discount;
pub mod error;
pub mod harvest;
pub mod normalize;
pub mod pagination;
mod retry;
pub mod types;

pub use client::AlkotekaClient;
pub use discount::compute_discount;
pub use error::ScraperError;
pub use harvest::{run_harvest, HarvestPlan, HarvestSummary};
pub use normalize::normalize_detail;
pub use pagination::{plan_listing_page, DetailRequest, ListingPagePlan, ListingQuery, PageState};
pub use types::{DetailResponse, ListingResponse};
