use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Placeholder for attributes the catalog did not provide (brand, country,
/// volume range, ...).
pub const NOT_SPECIFIED: &str = "not specified";

/// Placeholder for content the catalog did not provide (description, image,
/// product id).
pub const ABSENT: &str = "absent";

/// Vendor code used when a listing entry carries none.
pub const UNKNOWN_VENDOR_CODE: &str = "unknown";

/// Product data captured from a listing page and handed to exactly one
/// detail fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialProductRecord {
    /// Moment the listing entry was collected.
    pub timestamp: DateTime<Utc>,
    /// Vendor code, `"unknown"` when the listing omitted it.
    #[serde(rename = "RPC")]
    pub rpc: String,
    /// Canonical product page URL.
    pub url: String,
    pub title: String,
    /// Titles of the entry's `action_labels`, in listing order.
    pub marketing_tags: Vec<String>,
}

/// One harvested product, flattened from the listing and detail responses.
///
/// Every string field carries either real data or one of [`NOT_SPECIFIED`],
/// [`ABSENT`] or [`UNKNOWN_VENDOR_CODE`]; consumers never see a missing
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "RPC")]
    pub rpc: String,
    pub url: String,
    /// Listing title, with the volume appended when the title lacks it.
    pub title: String,
    pub marketing_tags: Vec<String>,
    pub brand: String,
    /// `[parent category, category]`; either level may be missing.
    pub section: [Option<String>; 2],
    pub price_data: PriceData,
    pub stock: Stock,
    pub assets: Assets,
    pub metadata: ItemMetadata,
}

/// Prices keep the JSON number the catalog sent, so `100` stays `100`
/// rather than becoming `100.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    pub current: Option<Number>,
    /// Price before discount; equals `current` when there is no discount.
    pub original: Option<Number>,
    /// e.g. `"discount 20%"`.
    pub sale_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub in_stock: bool,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub main_image: String,
    /// Zero or one element: the catalog only exposes the main image.
    pub set_images: Vec<String>,
    pub view360: Vec<String>,
    pub video: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(rename = "__description")]
    pub description: String,
    pub id_product: String,
    /// Same value as [`NormalizedItem::rpc`].
    pub vendor_code: String,
    pub country: String,
    pub manufacturer: String,
    pub packaging: String,
    /// e.g. `"0.5 л"` or `"0.33-0.5 л"`.
    pub volume: String,
    /// e.g. `"4.5%"` or `"4-6%"`.
    pub alcohol_percent: String,
    pub product_type: String,
}

impl NormalizedItem {
    /// Returns `true` when the item was sold below its previous price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        let original = self.price_data.original.as_ref().and_then(Number::as_f64);
        let current = self.price_data.current.as_ref().and_then(Number::as_f64);
        matches!((original, current), (Some(original), Some(current)) if original > current)
    }
}
