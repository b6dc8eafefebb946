//! Response types for the catalog's product web API.
//!
//! ## Observed shape
//!
//! ### Listing (`GET /web-api/v1/product?city_uuid=..&page=..&per_page=..&root_category_slug=..`)
//! `results` is an array of product summaries. It is an empty array past the
//! last page; we also accept `null` or a missing key and treat both as empty.
//!
//! ### `vendor_code`
//! Usually a JSON number (`77012`) but strings have been seen too. Kept as a
//! raw [`serde_json::Value`] and rendered as text during pagination.
//!
//! ### `action_labels`
//! Normally an array of `{ "title": "..." }` objects. Entries without a title
//! appear for purely visual badges. The key may be missing or `null`, so it is
//! kept as a raw value and filtered during pagination.
//!
//! ### Detail (`GET /web-api/v1/product/{slug}?city_uuid=..`)
//! `results` is a single object, or `null` for products removed between the
//! listing and the detail request.
//!
//! ### `description_blocks`
//! Keyed by `code`. Value-list blocks (`brend`, `vid`, ...) carry `values`;
//! range blocks (`obem`, `krepost`) carry numeric `min` / `max`. Numbers keep
//! their JSON text so `0.5` and `1` render exactly as the API sent them.
//!
//! ### Field types
//! Scalars drift between numbers and strings (`"quantity_total": 3.0`, a
//! brand named `1664`). Detail fields go through the [`lenient`] readers: a
//! value of the wrong shape becomes `None` and the normalizer falls back to
//! its sentinel, so one odd field never costs the whole product.

use serde::Deserialize;
use serde_json::{Number, Value};

/// Top-level response from the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub results: Option<Vec<ListingEntry>>,
}

/// A product summary on a listing page.
#[derive(Debug, Deserialize)]
pub struct ListingEntry {
    #[serde(default)]
    pub vendor_code: Option<serde_json::Value>,

    /// Absolute product page URL, e.g.
    /// `"https://alkoteka.com/product/pivo-1/zhigulevskoe_77012"`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub product_url: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    /// Marketing badges; see the module docs for the tolerated shapes.
    #[serde(default)]
    pub action_labels: Option<serde_json::Value>,
}

/// Top-level response from the detail endpoint.
#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    #[serde(default)]
    pub results: Option<DetailProduct>,
}

/// Full attributes of one product.
#[derive(Debug, Default, Deserialize)]
pub struct DetailProduct {
    #[serde(default, deserialize_with = "lenient::text")]
    pub uuid: Option<String>,

    /// Current shelf price.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<Number>,

    /// Price before the running promotion; `null` when there is none.
    #[serde(default, deserialize_with = "lenient::number")]
    pub prev_price: Option<Number>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity_total: Option<i64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub country_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::nested")]
    pub category: Option<Category>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub description_blocks: Option<Vec<DescriptionBlock>>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub text_blocks: Option<Vec<TextBlock>>,
}

/// A catalog category; `parent` nests one level up.
#[derive(Debug, Default, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::nested")]
    pub parent: Option<Box<Category>>,
}

/// A keyed attribute record, either a value list or a numeric range.
#[derive(Debug, Default, Deserialize)]
pub struct DescriptionBlock {
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: Option<String>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub values: Option<Vec<NamedValue>>,

    #[serde(default)]
    pub min: Option<Value>,

    #[serde(default)]
    pub max: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedValue {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

/// A titled free-text section of the product page.
#[derive(Debug, Default, Deserialize)]
pub struct TextBlock {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub content: Option<String>,
}

/// Renders a JSON scalar as text: numbers keep their JSON form, strings are
/// taken as-is. `null`, empty strings and composite values yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

/// `deserialize_with` readers that never fail on a well-formed JSON value.
///
/// Each one buffers the field as a [`Value`] and converts what it can;
/// anything else yields `None`.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Number, Value};

    use super::scalar_text;

    /// Strings as-is (trimmed), numbers as their JSON text.
    pub(super) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_text(&Value::deserialize(d)?))
    }

    /// JSON numbers unchanged; numeric strings such as `"129.90"` parsed.
    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Number>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => Some(n),
            Value::String(s) => s.trim().parse::<Number>().ok(),
            _ => None,
        })
    }

    /// Whole counts; `3.0` and `"3"` read as 3, fractions are truncated.
    pub(super) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let Some(n) = number(d)? else {
            return Ok(None);
        };
        #[allow(clippy::cast_possible_truncation)]
        let count = n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64));
        Ok(count)
    }

    /// A nested object; a value of any other shape is dropped.
    pub(super) fn nested<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(Value::deserialize(d)?).ok())
    }

    /// An array of objects; entries that do not parse are dropped, a
    /// non-array value yields `None`.
    pub(super) fn list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(d)? else {
            return Ok(None);
        };
        Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ))
    }
}
