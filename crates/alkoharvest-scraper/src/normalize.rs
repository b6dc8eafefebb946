//! Normalization from raw detail responses to [`NormalizedItem`].
//!
//! Every field the catalog may omit resolves to a sentinel from
//! [`alkoharvest_core::items`]; nothing here fails on missing data.

use alkoharvest_core::{
    Assets, ItemMetadata, NormalizedItem, PartialProductRecord, PriceData, Stock, ABSENT,
    NOT_SPECIFIED,
};
use serde_json::Number;

use crate::discount::{compute_discount, NO_DISCOUNT};
use crate::types::{scalar_text, Category, DescriptionBlock, DetailProduct, DetailResponse};

/// Unit suffix for volume ranges (litres).
pub const VOLUME_UNIT: &str = " л";

/// Unit suffix for alcohol strength ranges.
pub const STRENGTH_UNIT: &str = "%";

/// Title of the text block holding the product description.
pub const DESCRIPTION_LABEL: &str = "Описание";

type BlockHandler = fn(&DescriptionBlock, &mut Attributes);

/// Description-block codes this normalizer understands. Unknown codes are
/// ignored.
const BLOCK_HANDLERS: &[(&str, BlockHandler)] = &[
    ("brend", set_brand),
    ("vid", set_product_type),
    ("obem", set_volume),
    ("proizvoditel", set_manufacturer),
    ("vid-upakovki", set_packaging),
    ("krepost", set_strength),
];

fn set_brand(block: &DescriptionBlock, attrs: &mut Attributes) {
    attrs.brand = first_value_name(block);
}

fn set_product_type(block: &DescriptionBlock, attrs: &mut Attributes) {
    attrs.product_type = first_value_name(block);
}

fn set_manufacturer(block: &DescriptionBlock, attrs: &mut Attributes) {
    attrs.manufacturer = first_value_name(block);
}

fn set_packaging(block: &DescriptionBlock, attrs: &mut Attributes) {
    attrs.packaging = first_value_name(block);
}

fn set_volume(block: &DescriptionBlock, attrs: &mut Attributes) {
    attrs.volume = Some(RangeBounds::of(block));
}

fn set_strength(block: &DescriptionBlock, attrs: &mut Attributes) {
    attrs.strength = Some(RangeBounds::of(block));
}

/// Attributes gathered from `description_blocks`.
#[derive(Debug, Default)]
struct Attributes {
    brand: Option<String>,
    product_type: Option<String>,
    manufacturer: Option<String>,
    packaging: Option<String>,
    volume: Option<RangeBounds>,
    strength: Option<RangeBounds>,
}

/// `min` / `max` of a range block, rendered as text.
#[derive(Debug, Default)]
struct RangeBounds {
    min: Option<String>,
    max: Option<String>,
}

impl RangeBounds {
    fn of(block: &DescriptionBlock) -> Self {
        Self {
            min: block.min.as_ref().and_then(scalar_text),
            max: block.max.as_ref().and_then(scalar_text),
        }
    }

    fn format(&self, unit: &str) -> String {
        format_range(self.min.as_deref(), self.max.as_deref(), unit)
    }
}

/// Normalizes a detail response, combined with the partial record captured
/// on the listing page, into a [`NormalizedItem`].
///
/// Returns `None` (with a warning) when the response carries no product.
#[must_use]
pub fn normalize_detail(
    partial: PartialProductRecord,
    response: DetailResponse,
) -> Option<NormalizedItem> {
    let Some(product) = response.results else {
        tracing::warn!(url = %partial.url, rpc = %partial.rpc, "product not found in detail response, skipping");
        return None;
    };
    Some(normalize_product(partial, &product))
}

fn normalize_product(partial: PartialProductRecord, product: &DetailProduct) -> NormalizedItem {
    let attrs = collect_attributes(product.description_blocks.as_deref().unwrap_or_default());

    let volume = attrs
        .volume
        .as_ref()
        .map_or_else(|| NOT_SPECIFIED.to_owned(), |r| r.format(VOLUME_UNIT));
    let alcohol_percent = attrs
        .strength
        .as_ref()
        .map_or_else(|| NOT_SPECIFIED.to_owned(), |r| r.format(STRENGTH_UNIT));

    let title = augment_title(&partial.title, &volume);
    let section = section(product.category.as_ref());
    let price_data = price_data(product.price.clone(), product.prev_price.clone());

    let count = product.quantity_total.unwrap_or(0);
    let stock = Stock {
        in_stock: count > 0,
        count,
    };

    let main_image = product
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    let assets = Assets {
        set_images: main_image.iter().cloned().collect(),
        main_image: main_image.unwrap_or_else(|| ABSENT.to_owned()),
        view360: Vec::new(),
        video: Vec::new(),
    };

    let description = product
        .text_blocks
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|block| block.title.as_deref() == Some(DESCRIPTION_LABEL))
        .and_then(|block| block.content.clone())
        .unwrap_or_else(|| ABSENT.to_owned());

    let not_specified = || NOT_SPECIFIED.to_owned();

    let metadata = ItemMetadata {
        description,
        id_product: product.uuid.clone().unwrap_or_else(|| ABSENT.to_owned()),
        vendor_code: partial.rpc.clone(),
        country: product.country_name.clone().unwrap_or_else(not_specified),
        manufacturer: attrs.manufacturer.unwrap_or_else(not_specified),
        packaging: attrs.packaging.unwrap_or_else(not_specified),
        volume,
        alcohol_percent,
        product_type: attrs.product_type.unwrap_or_else(not_specified),
    };

    tracing::info!(rpc = %partial.rpc, title = %title, "product collected");

    NormalizedItem {
        timestamp: partial.timestamp,
        rpc: partial.rpc,
        url: partial.url,
        title,
        marketing_tags: partial.marketing_tags,
        brand: attrs.brand.unwrap_or_else(not_specified),
        section,
        price_data,
        stock,
        assets,
        metadata,
    }
}

/// Runs each description block through [`BLOCK_HANDLERS`].
///
/// The first block seen for a code is authoritative, even when it carries no
/// value; later blocks with the same code are ignored.
fn collect_attributes(blocks: &[DescriptionBlock]) -> Attributes {
    let mut attrs = Attributes::default();
    let mut claimed: Vec<&str> = Vec::new();

    for block in blocks {
        let Some(code) = block.code.as_deref() else {
            continue;
        };
        let Some(&(known, handler)) = BLOCK_HANDLERS.iter().find(|(c, _)| *c == code) else {
            continue;
        };
        if claimed.contains(&known) {
            tracing::debug!(code = known, "duplicate description block ignored");
            continue;
        }
        claimed.push(known);
        handler(block, &mut attrs);
    }

    attrs
}

fn first_value_name(block: &DescriptionBlock) -> Option<String> {
    block
        .values
        .as_deref()?
        .first()?
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Formats a `min`/`max` range with `unit` appended.
///
/// Equal bounds collapse to a single value (`"0.5 л"`), different bounds
/// render as `"0.5-1 л"`, and a missing bound gives [`NOT_SPECIFIED`].
/// Bounds are equal when their text matches or they parse to the same
/// number, so `1` and `1.0` collapse.
#[must_use]
pub fn format_range(min: Option<&str>, max: Option<&str>, unit: &str) -> String {
    match (min, max) {
        (Some(min), Some(max)) if same_bound(min, max) => format!("{min}{unit}"),
        (Some(min), Some(max)) => format!("{min}-{max}{unit}"),
        _ => NOT_SPECIFIED.to_owned(),
    }
}

fn same_bound(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        #[allow(clippy::float_cmp)]
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// Appends `volume` to `title` unless it is the sentinel or already part of
/// the title.
#[must_use]
pub fn augment_title(title: &str, volume: &str) -> String {
    if volume.is_empty() || volume == NOT_SPECIFIED || title.contains(volume) {
        title.to_owned()
    } else {
        format!("{title}, {volume}")
    }
}

/// `[parent category name, category name]`.
fn section(category: Option<&Category>) -> [Option<String>; 2] {
    let parent = category
        .and_then(|c| c.parent.as_deref())
        .and_then(|p| p.name.clone());
    let name = category.and_then(|c| c.name.clone());
    [parent, name]
}

fn price_data(price: Option<Number>, prev_price: Option<Number>) -> PriceData {
    match prev_price {
        Some(original) => PriceData {
            sale_tag: compute_discount(original.as_f64(), price.as_ref().and_then(Number::as_f64)),
            current: price,
            original: Some(original),
        },
        None => PriceData {
            current: price.clone(),
            original: price,
            sale_tag: NO_DISCOUNT.to_owned(),
        },
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
