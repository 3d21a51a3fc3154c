//! Maps raw API part records onto the canonical [`Product`].
//!
//! Both entry points are total: any record, however malformed, yields a
//! `Product` with `price >= 0`, a non-empty image list and a canonical
//! condition.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use partmart_core::{Condition, ListingStatus, Product, ShippingOption, YearRange};
use serde_json::Value;

use crate::coerce::{
    coalesce, first_truthy, is_truthy, string_list, text, text_or, to_count, to_number,
};
use crate::image::{gallery_image_urls, listing_image_url};
use crate::types::RawPartRecord;

const DEFAULT_PART_NAME: &str = "Part";

/// Normalizes a record for list and grid cards: one resolved image, no
/// compatibility or specification data.
#[must_use]
pub fn normalize_part(record: &RawPartRecord, base_url: &str) -> Product {
    normalize_part_at(record, base_url, Utc::now())
}

/// Normalizes a record for the details screen: the whole image gallery,
/// compatible models, specifications, and a year range that may come from
/// `yearRange`.
#[must_use]
pub fn normalize_part_detail(record: &RawPartRecord, base_url: &str) -> Product {
    normalize_part_detail_at(record, base_url, Utc::now())
}

pub(crate) fn normalize_part_at(
    record: &RawPartRecord,
    base_url: &str,
    now: DateTime<Utc>,
) -> Product {
    let year = to_year(record.year.as_ref());
    let mut product = base_product(record, now);
    product.images = vec![listing_image_url(record, base_url)];
    product.year_range = YearRange { from: year, to: year };
    product
}

pub(crate) fn normalize_part_detail_at(
    record: &RawPartRecord,
    base_url: &str,
    now: DateTime<Utc>,
) -> Product {
    let mut product = base_product(record, now);
    product.images = gallery_image_urls(record, base_url);
    product.compatible_models = string_list(record.compatible_models.as_ref());
    product.specifications = specifications(record.specifications.as_ref());
    product.year_range = detail_year_range(record);
    product
}

fn base_product(record: &RawPartRecord, now: DateTime<Utc>) -> Product {
    let r = record;
    Product {
        id: text(&[r.id.as_ref()]),
        part_name: text_or(&[r.part_name.as_ref(), r.name.as_ref()], DEFAULT_PART_NAME),
        part_number: text(&[r.part_number.as_ref()]),
        brand: text(&[r.brand.as_ref(), r.car_brand.as_ref()]),
        car_brand: text(&[r.car_brand.as_ref()]),
        model: text(&[r.model.as_ref()]),
        car_model: text(&[r.car_model.as_ref()]),
        category: text(&[r.category.as_ref()]),
        compatible_models: Vec::new(),
        year_range: YearRange::default(),
        price: price(r),
        condition: Condition::canonicalize(&text(&[r.condition.as_ref()])),
        stock_count: stock_count(r),
        description: text(&[r.description.as_ref()]),
        images: Vec::new(),
        specifications: BTreeMap::new(),
        features: string_list(r.features.as_ref()),
        seller_id: seller_id(r),
        seller_name: text(&[r.seller_name.as_ref()]),
        seller_phone: text(&[r.seller_phone.as_ref()]),
        seller_city: text(&[r.city.as_ref()]),
        seller_district: text(&[r.district.as_ref()]),
        status: status(r),
        views: count(r.views.as_ref()),
        rating: rating(r.rating.as_ref()),
        review_count: count(r.review_count.as_ref()),
        is_oem: r.is_oem.as_ref().is_some_and(is_truthy),
        shipping_options: shipping_options(r.shipping_options.as_ref()),
        created_at: timestamp(r.created_at.as_ref(), now),
        updated_at: timestamp(r.updated_at.as_ref(), now),
    }
}

/// `salePrice`, else `price`, else `0`. Non-numeric, negative and infinite
/// values read as `0`.
fn price(record: &RawPartRecord) -> f64 {
    let raw = coalesce(&[record.sale_price.as_ref(), record.price.as_ref()]).map_or(0.0, to_number);
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// Missing, zero or unreadable stock reads as one item in stock.
fn stock_count(record: &RawPartRecord) -> u32 {
    let raw = coalesce(&[record.stock_count.as_ref()]).map_or(1.0, to_number);
    match u32::try_from(to_count(raw)) {
        Ok(0) => 1,
        Ok(n) => n,
        Err(_) => u32::MAX,
    }
}

fn count(value: Option<&Value>) -> u64 {
    value.map_or(0, |v| to_count(to_number(v)))
}

fn rating(value: Option<&Value>) -> f64 {
    let raw = value.map_or(0.0, to_number);
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// Only an explicit `isActive: false` expires a listing.
fn status(record: &RawPartRecord) -> ListingStatus {
    if matches!(record.is_active, Some(Value::Bool(false))) {
        ListingStatus::Expired
    } else {
        ListingStatus::Active
    }
}

/// `seller`, else `userId`. A populated seller object contributes its `_id`
/// (or `id`); one carrying neither falls through to `userId`.
fn seller_id(record: &RawPartRecord) -> String {
    let user_id = || text(&[record.user_id.as_ref()]);
    match first_truthy(&[record.seller.as_ref(), record.user_id.as_ref()]) {
        Some(Value::Object(seller)) => {
            let id = text(&[seller.get("_id"), seller.get("id")]);
            if id.is_empty() {
                user_id()
            } else {
                id
            }
        }
        Some(other) => text(&[Some(other)]),
        None => String::new(),
    }
}

fn shipping_options(value: Option<&Value>) -> Vec<ShippingOption> {
    value
        .filter(|v| v.is_array())
        .and_then(|v| serde_json::from_value::<Vec<ShippingOption>>(v.clone()).ok())
        .filter(|options| !options.is_empty())
        .unwrap_or_else(|| vec![ShippingOption::Delivery])
}

fn timestamp(value: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map_or(now, |t| t.with_timezone(&Utc))
}

/// Model year; anything outside `0..=u16::MAX` reads as `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_year(value: Option<&Value>) -> u16 {
    let raw = first_truthy(&[value]).map_or(0.0, to_number);
    if raw.is_finite() && raw > 0.0 && raw <= f64::from(u16::MAX) {
        raw.trunc() as u16
    } else {
        0
    }
}

/// `year` applies to both ends; otherwise `yearRange.from` / `yearRange.to`.
fn detail_year_range(record: &RawPartRecord) -> YearRange {
    let year = to_year(record.year.as_ref());
    if year > 0 {
        return YearRange { from: year, to: year };
    }
    let range = record.year_range.as_ref();
    YearRange {
        from: to_year(range.and_then(|r| r.get("from"))),
        to: to_year(range.and_then(|r| r.get("to"))),
    }
}

/// String-valued entries of a specification object; other values are skipped.
fn specifications(value: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(key, v)| v.as_str().map(|s| (key.clone(), s.to_owned())))
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
