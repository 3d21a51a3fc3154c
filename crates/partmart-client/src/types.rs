//! Wire shapes of the parts API.
//!
//! Records are kept deliberately loose: every field is an optional raw JSON
//! value, and the normalizer is the only way to turn one into a
//! [`partmart_core::Product`].

use partmart_core::CATEGORY_BY_BRAND;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One part listing exactly as the API sent it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPartRecord {
    #[serde(rename = "_id")]
    pub id: Option<Value>,
    pub part_name: Option<Value>,
    pub name: Option<Value>,
    pub part_number: Option<Value>,
    pub brand: Option<Value>,
    pub car_brand: Option<Value>,
    pub model: Option<Value>,
    pub car_model: Option<Value>,
    pub category: Option<Value>,
    pub compatible_models: Option<Value>,
    pub year: Option<Value>,
    pub year_range: Option<Value>,
    pub price: Option<Value>,
    pub sale_price: Option<Value>,
    pub condition: Option<Value>,
    pub stock_count: Option<Value>,
    pub description: Option<Value>,
    pub image: Option<Value>,
    pub images: Option<Value>,
    pub specifications: Option<Value>,
    pub features: Option<Value>,
    /// Seller id, or a populated seller object carrying `_id`.
    pub seller: Option<Value>,
    pub user_id: Option<Value>,
    pub seller_name: Option<Value>,
    pub seller_phone: Option<Value>,
    pub city: Option<Value>,
    pub district: Option<Value>,
    pub is_active: Option<Value>,
    pub views: Option<Value>,
    pub rating: Option<Value>,
    pub review_count: Option<Value>,
    #[serde(rename = "isOEM")]
    pub is_oem: Option<Value>,
    pub shipping_options: Option<Value>,
    pub created_at: Option<Value>,
    pub updated_at: Option<Value>,
}

impl RawPartRecord {
    /// Reads a record from a JSON object. Anything that is not an object
    /// yields `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// Reads the records of an envelope list. A missing or non-array value is an
/// empty list; elements that are not objects are skipped.
pub(crate) fn records_from(list: Option<&Value>, context: &str) -> Vec<RawPartRecord> {
    let Some(Value::Array(items)) = list else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = RawPartRecord::from_value(item.clone());
            if record.is_none() {
                tracing::warn!(context, index, "skipping non-object part record");
            }
            record
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    /// Lenient read; malformed pagination is treated as absent.
    pub(crate) fn from_value(value: Option<&Value>) -> Option<Self> {
        value
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Single page describing `count` records, used when the listing came from
    /// the legacy endpoint that has no pagination of its own.
    #[must_use]
    pub fn single_page(limit: Option<u32>, count: usize) -> Self {
        let total = u64::try_from(count).unwrap_or(u64::MAX);
        Self {
            page: 1,
            limit: limit.filter(|l| *l > 0).map_or(total, u64::from),
            total,
            pages: 1,
        }
    }
}

/// A page of raw listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartsPage {
    pub records: Vec<RawPartRecord>,
    pub pagination: Option<Pagination>,
    /// `true` when the primary endpoint failed and the legacy list was used.
    pub from_fallback: bool,
}

/// One listing plus the related listings the details screen shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartDetail {
    pub record: RawPartRecord,
    pub related: Vec<RawPartRecord>,
}

/// Query parameters of `GET /api/parts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub car_brand: Option<String>,
}

impl PartsQuery {
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query pairs to send. Blank text values are omitted, and so is the
    /// by-brand category since it is not a real category id.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        let text_params = [
            ("search", self.search.as_deref()),
            ("category", self.category.as_deref()),
            ("carBrand", self.car_brand.as_deref()),
        ];
        for (key, value) in text_params {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            if key == "category" && value == CATEGORY_BY_BRAND {
                continue;
            }
            pairs.push((key, value.to_owned()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_reads_camel_case_and_special_keys() {
        let record = RawPartRecord::from_value(json!({
            "_id": "abc",
            "partName": "Brake pad",
            "isOEM": true,
            "salePrice": "100",
            "unknownField": 1
        }))
        .expect("object should parse");
        assert_eq!(record.id, Some(json!("abc")));
        assert_eq!(record.part_name, Some(json!("Brake pad")));
        assert_eq!(record.is_oem, Some(json!(true)));
        assert_eq!(record.sale_price, Some(json!("100")));
    }

    #[test]
    fn record_rejects_non_objects() {
        assert!(RawPartRecord::from_value(json!(["abc", "Brake pad"])).is_none());
        assert!(RawPartRecord::from_value(json!("abc")).is_none());
        assert!(RawPartRecord::from_value(Value::Null).is_none());
    }

    #[test]
    fn null_fields_read_as_absent() {
        let record = RawPartRecord::from_value(json!({"price": null})).unwrap();
        assert_eq!(record.price, None);
    }

    #[test]
    fn records_from_skips_non_objects() {
        let list = json!([{"_id": "1"}, 7, "x", {"_id": "2"}]);
        let records = records_from(Some(&list), "test");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, Some(json!("2")));
    }

    #[test]
    fn records_from_non_array_is_empty() {
        assert!(records_from(Some(&json!({"_id": "1"})), "test").is_empty());
        assert!(records_from(None, "test").is_empty());
    }

    #[test]
    fn pagination_is_lenient() {
        let parsed = Pagination::from_value(Some(&json!({"page": 2, "total": 40})));
        assert_eq!(
            parsed,
            Some(Pagination {
                page: 2,
                limit: 0,
                total: 40,
                pages: 0
            })
        );
        assert_eq!(Pagination::from_value(Some(&json!({"page": "two"}))), None);
        assert_eq!(Pagination::from_value(Some(&json!(3))), None);
    }

    #[test]
    fn single_page_defaults_limit_to_count() {
        assert_eq!(Pagination::single_page(None, 3).limit, 3);
        assert_eq!(Pagination::single_page(Some(10), 3).limit, 10);
        assert_eq!(Pagination::single_page(Some(10), 3).total, 3);
    }

    #[test]
    fn query_pairs_skip_blank_and_by_brand() {
        let query = PartsQuery {
            page: Some(2),
            limit: Some(20),
            search: Some("  pads ".to_string()),
            category: Some(CATEGORY_BY_BRAND.to_string()),
            car_brand: Some(String::new()),
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
                ("search", "pads".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_include_category_and_brand() {
        let query = PartsQuery {
            category: Some("brakes".to_string()),
            car_brand: Some("Toyota".to_string()),
            ..PartsQuery::default()
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("category", "brakes".to_string()),
                ("carBrand", "Toyota".to_string()),
            ]
        );
    }
}
