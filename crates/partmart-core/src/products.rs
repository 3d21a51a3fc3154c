use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical condition labels shown on listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Used - Excellent")]
    UsedExcellent,
    #[serde(rename = "Used - Good")]
    UsedGood,
    #[serde(rename = "Used - Fair")]
    UsedFair,
    #[serde(rename = "Damaged")]
    Damaged,
}

/// Matcher applied to the lower-cased condition text. Surrounding whitespace
/// is kept, so `" new "` is not an exact match.
enum ConditionRule {
    Exact(&'static str),
    Contains(&'static str),
}

/// Evaluated top-down; the first matching rule wins. The order matters: a
/// string containing both `"good"` and `"fair"` resolves to `Used - Good`.
const CONDITION_RULES: &[(ConditionRule, Condition)] = &[
    (ConditionRule::Exact("new"), Condition::New),
    (ConditionRule::Contains("excellent"), Condition::UsedExcellent),
    (ConditionRule::Contains("good"), Condition::UsedGood),
    (ConditionRule::Contains("fair"), Condition::UsedFair),
    (ConditionRule::Contains("damage"), Condition::Damaged),
    (ConditionRule::Exact("used"), Condition::UsedGood),
];

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::UsedExcellent,
        Condition::UsedGood,
        Condition::UsedFair,
        Condition::Damaged,
    ];

    /// Maps free-text condition input onto one of the five canonical labels.
    ///
    /// Unrecognized or empty input lands in [`Condition::UsedGood`]. Every
    /// canonical label maps back to itself, so the function is idempotent over
    /// [`Condition::label`].
    #[must_use]
    pub fn canonicalize(raw: &str) -> Condition {
        let lowered = raw.to_lowercase();
        CONDITION_RULES
            .iter()
            .find(|(rule, _)| match rule {
                ConditionRule::Exact(s) => lowered == *s,
                ConditionRule::Contains(s) => lowered.contains(s),
            })
            .map_or(Condition::UsedGood, |(_, condition)| *condition)
    }

    /// Display label, e.g. `"Used - Excellent"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::UsedExcellent => "Used - Excellent",
            Condition::UsedGood => "Used - Good",
            Condition::UsedFair => "Used - Fair",
            Condition::Damaged => "Damaged",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Expired,
    Sold,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Active => write!(f, "active"),
            ListingStatus::Expired => write!(f, "expired"),
            ListingStatus::Sold => write!(f, "sold"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingOption {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub from: u16,
    pub to: u16,
}

/// A part listing in the canonical shape the screens render.
///
/// Only the normalizer in `partmart-client` builds these from API records, so
/// the invariants hold for every instance: `price >= 0`, `images` non-empty,
/// `condition` one of the five canonical labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub part_name: String,
    pub part_number: String,
    /// `brand`, falling back to the record's `carBrand`.
    pub brand: String,
    /// Raw `carBrand` as sent by the API; empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub car_brand: String,
    /// Raw `model`; empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// Raw `carModel`; empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub car_model: String,
    pub category: String,
    pub compatible_models: Vec<String>,
    pub year_range: YearRange,
    pub price: f64,
    pub condition: Condition,
    pub stock_count: u32,
    pub description: String,
    pub images: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub seller_id: String,
    pub seller_name: String,
    pub seller_phone: String,
    /// Listing city.
    pub seller_city: String,
    /// Listing district.
    pub seller_district: String,
    pub status: ListingStatus,
    pub views: u64,
    pub rating: f64,
    pub review_count: u64,
    #[serde(rename = "isOEM")]
    pub is_oem: bool,
    pub shipping_options: Vec<ShippingOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image, which the list cards render.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Vehicle model shown on cards: `model`, else `carModel`.
    #[must_use]
    pub fn vehicle_model(&self) -> &str {
        if self.model.is_empty() {
            &self.car_model
        } else {
            &self.model
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_exact_new() {
        assert_eq!(Condition::canonicalize("new"), Condition::New);
        assert_eq!(Condition::canonicalize("NEW"), Condition::New);
    }

    #[test]
    fn canonicalize_new_requires_exact_match() {
        // "like new" is not the exact word and has no other keyword.
        assert_eq!(Condition::canonicalize("like new"), Condition::UsedGood);
    }

    #[test]
    fn canonicalize_padded_new_is_not_exact() {
        assert_eq!(Condition::canonicalize(" new "), Condition::UsedGood);
        assert_eq!(Condition::canonicalize("new\n"), Condition::UsedGood);
        assert_eq!(Condition::canonicalize(" good "), Condition::UsedGood);
        assert_eq!(Condition::canonicalize(" fair "), Condition::UsedFair);
    }

    #[test]
    fn canonicalize_substring_buckets() {
        assert_eq!(
            Condition::canonicalize("Used - EXCELLENT shape"),
            Condition::UsedExcellent
        );
        assert_eq!(Condition::canonicalize("pretty good"), Condition::UsedGood);
        assert_eq!(Condition::canonicalize("fair"), Condition::UsedFair);
        assert_eq!(Condition::canonicalize("Water damaged"), Condition::Damaged);
        assert_eq!(Condition::canonicalize("used"), Condition::UsedGood);
    }

    #[test]
    fn canonicalize_priority_order_wins_over_best_match() {
        assert_eq!(
            Condition::canonicalize("fair to good"),
            Condition::UsedGood
        );
        assert_eq!(
            Condition::canonicalize("excellent but damaged"),
            Condition::UsedExcellent
        );
    }

    #[test]
    fn canonicalize_unknown_and_empty_default_to_used_good() {
        assert_eq!(Condition::canonicalize(""), Condition::UsedGood);
        assert_eq!(Condition::canonicalize("refurbished"), Condition::UsedGood);
    }

    #[test]
    fn canonicalize_is_idempotent_over_labels() {
        for input in ["new", "Used - fair", "broken", "", "DAMAGE", "excellent"] {
            let once = Condition::canonicalize(input);
            let twice = Condition::canonicalize(once.label());
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
        for condition in Condition::ALL {
            assert_eq!(Condition::canonicalize(condition.label()), condition);
        }
    }

    #[test]
    fn condition_serializes_as_label() {
        let json = serde_json::to_string(&Condition::UsedExcellent).unwrap();
        assert_eq!(json, "\"Used - Excellent\"");
    }

    #[test]
    fn listing_status_display() {
        assert_eq!(ListingStatus::Active.to_string(), "active");
        assert_eq!(ListingStatus::Expired.to_string(), "expired");
        assert_eq!(ListingStatus::Sold.to_string(), "sold");
    }
}
