//! Cascading governorate → district → city selection held by a form.

use serde::{Deserialize, Serialize};

use crate::locations::LocationHierarchy;

/// Location picked in the sell form or the search screen. Setting a parent
/// level clears every level below it, so a stale district or city can never
/// sit under a governorate it does not belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSelection {
    governorate: String,
    district: String,
    city: String,
}

impl LocationSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn governorate(&self) -> &str {
        &self.governorate
    }

    #[must_use]
    pub fn district(&self) -> &str {
        &self.district
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Selects a governorate and clears district and city.
    pub fn select_governorate(&mut self, governorate: impl Into<String>) {
        self.governorate = governorate.into();
        self.district.clear();
        self.city.clear();
    }

    /// Selects a district and clears city.
    pub fn select_district(&mut self, district: impl Into<String>) {
        self.district = district.into();
        self.city.clear();
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Districts valid for the current governorate.
    #[must_use]
    pub fn district_options<'h>(&self, hierarchy: &'h LocationHierarchy) -> &'h [String] {
        hierarchy.districts_for(&self.governorate)
    }

    /// Cities valid for the current district.
    #[must_use]
    pub fn city_options<'h>(&self, hierarchy: &'h LocationHierarchy) -> &'h [String] {
        hierarchy.cities_for(&self.district)
    }

    /// `true` once all three levels are chosen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.governorate.is_empty() && !self.district.is_empty() && !self.city.is_empty()
    }
}
