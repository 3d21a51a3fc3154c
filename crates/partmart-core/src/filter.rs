//! Client-side listing filter for the search screen.
//!
//! Each active predicate is checked independently and the results are
//! AND-ed. Empty filter values are skipped, so an empty [`FilterState`]
//! passes everything. Output keeps input order.

use serde::Serialize;

use crate::categories::CATEGORY_BY_BRAND;
use crate::collate::eq_ignore_case;
use crate::products::Product;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_query: String,
    pub selected_category: Option<String>,
    pub district: String,
    brand: String,
    model: String,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sets the brand and clears the model, so a model never outlives the
    /// brand it was picked for.
    pub fn set_brand(&mut self, brand: impl Into<String>) {
        self.brand = brand.into();
        self.model.clear();
    }

    /// Sets the model. Ignored while no brand is selected.
    pub fn set_model(&mut self, model: impl Into<String>) {
        if self.brand.is_empty() {
            return;
        }
        self.model = model.into();
    }

    /// Builder form of [`FilterState::set_brand`].
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.set_brand(brand);
        self
    }

    /// Builder form of [`FilterState::set_model`].
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.set_model(model);
        self
    }

    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.selected_category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `true` when any predicate other than free-text search is set; drives
    /// the highlighted filter button.
    #[must_use]
    pub fn has_refinements(&self) -> bool {
        self.active_category().is_some()
            || !self.district.is_empty()
            || !self.brand.is_empty()
            || !self.model.is_empty()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search_query.trim().is_empty() || self.has_refinements()
    }

    /// Category to match on, if any. Blank values and the by-brand sentinel
    /// disable the predicate.
    fn active_category(&self) -> Option<&str> {
        self.selected_category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != CATEGORY_BY_BRAND)
    }

    /// Returns whether `product` passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.matches_category(product)
            && self.matches_district(product)
            && self.matches_brand(product)
            && self.matches_model(product)
    }

    /// Products passing the filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    fn matches_search(&self, product: &Product) -> bool {
        let needle = self.search_query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &product.part_name,
            &product.description,
            &product.brand,
            &product.car_brand,
            &product.car_model,
        ]
        .iter()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(&needle))
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.active_category()
            .map_or(true, |category| product.category == category)
    }

    fn matches_district(&self, product: &Product) -> bool {
        self.district.is_empty()
            || any_field_equals(
                &[&product.seller_district, &product.seller_city],
                &self.district,
            )
    }

    fn matches_brand(&self, product: &Product) -> bool {
        self.brand.is_empty()
            || any_field_equals(&[&product.brand, &product.car_brand], &self.brand)
    }

    fn matches_model(&self, product: &Product) -> bool {
        self.model.is_empty()
            || any_field_equals(&[&product.model, &product.car_model], &self.model)
    }
}

fn any_field_equals(fields: &[&String], wanted: &str) -> bool {
    fields
        .iter()
        .any(|field| !field.is_empty() && eq_ignore_case(field, wanted))
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
