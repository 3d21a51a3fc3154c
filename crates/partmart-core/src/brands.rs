use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collate::{eq_ignore_case, sort_locale, split_csv};
use crate::ConfigError;

/// Key in the brand asset that holds the passenger-car list.
const STATION_CARS_KEY: &str = "Station cars";

/// One `{ Brand, Models }` row of the brand asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBrandEntry {
    #[serde(rename = "Brand", default)]
    pub brand: Option<String>,
    /// Comma-separated model names.
    #[serde(rename = "Models", default)]
    pub models: Option<String>,
}

/// Brand → model lookup for the vehicle pickers and the brand filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandCatalog {
    models_by_brand: HashMap<String, Vec<String>>,
}

impl BrandCatalog {
    /// Builds the catalog. Brands are trimmed and entries with an empty brand
    /// are skipped; a repeated brand replaces the earlier entry.
    #[must_use]
    pub fn build(entries: &[RawBrandEntry]) -> Self {
        let mut models_by_brand = HashMap::new();
        for entry in entries {
            let Some(brand) = entry.brand.as_deref().map(str::trim) else {
                continue;
            };
            if brand.is_empty() {
                continue;
            }
            let models = entry.models.as_deref().map(split_csv).unwrap_or_default();
            models_by_brand.insert(brand.to_owned(), models);
        }
        Self { models_by_brand }
    }

    /// Brand names, locale sorted.
    #[must_use]
    pub fn sorted_brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = self.models_by_brand.keys().cloned().collect();
        sort_locale(&mut brands);
        brands
    }

    /// Models for `brand`.
    ///
    /// Tries an exact key match, then a case-insensitive match on the trimmed
    /// name, then a case-insensitive containment match in either direction
    /// (listings often carry text like `"toyota hilux"`). When nothing
    /// matches, every known model is returned so the picker is never empty
    /// because of a brand typo.
    ///
    /// A blank or whitespace-only brand is the one exception to that
    /// fallback: it returns an empty list, since no brand means no model can
    /// be chosen.
    #[must_use]
    pub fn models_for(&self, brand: &str) -> Vec<String> {
        if let Some(models) = self.models_by_brand.get(brand) {
            return models.clone();
        }

        let wanted = brand.trim();
        if wanted.is_empty() {
            return Vec::new();
        }

        if let Some(models) = self.fuzzy_lookup(wanted) {
            return models.clone();
        }

        self.all_models()
    }

    fn fuzzy_lookup(&self, wanted: &str) -> Option<&Vec<String>> {
        let brands = self.sorted_brands();
        if let Some(key) = brands.iter().find(|k| eq_ignore_case(k, wanted)) {
            return self.models_by_brand.get(key);
        }

        let wanted_lower = wanted.to_lowercase();
        brands
            .iter()
            .find(|k| {
                let key_lower = k.to_lowercase();
                key_lower.contains(&wanted_lower) || wanted_lower.contains(&key_lower)
            })
            .and_then(|key| self.models_by_brand.get(key))
    }

    /// Union of every brand's models, in brand order, without duplicates.
    #[must_use]
    pub fn all_models(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.sorted_brands()
            .iter()
            .filter_map(|brand| self.models_by_brand.get(brand))
            .flatten()
            .filter(|model| seen.insert(model.as_str()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn contains_brand(&self, brand: &str) -> bool {
        self.models_by_brand.contains_key(brand)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models_by_brand.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models_by_brand.is_empty()
    }
}

/// Parses the brand asset from JSON text.
///
/// # Errors
///
/// Returns [`ConfigError::AssetParse`] if the text is not JSON, or
/// [`ConfigError::Validation`] if the `"Station cars"` list is missing.
pub fn parse_brand_catalog(json: &str) -> Result<BrandCatalog, ConfigError> {
    let mut root: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ConfigError::AssetParse {
            path: "<inline>".to_string(),
            source: e,
        })?;

    let Some(serde_json::Value::Array(rows)) =
        root.get_mut(STATION_CARS_KEY).map(serde_json::Value::take)
    else {
        return Err(ConfigError::Validation(format!(
            "brand asset has no '{STATION_CARS_KEY}' list"
        )));
    };

    let entries: Vec<RawBrandEntry> = rows
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();

    Ok(BrandCatalog::build(&entries))
}

/// Loads the brand asset from disk.
///
/// # Errors
///
/// Returns [`ConfigError::AssetIo`] if the file cannot be read, otherwise the
/// errors of [`parse_brand_catalog`].
pub fn load_brand_catalog(path: &Path) -> Result<BrandCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AssetIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_brand_catalog(&content).map_err(|e| match e {
        ConfigError::AssetParse { source, .. } => ConfigError::AssetParse {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
