//! Governorate → district → city hierarchy built from the bundled
//! geographic asset.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collate::{sort_locale, split_csv};
use crate::ConfigError;

/// One row of the geographic asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    #[serde(rename = "Governorate", default, deserialize_with = "de_text")]
    pub governorate: String,
    #[serde(rename = "District", default, deserialize_with = "de_text")]
    pub district: String,
    #[serde(rename = "Capital City", default, deserialize_with = "de_text")]
    pub capital_city: String,
    #[serde(
        rename = "Other Major Towns",
        default,
        deserialize_with = "de_towns",
        serialize_with = "ser_towns"
    )]
    pub other_towns: Vec<String>,
}

/// Non-string cells (nulls, numbers) read as empty text.
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// The asset stores towns as one comma-separated string; a JSON array is
/// accepted too. Anything else reads as no towns.
fn de_towns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => split_csv(&s),
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) if !s.trim().is_empty() => {
                    Some(s.trim().to_owned())
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn ser_towns<S>(towns: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&towns.join(", "))
}

/// Read-only lookup tables for the cascading location pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHierarchy {
    governorates: Vec<String>,
    districts_by_governorate: HashMap<String, Vec<String>>,
    cities_by_district: HashMap<String, Vec<String>>,
}

impl LocationHierarchy {
    /// Builds the hierarchy from raw records.
    ///
    /// Governorates and districts are trimmed, de-duplicated and locale
    /// sorted. Each district's cities keep source order with the capital city
    /// first and exact duplicates removed. Records without a governorate or a
    /// district are skipped. Districts sharing a name across governorates
    /// share one city list.
    #[must_use]
    pub fn build(records: &[GeoRecord]) -> Self {
        let mut districts: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut cities_by_district: HashMap<String, Vec<String>> = HashMap::new();

        for record in records {
            let governorate = record.governorate.trim();
            let district = record.district.trim();
            if governorate.is_empty() || district.is_empty() {
                continue;
            }

            districts
                .entry(governorate.to_owned())
                .or_default()
                .insert(district.to_owned());

            let cities = cities_by_district.entry(district.to_owned()).or_default();
            let capital = record.capital_city.trim();
            let towns = record.other_towns.iter().map(|t| t.trim());
            for city in std::iter::once(capital).chain(towns) {
                if !city.is_empty() && !cities.iter().any(|c| c == city) {
                    cities.push(city.to_owned());
                }
            }
        }

        let mut governorates: Vec<String> = districts.keys().cloned().collect();
        sort_locale(&mut governorates);

        let districts_by_governorate = districts
            .into_iter()
            .map(|(governorate, set)| {
                let mut list: Vec<String> = set.into_iter().collect();
                sort_locale(&mut list);
                (governorate, list)
            })
            .collect();

        Self {
            governorates,
            districts_by_governorate,
            cities_by_district,
        }
    }

    /// All governorates, locale sorted.
    #[must_use]
    pub fn governorates(&self) -> &[String] {
        &self.governorates
    }

    /// Districts of `governorate`, or an empty slice when it is unknown.
    #[must_use]
    pub fn districts_for(&self, governorate: &str) -> &[String] {
        self.districts_by_governorate
            .get(governorate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cities of `district`, or an empty slice when it is unknown.
    #[must_use]
    pub fn cities_for(&self, district: &str) -> &[String] {
        self.cities_by_district
            .get(district)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains_governorate(&self, governorate: &str) -> bool {
        self.districts_by_governorate.contains_key(governorate)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.governorates.is_empty()
    }

    /// Every district across all governorates, locale sorted and unique.
    /// Feeds the district filter on the search screen.
    #[must_use]
    pub fn all_districts(&self) -> Vec<String> {
        let unique: BTreeSet<&String> = self.districts_by_governorate.values().flatten().collect();
        let mut list: Vec<String> = unique.into_iter().cloned().collect();
        sort_locale(&mut list);
        list
    }
}

/// Parses the geographic asset from JSON text.
///
/// Rows that are not objects are skipped, as are rows missing a governorate
/// or district.
///
/// # Errors
///
/// Returns [`ConfigError::AssetParse`] if the text is not a JSON array.
pub fn parse_location_hierarchy(json: &str) -> Result<LocationHierarchy, ConfigError> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| ConfigError::AssetParse {
            path: "<inline>".to_string(),
            source: e,
        })?;

    let records: Vec<GeoRecord> = rows
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|row| serde_json::from_value::<GeoRecord>(row).ok())
        .collect();

    Ok(LocationHierarchy::build(&records))
}

/// Loads the geographic asset from disk and builds the hierarchy.
///
/// # Errors
///
/// Returns [`ConfigError::AssetIo`] if the file cannot be read, or
/// [`ConfigError::AssetParse`] if it is not a JSON array.
pub fn load_location_hierarchy(path: &Path) -> Result<LocationHierarchy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AssetIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_location_hierarchy(&content).map_err(|e| match e {
        ConfigError::AssetParse { source, .. } => ConfigError::AssetParse {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
