//! Read-only catalog commands backed by the bundled assets.

use partmart_core::{AppConfig, LocationSelection, MarketplaceContext, PART_CATEGORIES};

/// Print every brand, locale sorted.
///
/// # Errors
///
/// Returns an error if the bundled assets cannot be loaded.
pub(crate) fn run_brands(config: &AppConfig) -> anyhow::Result<()> {
    let context = MarketplaceContext::load(config)?;
    for brand in context.brands.sorted_brands() {
        println!("{brand}");
    }
    Ok(())
}

/// Print the models of `brand`. An unrecognized brand prints every known
/// model.
///
/// # Errors
///
/// Returns an error if the bundled assets cannot be loaded.
pub(crate) fn run_models(config: &AppConfig, brand: &str) -> anyhow::Result<()> {
    let context = MarketplaceContext::load(config)?;
    if !context.brands.contains_brand(brand) {
        tracing::info!(brand, "brand not in catalog, matching loosely");
    }
    for model in context.brands.models_for(brand) {
        println!("{model}");
    }
    Ok(())
}

/// Walk the location cascade: governorates, then districts of
/// `governorate`, then cities of `district`.
///
/// # Errors
///
/// Returns an error if the assets cannot be loaded, or if `district` is not
/// part of the given `governorate`.
pub(crate) fn run_locations(
    config: &AppConfig,
    governorate: Option<&str>,
    district: Option<&str>,
) -> anyhow::Result<()> {
    let context = MarketplaceContext::load(config)?;
    let locations = &context.locations;
    let mut selection = LocationSelection::new();

    if let Some(governorate) = governorate {
        if !locations.contains_governorate(governorate) {
            anyhow::bail!("unknown governorate '{governorate}'");
        }
        selection.select_governorate(governorate);
    }

    let options: Vec<String> = match (governorate, district) {
        (_, Some(district)) => {
            if governorate.is_some()
                && !selection
                    .district_options(locations)
                    .iter()
                    .any(|d| d == district)
            {
                anyhow::bail!(
                    "district '{district}' is not in governorate '{}'",
                    selection.governorate()
                );
            }
            selection.select_district(district);
            selection.city_options(locations).to_vec()
        }
        (Some(_), None) => selection.district_options(locations).to_vec(),
        (None, None) => locations.governorates().to_vec(),
    };

    for option in &options {
        println!("{option}");
    }
    Ok(())
}

/// Print the part category table.
pub(crate) fn run_categories() {
    println!("{:<14}NAME", "ID");
    for category in PART_CATEGORIES {
        println!("{:<14}{}", category.id, category.name);
    }
}
