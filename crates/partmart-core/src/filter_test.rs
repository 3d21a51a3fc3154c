use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use super::*;
use crate::products::{Condition, ListingStatus, ShippingOption, YearRange};

fn make_product(id: &str, brand: &str, category: &str, district: &str) -> Product {
    let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    Product {
        id: id.to_string(),
        part_name: format!("{brand} part {id}"),
        part_number: String::new(),
        brand: brand.to_string(),
        car_brand: String::new(),
        model: String::new(),
        car_model: String::new(),
        category: category.to_string(),
        compatible_models: vec![],
        year_range: YearRange::default(),
        price: 10_000.0,
        condition: Condition::UsedGood,
        stock_count: 1,
        description: String::new(),
        images: vec!["https://api.test/placeholder-part.jpg".to_string()],
        specifications: BTreeMap::new(),
        features: vec![],
        seller_id: String::new(),
        seller_name: String::new(),
        seller_phone: String::new(),
        seller_city: String::new(),
        seller_district: district.to_string(),
        status: ListingStatus::Active,
        views: 0,
        rating: 0.0,
        review_count: 0,
        is_oem: false,
        shipping_options: vec![ShippingOption::Delivery],
        created_at: stamp,
        updated_at: stamp,
    }
}

fn ids(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.id.clone()).collect()
}

fn catalog() -> Vec<Product> {
    let mut camry = make_product("1", "Toyota", "brakes", "Al-Karkh");
    camry.model = "Camry".to_string();
    camry.description = "Front brake pads, ceramic".to_string();

    let mut civic = make_product("2", "Honda", "engine", "Al-Karkh");
    civic.car_model = "Civic".to_string();

    let mut hilux = make_product("3", "", "body", "");
    hilux.car_brand = "Toyota".to_string();
    hilux.car_model = "Hilux".to_string();
    hilux.seller_city = "Zubair".to_string();

    let sportage = make_product("4", "Kia", "brakes", "Soran");

    vec![camry, civic, hilux, sportage]
}

#[test]
fn empty_filter_returns_everything_in_order() {
    let products = catalog();
    let filter = FilterState::new();
    assert!(!filter.is_active());
    assert_eq!(ids(&filter.apply(&products)), vec!["1", "2", "3", "4"]);
}

#[test]
fn brand_and_district_match_case_insensitively() {
    let products = vec![
        make_product("1", "Toyota", "brakes", "Al-Karkh"),
        make_product("2", "Honda", "engine", "Al-Karkh"),
    ];
    let filter = FilterState::new()
        .with_brand("toyota")
        .with_district("al-karkh");
    assert_eq!(ids(&filter.apply(&products)), vec!["1"]);
}

#[test]
fn by_brand_category_disables_category_predicate() {
    let products = catalog();
    let filter = FilterState::new().with_category(CATEGORY_BY_BRAND);
    assert!(!filter.has_refinements());
    assert_eq!(filter.apply(&products).len(), products.len());
}

#[test]
fn category_is_exact_match() {
    let products = catalog();
    let filter = FilterState::new().with_category("brakes");
    assert_eq!(ids(&filter.apply(&products)), vec!["1", "4"]);

    let filter = FilterState::new().with_category("Brakes");
    assert!(filter.apply(&products).is_empty());
}

#[test]
fn blank_category_is_ignored() {
    let products = catalog();
    let filter = FilterState::new().with_category("");
    assert_eq!(filter.apply(&products).len(), products.len());
}

#[test]
fn search_covers_name_description_and_vehicle_fields() {
    let products = catalog();

    let by_description = FilterState::new().with_search("  CERAMIC ");
    assert_eq!(ids(&by_description.apply(&products)), vec!["1"]);

    let by_car_model = FilterState::new().with_search("hilux");
    assert_eq!(ids(&by_car_model.apply(&products)), vec!["3"]);

    let by_brand = FilterState::new().with_search("toyota");
    assert_eq!(ids(&by_brand.apply(&products)), vec!["1", "3"]);
}

#[test]
fn whitespace_search_is_ignored() {
    let products = catalog();
    let filter = FilterState::new().with_search("   ");
    assert!(!filter.is_active());
    assert_eq!(filter.apply(&products).len(), products.len());
}

#[test]
fn brand_matches_car_brand_field() {
    let products = catalog();
    let filter = FilterState::new().with_brand("TOYOTA");
    assert_eq!(ids(&filter.apply(&products)), vec!["1", "3"]);
}

#[test]
fn model_matches_model_or_car_model() {
    let products = catalog();
    let filter = FilterState::new().with_brand("Toyota").with_model("camry");
    assert_eq!(ids(&filter.apply(&products)), vec!["1"]);

    let filter = FilterState::new().with_brand("Toyota").with_model("HILUX");
    assert_eq!(ids(&filter.apply(&products)), vec!["3"]);
}

#[test]
fn district_matches_city_too() {
    let products = catalog();
    let filter = FilterState::new().with_district("zubair");
    assert_eq!(ids(&filter.apply(&products)), vec!["3"]);
}

#[test]
fn district_is_exact_not_substring() {
    let products = catalog();
    let filter = FilterState::new().with_district("Karkh");
    assert!(filter.apply(&products).is_empty());
}

#[test]
fn changing_brand_clears_model() {
    let mut filter = FilterState::new().with_brand("Toyota").with_model("Camry");
    assert_eq!(filter.model(), "Camry");
    filter.set_brand("Honda");
    assert_eq!(filter.brand(), "Honda");
    assert_eq!(filter.model(), "");
}

#[test]
fn model_without_brand_is_ignored() {
    let filter = FilterState::new().with_model("Camry");
    assert_eq!(filter.model(), "");
    assert!(!filter.is_active());
}

#[test]
fn clearing_brand_clears_model() {
    let mut filter = FilterState::new().with_brand("Toyota").with_model("Camry");
    filter.set_brand("");
    assert!(filter.brand().is_empty());
    assert!(filter.model().is_empty());
}

#[test]
fn clear_resets_everything() {
    let mut filter = FilterState::new()
        .with_search("pads")
        .with_category("brakes")
        .with_district("Soran")
        .with_brand("Kia");
    assert!(filter.is_active());
    filter.clear();
    assert_eq!(filter, FilterState::default());
}

#[test]
fn adding_predicates_never_grows_the_result() {
    let products = catalog();
    let steps = [
        FilterState::new(),
        FilterState::new().with_search("toyota"),
        FilterState::new().with_search("toyota").with_brand("toyota"),
        FilterState::new()
            .with_search("toyota")
            .with_brand("toyota")
            .with_category("brakes"),
        FilterState::new()
            .with_search("toyota")
            .with_brand("toyota")
            .with_category("brakes")
            .with_district("al-karkh"),
        FilterState::new()
            .with_search("toyota")
            .with_brand("toyota")
            .with_model("camry")
            .with_category("brakes")
            .with_district("al-karkh"),
    ];

    let sizes: Vec<usize> = steps.iter().map(|f| f.apply(&products).len()).collect();
    for pair in sizes.windows(2) {
        assert!(pair[1] <= pair[0], "result grew: {sizes:?}");
    }
    assert_eq!(sizes.last(), Some(&1));
}

#[test]
fn product_without_location_fails_district_filter() {
    let products = vec![make_product("9", "Toyota", "brakes", "")];
    let filter = FilterState::new().with_district("Al-Karkh");
    assert!(filter.apply(&products).is_empty());
}
