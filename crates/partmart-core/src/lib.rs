pub mod app_config;
pub mod brands;
pub mod categories;
pub mod collate;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod locations;
pub mod products;
pub mod selection;

pub use app_config::{AppConfig, Environment, DEFAULT_API_BASE_URL};
pub use brands::{load_brand_catalog, parse_brand_catalog, BrandCatalog, RawBrandEntry};
pub use categories::{find_category, PartCategory, CATEGORY_BY_BRAND, PART_CATEGORIES};
pub use config::{load_app_config, load_app_config_from_env};
pub use context::MarketplaceContext;
pub use error::ConfigError;
pub use filter::FilterState;
pub use locations::{
    load_location_hierarchy, parse_location_hierarchy, GeoRecord, LocationHierarchy,
};
pub use products::{Condition, ListingStatus, Product, ShippingOption, YearRange};
pub use selection::LocationSelection;
