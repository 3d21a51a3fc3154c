use crate::app_config::AppConfig;
use crate::brands::{load_brand_catalog, BrandCatalog};
use crate::locations::{load_location_hierarchy, LocationHierarchy};
use crate::ConfigError;

/// Read-only catalogs shared by every screen. Built once at startup and
/// passed by reference.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceContext {
    pub locations: LocationHierarchy,
    pub brands: BrandCatalog,
}

impl MarketplaceContext {
    #[must_use]
    pub fn new(locations: LocationHierarchy, brands: BrandCatalog) -> Self {
        Self { locations, brands }
    }

    /// Loads both bundled assets from the paths in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either asset cannot be read or parsed.
    pub fn load(config: &AppConfig) -> Result<Self, ConfigError> {
        let locations = load_location_hierarchy(&config.locations_path)?;
        let brands = load_brand_catalog(&config.brands_path)?;
        Ok(Self::new(locations, brands))
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::app_config::Environment;

    fn data_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..").join("data")
    }

    fn config_with_paths(locations_path: PathBuf, brands_path: PathBuf) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            api_base_url: "https://api.test".to_string(),
            api_token: None,
            log_level: "info".to_string(),
            locations_path,
            brands_path,
            request_timeout_secs: 5,
            user_agent: "partmart-test".to_string(),
            max_retries: 0,
            retry_backoff_base_ms: 1,
        }
    }

    #[test]
    fn load_reads_both_bundled_assets() {
        let dir = data_dir();
        let config = config_with_paths(
            dir.join("iraq_locations.json"),
            dir.join("brands_models.json"),
        );
        let context = MarketplaceContext::load(&config).expect("bundled assets should load");
        assert!(!context.locations.is_empty());
        assert!(!context.brands.is_empty());
    }

    #[test]
    fn load_reports_missing_brand_asset() {
        let dir = data_dir();
        let config = config_with_paths(
            dir.join("iraq_locations.json"),
            dir.join("does-not-exist.json"),
        );
        let err = MarketplaceContext::load(&config).unwrap_err();
        assert!(matches!(err, ConfigError::AssetIo { .. }));
    }
}
