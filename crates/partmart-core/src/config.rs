use crate::app_config::{AppConfig, Environment, DEFAULT_API_BASE_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PARTMART_ENV", "development"));
    let api_base_url = parse_base_url(&or_default("PARTMART_API_URL", DEFAULT_API_BASE_URL))?;
    let api_token = lookup("PARTMART_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let log_level = or_default("PARTMART_LOG_LEVEL", "info");
    let locations_path = PathBuf::from(or_default(
        "PARTMART_LOCATIONS_PATH",
        "./data/iraq_locations.json",
    ));
    let brands_path = PathBuf::from(or_default(
        "PARTMART_BRANDS_PATH",
        "./data/brands_models.json",
    ));

    let request_timeout_secs = parse_u64("PARTMART_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PARTMART_USER_AGENT", "partmart/0.1 (parts-marketplace)");
    let max_retries = parse_u32("PARTMART_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("PARTMART_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        api_base_url,
        api_token,
        log_level,
        locations_path,
        brands_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Validates the API base URL scheme and strips trailing slashes so image
/// paths can be appended with a single `/`.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PARTMART_API_URL".to_string(),
            reason: format!("'{raw}' must start with http:// or https://"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
