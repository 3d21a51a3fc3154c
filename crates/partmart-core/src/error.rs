use thiserror::Error;

/// Errors raised while loading configuration or the bundled catalog assets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read asset file {path}: {source}")]
    AssetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse asset file {path}: {source}")]
    AssetParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("asset validation failed: {0}")]
    Validation(String),
}
