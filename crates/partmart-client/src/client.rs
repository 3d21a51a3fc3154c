//! HTTP client for the parts marketplace REST API.
//!
//! Wraps `reqwest` with endpoint fallbacks, retry on transient failures and
//! lenient envelope decoding. Listings come back as [`RawPartRecord`]s; the
//! `fetch_product*` helpers run them through the normalizer.

use std::time::Duration;

use partmart_core::{AppConfig, Product, DEFAULT_API_BASE_URL};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::ClientError;
use crate::normalize::{normalize_part, normalize_part_detail};
use crate::retry::retry_with_backoff;
use crate::types::{records_from, Pagination, PartDetail, PartsPage, PartsQuery, RawPartRecord};

const DEFAULT_USER_AGENT: &str = "partmart/0.1 (parts-marketplace)";
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

const PARTS_PATH: &[&str] = &["api", "parts"];
const FEATURED_PATH: &[&str] = &["api", "parts", "featured"];
const SELL_ALL_PATH: &[&str] = &["api", "sell", "all"];
const HEALTH_PATH: &[&str] = &["api", "sell", "health"];

/// Client for the parts API.
///
/// Use [`PartsClient::from_app_config`] in the binary, [`PartsClient::new`]
/// for the public host, or [`PartsClient::with_base_url`] to point at a mock
/// server in tests.
pub struct PartsClient {
    client: Client,
    base_url: Url,
    /// Base URL as configured, without a trailing slash; image paths are
    /// resolved against it.
    image_base: String,
    bearer_token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PartsClient {
    /// Creates a client pointed at the public API host.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, timeout_secs)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute `http(s)` URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// Creates a client from the loaded application configuration: base URL,
    /// timeout, user agent, bearer token and retry policy.
    ///
    /// # Errors
    ///
    /// Same as [`PartsClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        let mut client = Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms);
        client.bearer_token.clone_from(&config.api_token);
        Ok(client)
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let image_base = base_url.trim().trim_end_matches('/').to_owned();
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(&image_base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self {
            client,
            base_url: parsed,
            image_base,
            bearer_token: None,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Overrides the retry policy for transient failures.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Base URL that image paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.image_base
    }

    /// Fetches approved listings from `GET /api/parts`.
    ///
    /// If that endpoint fails for any reason the legacy `GET /api/sell/all`
    /// list is used instead, truncated to `query.limit` and reported as a
    /// single page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EndpointsExhausted`] if both endpoints fail, or
    /// [`ClientError::InvalidBaseUrl`] if a request URL cannot be built.
    pub async fn fetch_approved_parts(&self, query: &PartsQuery) -> Result<PartsPage, ClientError> {
        let url = self.endpoint(PARTS_PATH, &query.query_pairs())?;
        match self.get_json(&url).await {
            Ok(body) => Ok(PartsPage {
                records: records_from(body.get("data"), url.as_str()),
                pagination: Pagination::from_value(body.get("pagination")),
                from_fallback: false,
            }),
            Err(err) => {
                tracing::warn!(
                    url = %url,
                    error = %err,
                    "parts endpoint failed, falling back to legacy list"
                );
                let mut records = self.fetch_sell_all(&url).await?;
                if let Some(limit) = query.limit.filter(|l| *l > 0) {
                    records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
                }
                let pagination = Pagination::single_page(query.limit, records.len());
                Ok(PartsPage {
                    records,
                    pagination: Some(pagination),
                    from_fallback: true,
                })
            }
        }
    }

    /// Fetches up to `limit` featured listings from
    /// `GET /api/parts/featured`, falling back to the first `limit` entries of
    /// the legacy list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EndpointsExhausted`] if both endpoints fail.
    pub async fn fetch_featured_parts(
        &self,
        limit: u32,
    ) -> Result<Vec<RawPartRecord>, ClientError> {
        let url = self.endpoint(FEATURED_PATH, &[("limit", limit.to_string())])?;
        match self.get_json(&url).await {
            Ok(body) => Ok(records_from(body.get("data"), url.as_str())),
            Err(err) => {
                tracing::warn!(
                    url = %url,
                    error = %err,
                    "featured endpoint failed, falling back to legacy list"
                );
                let mut records = self.fetch_sell_all(&url).await?;
                records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
                Ok(records)
            }
        }
    }

    /// Fetches one listing and its related listings from `GET /api/parts/{id}`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] on a 404 or when the envelope has no
    ///   record object.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on
    ///   transport failure or any other non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    pub async fn fetch_part(&self, id: &str) -> Result<PartDetail, ClientError> {
        let url = self.endpoint(&["api", "parts", id.trim()], &[])?;
        let body = self.get_json(&url).await?;
        let record = body
            .get("data")
            .cloned()
            .and_then(RawPartRecord::from_value)
            .ok_or_else(|| ClientError::NotFound {
                url: url.to_string(),
            })?;
        Ok(PartDetail {
            record,
            related: records_from(body.get("relatedParts"), url.as_str()),
        })
    }

    /// Returns the body of `GET /api/sell/health`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-2xx status or a
    /// non-JSON body.
    pub async fn health(&self) -> Result<Value, ClientError> {
        let url = self.endpoint(HEALTH_PATH, &[])?;
        self.get_json(&url).await
    }

    /// [`PartsClient::fetch_approved_parts`] followed by listing
    /// normalization of every record.
    ///
    /// # Errors
    ///
    /// Same as [`PartsClient::fetch_approved_parts`].
    pub async fn fetch_products(&self, query: &PartsQuery) -> Result<Vec<Product>, ClientError> {
        let page = self.fetch_approved_parts(query).await?;
        Ok(page
            .records
            .iter()
            .map(|record| normalize_part(record, &self.image_base))
            .collect())
    }

    /// [`PartsClient::fetch_part`] followed by detail normalization of the
    /// listing and listing normalization of its related parts.
    ///
    /// # Errors
    ///
    /// Same as [`PartsClient::fetch_part`].
    pub async fn fetch_product(&self, id: &str) -> Result<(Product, Vec<Product>), ClientError> {
        let detail = self.fetch_part(id).await?;
        let product = normalize_part_detail(&detail.record, &self.image_base);
        let related = detail
            .related
            .iter()
            .map(|record| normalize_part(record, &self.image_base))
            .collect();
        Ok((product, related))
    }

    /// Legacy listing of every sell item, used as the fallback source.
    async fn fetch_sell_all(&self, primary: &Url) -> Result<Vec<RawPartRecord>, ClientError> {
        let url = self.endpoint(SELL_ALL_PATH, &[])?;
        match self.get_json(&url).await {
            Ok(body) => Ok(records_from(body.get("sells"), url.as_str())),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "legacy list endpoint failed");
                Err(ClientError::EndpointsExhausted {
                    tried: vec![primary.to_string(), url.to_string()],
                })
            }
        }
    }

    /// Builds a request URL from path segments and query pairs. Segments are
    /// percent-encoded, so ids cannot escape their path position.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.image_base.clone(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: &Url) -> Result<Value, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.get_json_once(url)
        })
        .await
    }

    /// Sends one GET request and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] on 404.
    /// - [`ClientError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not valid JSON.
    async fn get_json_once(&self, url: &Url) -> Result<Value, ClientError> {
        tracing::debug!(url = %url, "GET");
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
