//! Remote data client for the REST Countries provider.
//!
//! Four read-only GET routes, single-shot request/response: no retries, no
//! caching, no timeout policy beyond the transport default. Failures are
//! surfaced to the caller through [`ApiError`].

use std::fmt;

use async_trait::async_trait;
use log::{debug, warn};

use super::types::Country;

/// Public REST Countries v3.1 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

// ============================================================================
// Error Type
// ============================================================================

/// Errors from the country-data provider.
/// Variants distinguish "nothing matched" from genuine failure, since call
/// sites treat the former as an empty result.
#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, connection refused, timeout).
    Network(String),
    /// Provider returned a non-2xx response other than an empty match.
    Api { status: u16, message: String },
    /// Empty-match lookup (HTTP 404 or an empty result array).
    NotFound(String),
    /// Response body did not decode as the expected shape.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "provider error (HTTP {status}): {message}")
            }
            ApiError::NotFound(what) => write!(f, "no match for {what}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// Source Trait
// ============================================================================

/// The four provider intents the rest of the crate depends on.
/// The directory store is written against this trait so tests can substitute
/// a canned source for the live endpoint.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Full country collection. All-or-nothing: no partial success.
    async fn list_all(&self) -> Result<Vec<Country>, ApiError>;

    /// Countries whose common or official name matches `name`
    /// (case-insensitive substring match, applied provider-side).
    async fn search_by_name(&self, name: &str) -> Result<Vec<Country>, ApiError>;

    /// Countries whose region equals `region`, case-insensitive.
    async fn list_by_region(&self, region: &str) -> Result<Vec<Country>, ApiError>;

    /// The single country identified by a cca3 or cca2 code.
    async fn get_by_code(&self, code: &str) -> Result<Country, ApiError>;
}

// ============================================================================
// HTTP Implementation
// ============================================================================

/// REST Countries client. Base URL resolution: constructor argument →
/// `ATLAS_API_BASE_URL` env var → public endpoint.
pub struct RestCountriesClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestCountriesClient {
    pub fn new(base_url: Option<String>) -> Self {
        let env_url = std::env::var("ATLAS_API_BASE_URL").ok();
        let final_url = base_url
            .or(env_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url: final_url,
            client: reqwest::Client::new(),
        }
    }

    /// Shared GET-and-decode path for the collection routes.
    async fn get_countries(&self, route: &str) -> Result<Vec<Country>, ApiError> {
        let url = format!("{}{}", self.base_url, route);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(route.trim_start_matches('/').to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("provider returned HTTP {} for {}", status.as_u16(), route);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<Country>>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Countries with any language display name containing `language`,
    /// case-insensitively. The provider has no language route, so this
    /// narrows the full set locally.
    pub async fn list_by_language(&self, language: &str) -> Result<Vec<Country>, ApiError> {
        let needle = language.to_lowercase();
        let all = self.list_all().await?;
        Ok(all
            .into_iter()
            .filter(|country| {
                country
                    .languages
                    .values()
                    .any(|lang| lang.to_lowercase().contains(&needle))
            })
            .collect())
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    async fn list_all(&self) -> Result<Vec<Country>, ApiError> {
        self.get_countries("/all").await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Country>, ApiError> {
        self.get_countries(&format!("/name/{name}")).await
    }

    async fn list_by_region(&self, region: &str) -> Result<Vec<Country>, ApiError> {
        self.get_countries(&format!("/region/{region}")).await
    }

    async fn get_by_code(&self, code: &str) -> Result<Country, ApiError> {
        // The provider returns an array even for a unique-key lookup.
        let mut matches = self.get_countries(&format!("/alpha/{code}")).await?;
        if matches.is_empty() {
            return Err(ApiError::NotFound(code.to_string()));
        }
        Ok(matches.remove(0))
    }
}
