//! eSIM API HTTP client
//!
//! Every endpoint is a plain GET returning JSON. Language and currency are
//! optional query parameters; empty values are left out of the URL.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{CountriesResponse, CountryDetailResponse, ParamsResponse};

/// Base URL of the production API
pub const DEFAULT_BASE_URL: &str = "https://esim.sm/api/v2/evaluate";

/// Errors that can occur when calling the API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error {status} on {path}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The base URL and path do not form a valid URL
    #[error("Invalid URL {0}")]
    InvalidUrl(String),
}

/// Client for the eSIM storefront API
#[derive(Debug, Clone)]
pub struct EsimClient {
    client: Client,
    base_url: String,
}

impl Default for EsimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EsimClient {
    /// Create a new client pointed at the production API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the selectable languages and currencies
    pub async fn get_params(&self) -> Result<ParamsResponse, ApiError> {
        self.request_json("/params", &[]).await
    }

    /// Fetch the country list, localized and priced for the given codes
    pub async fn get_countries(
        &self,
        language: Option<&str>,
        currency: Option<&str>,
    ) -> Result<CountriesResponse, ApiError> {
        self.request_json(
            "/countries",
            &[("language", language), ("currency", currency)],
        )
        .await
    }

    /// Fetch one country with its plans
    pub async fn get_country_detail(
        &self,
        id: &str,
        language: Option<&str>,
        currency: Option<&str>,
    ) -> Result<CountryDetailResponse, ApiError> {
        self.request_json(
            "/countries",
            &[
                ("id", Some(id)),
                ("language", language),
                ("currency", currency),
            ],
        )
        .await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, Option<&str>)],
    ) -> Result<T, ApiError> {
        let url = build_url(&self.base_url, path, params)?;
        let display_path = path_and_query(&url, path);
        tracing::debug!(path = %display_path, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), path = %display_path, "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: display_path,
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Joins base URL and path, appending only the parameters that have a value
fn build_url(base_url: &str, path: &str, params: &[(&str, Option<&str>)]) -> Result<Url, ApiError> {
    let raw = format!("{}{}", base_url, path);
    let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;

    let present: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some((*key, *v)),
            _ => None,
        })
        .collect();
    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }
    Ok(url)
}

/// `path` plus the query string, for error messages
fn path_and_query(url: &Url, path: &str) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}
