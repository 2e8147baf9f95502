//! Command-line interface parsing for esimstore
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the validated [`StartupConfig`] the application starts from. The API URL
//! and data directory can also come from the environment.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;
use crate::storage::StorageError;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The country ID contains characters the API never uses
    #[error("Invalid country ID: '{0}'. Use letters, digits, '-' or '_'")]
    InvalidCountryId(String),

    /// The API URL is not an http(s) URL
    #[error("Invalid API URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidApiUrl(String),
}

/// esimstore - browse countries and their eSIM data plans
#[derive(Parser, Debug)]
#[command(name = "esimstore")]
#[command(about = "Browse countries and their eSIM data plans")]
#[command(version)]
pub struct Cli {
    /// Base URL of the storefront API
    #[arg(long, env = "ESIMSTORE_API_URL", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Directory for cached responses, preferences and the log file
    #[arg(long, env = "ESIMSTORE_DATA_DIR", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Open directly on the plans of a country
    ///
    /// Examples:
    ///   esimstore --country jp     # Japan
    ///   esimstore --country fr     # France
    #[arg(long, value_name = "ID")]
    pub country: Option<String>,

    /// Log level written to the log file (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// API base URL without a trailing slash
    pub api_url: String,
    /// Explicit data directory; `None` means the platform default
    pub data_dir: Option<PathBuf>,
    /// Country whose detail screen opens first
    pub initial_country: Option<String>,
    /// Default log level
    pub log_level: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            initial_country: None,
            log_level: "info".to_string(),
        }
    }
}

/// Validates a country ID argument.
///
/// # Returns
/// * `Ok(String)` with surrounding whitespace removed
/// * `Err(CliError::InvalidCountryId)` if empty or containing other characters
pub fn parse_country_arg(s: &str) -> Result<String, CliError> {
    let id = s.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id.to_string())
    } else {
        Err(CliError::InvalidCountryId(s.to_string()))
    }
}

/// Validates an API URL argument and strips any trailing slash.
pub fn parse_api_url(s: &str) -> Result<String, CliError> {
    let url = s.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(CliError::InvalidApiUrl(s.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the country ID or API URL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_country = cli
            .country
            .as_deref()
            .map(parse_country_arg)
            .transpose()?;

        Ok(StartupConfig {
            api_url: parse_api_url(&cli.api_url)?,
            data_dir: cli.data_dir.clone(),
            initial_country,
            log_level: cli.log_level.clone(),
        })
    }

    /// The data directory to use: the explicit one, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::storage::default_data_dir(),
        }
    }
}
