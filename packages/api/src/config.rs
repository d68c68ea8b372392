//! Deployment configuration.
//!
//! Read from `wildguard.toml` (or the file named by `WILDGUARD_CONFIG`).
//! A missing file is not an error: every section has working local
//! defaults, so `cargo run` against locally hosted upstreams needs no
//! setup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Conflict service (filter options, filtered summaries, breakdowns,
    /// village counts).
    pub conflict_url: String,
    /// Spreadsheet parser service (cultivation table).
    pub cultivation_url: String,
    /// Prediction service (prediction rows, weather-detail requests).
    pub prediction_url: String,
    /// Upload endpoint host for spreadsheet ingestion.
    pub upload_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            conflict_url: "http://localhost:5001/api".to_string(),
            cultivation_url: "http://localhost:5050/parser".to_string(),
            prediction_url: "http://localhost:5000".to_string(),
            upload_url: "http://localhost:5050/parser".to_string(),
        }
    }
}

/// HTTP client behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// A configured login account (mock credentials, not a security model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccountConfig {
    /// Login email.
    pub email: String,
    /// Login password.
    pub password: String,
}

/// Session issuing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minutes an issued session stays valid.
    pub session_ttl_minutes: i64,
    /// Accounts allowed to log in. Empty by default: no implicit
    /// credentials ship with the binary.
    pub accounts: Vec<AccountConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 60,
            accounts: Vec::new(),
        }
    }
}

/// Local data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// GeoJSON file with the named region boundaries used by the
    /// choropleth join.
    pub regions_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            regions_path: "data/regions.geojson".to_string(),
        }
    }
}

/// The full application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream service base URLs.
    pub upstream: UpstreamConfig,
    /// HTTP client behavior.
    pub http: HttpConfig,
    /// Session issuing policy.
    pub auth: AuthConfig,
    /// Local data files.
    pub data: DataConfig,
}

impl AppConfig {
    /// Loads configuration from `WILDGUARD_CONFIG` or `wildguard.toml`,
    /// falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, ApiError> {
        let path =
            std::env::var("WILDGUARD_CONFIG").unwrap_or_else(|_| "wildguard.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    /// Loads configuration from an explicit path, falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_from(path: &Path) -> Result<Self, ApiError> {
        if !path.exists() {
            log::info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
