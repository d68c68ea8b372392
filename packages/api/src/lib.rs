#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Typed client for the upstream conflict, cultivation, and prediction
//! services.
//!
//! Every request goes through the shared [`retry`] helper (exponential
//! backoff for transient failures) and carries the configured timeout so
//! a hung upstream can never leave a panel loading forever. Responses
//! are unwrapped into the shared model types; the caller only ever sees
//! already-shaped data or a scoped [`ApiError`].

pub mod config;
pub mod latest;
pub mod progress;
pub mod query;
pub mod retry;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use wildguard_conflict_models::{AttackEvent, SpeciesOption};
use wildguard_cultivation_models::{CropPrediction, CultivationTable};

pub use config::AppConfig;
pub use latest::PanelState;
pub use query::{ConflictFilter, WeatherQuery};

/// Errors that can occur while talking to the upstream services.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding failed.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (config or upload file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// The upstream answered with an error status or an undecodable
    /// body.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Description of what went wrong.
        message: String,
    },
}

#[derive(Deserialize)]
struct FilterOptionsResponse {
    #[serde(default)]
    species: Vec<SpeciesOption>,
}

#[derive(Deserialize)]
struct FilteredSummaryResponse {
    #[serde(default)]
    attack_events: Vec<AttackEvent>,
}

#[derive(Deserialize)]
struct VillageCountsResponse {
    #[serde(default)]
    village_counts: BTreeMap<String, u64>,
}

/// Async client over the upstream REST services.
pub struct Client {
    http: reqwest::Client,
    upstream: config::UpstreamConfig,
}

impl Client {
    /// Builds a client with the configured per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            upstream: config.upstream.clone(),
        })
    }

    /// `GET /filter-options`: the species reference list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response does not decode.
    pub async fn filter_options(&self) -> Result<Vec<SpeciesOption>, ApiError> {
        let url = format!("{}/filter-options", self.upstream.conflict_url);
        let body = retry::send_json(|| self.http.get(&url)).await?;
        let response: FilterOptionsResponse = serde_json::from_value(body)?;
        Ok(response.species)
    }

    /// `GET /filtered-summary`: incident records matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response does not decode.
    pub async fn filtered_events(
        &self,
        filter: &ConflictFilter,
        species_options: &[SpeciesOption],
    ) -> Result<Vec<AttackEvent>, ApiError> {
        let url = format!("{}/filtered-summary", self.upstream.conflict_url);
        let pairs = filter.to_query_pairs(species_options);
        let body = retry::send_json(|| self.http.get(&url).query(&pairs)).await?;
        let response: FilteredSummaryResponse = serde_json::from_value(body)?;
        Ok(response.attack_events)
    }

    /// `GET /filtered-damage-breakdown`: upstream's own class/count
    /// map for the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response does not decode.
    pub async fn damage_breakdown(
        &self,
        filter: &ConflictFilter,
        species_options: &[SpeciesOption],
    ) -> Result<BTreeMap<String, u64>, ApiError> {
        let url = format!("{}/filtered-damage-breakdown", self.upstream.conflict_url);
        let pairs = filter.to_query_pairs(species_options);
        let body = retry::send_json(|| self.http.get(&url).query(&pairs)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `GET /village-incident-counts`: per-village incident counts for
    /// the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response does not decode.
    pub async fn village_counts(
        &self,
        filter: &ConflictFilter,
        species_options: &[SpeciesOption],
    ) -> Result<BTreeMap<String, u64>, ApiError> {
        let url = format!("{}/village-incident-counts", self.upstream.conflict_url);
        let pairs = filter.to_query_pairs(species_options);
        let body = retry::send_json(|| self.http.get(&url).query(&pairs)).await?;
        let response: VillageCountsResponse = serde_json::from_value(body)?;
        Ok(response.village_counts)
    }

    /// `GET /upload_excel` on the parser service: the full cultivation
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response does not decode.
    pub async fn cultivation_table(&self) -> Result<CultivationTable, ApiError> {
        let url = format!("{}/upload_excel", self.upstream.cultivation_url);
        let body = retry::send_json(|| self.http.get(&url)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `GET /predictions`: cultivation prediction rows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response does not decode.
    pub async fn predictions(&self) -> Result<Vec<CropPrediction>, ApiError> {
        let url = format!("{}/predictions", self.upstream.prediction_url);
        let body = retry::send_json(|| self.http.get(&url)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `POST /weather_details`: requests a fresh prediction. The
    /// response shape is owned by the prediction service and passed
    /// through opaquely.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails after retries or the
    /// response is not JSON.
    pub async fn request_prediction(
        &self,
        query: &WeatherQuery,
    ) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/weather_details", self.upstream.prediction_url);
        retry::send_json(|| self.http.post(&url).json(query)).await
    }

    /// `POST /upload`: multipart spreadsheet ingestion. The response is
    /// informational only and passed through opaquely.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the file cannot be read, the request
    /// fails after retries, or the response is not JSON.
    pub async fn upload_spreadsheet(&self, path: &Path) -> Result<serde_json::Value, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload.xlsx".to_string(), |name| name.to_string_lossy().into_owned());

        let url = format!("{}/upload", self.upstream.upload_url);
        retry::send_json(|| {
            let part = reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
            let form = reqwest::multipart::Form::new().part("file", part);
            self.http.post(&url).multipart(form)
        })
        .await
    }
}
