#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the wildguard server.
//!
//! These types are serialized to JSON for the REST API. List-valued
//! filter parameters arrive comma-separated (`species_ids=1,2`) and are
//! split in the handlers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wildguard_session::Session;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Scoped error body returned by any panel endpoint on upstream
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// What went wrong, phrased for the panel's error state.
    pub error: String,
}

/// Shared filter query parameters for the conflict panels.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConflictQueryParams {
    /// Comma-separated species IDs.
    pub species_ids: Option<String>,
    /// Comma-separated damage-class names.
    pub damage_classes: Option<String>,
    /// Inclusive window start (`YYYY-MM-DD`).
    pub start_date: Option<NaiveDate>,
    /// Inclusive window end (`YYYY-MM-DD`).
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the timeline panel: the shared filter plus the
/// calendar scope.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQueryParams {
    /// Comma-separated species IDs.
    pub species_ids: Option<String>,
    /// Comma-separated damage-class names.
    pub damage_classes: Option<String>,
    /// Inclusive window start (`YYYY-MM-DD`).
    pub start_date: Option<NaiveDate>,
    /// Inclusive window end (`YYYY-MM-DD`).
    pub end_date: Option<NaiveDate>,
    /// `all`, `year`, or `month`. Defaults to `all`.
    pub mode: Option<String>,
    /// Calendar year for `year`/`month` modes.
    pub year: Option<i32>,
    /// 1-based month for `month` mode.
    pub month: Option<u32>,
}

/// Query parameters for the utilization panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationQueryParams {
    /// Year label to slice on (e.g. `"2020-21"`).
    pub year: String,
}

/// Query parameters for the cultivation trend panel.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrendQueryParams {
    /// Comma-separated district names. Defaults to the first district.
    pub districts: Option<String>,
    /// Comma-separated crop names. Defaults to the first crop of the
    /// selected districts.
    pub crops: Option<String>,
    /// Metric label. Defaults to total cultivated area.
    pub metric: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// An issued session as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSession {
    /// Session ID.
    pub id: String,
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Expiry timestamp (ISO 8601).
    pub expires_at: String,
}

impl From<Session> for ApiSession {
    fn from(session: Session) -> Self {
        Self {
            id: session.id.to_string(),
            email: session.email,
            name: session.name,
            expires_at: session.expires_at.to_rfc3339(),
        }
    }
}
