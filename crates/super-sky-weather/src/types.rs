//! Core types for the weather proxy
//!
//! Field names on the wire follow the web client's contract (`zipCode`,
//! `cached`, `timestamp`, ...), so several fields are renamed.

use chrono::{DateTime, Utc};
use fetch_cache::CacheStats;
use serde::{Deserialize, Serialize};

/// Where a normalized record was observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub postal_code: String,
}

/// Current conditions in the common schema. Missing upstream values are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    pub visibility: f64,
    pub uv_index: f64,
    pub cloud_cover: f64,
}

/// One provider's response reshaped into the common schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    #[serde(rename = "service")]
    pub source_name: String,
    pub location: Location,
    pub current: CurrentConditions,
    #[serde(rename = "forecast")]
    pub forecast_daily: Vec<serde_json::Value>,
    #[serde(rename = "hourly")]
    pub forecast_hourly: Vec<serde_json::Value>,
    #[serde(rename = "cached")]
    pub served_from_cache: bool,
    #[serde(rename = "timestamp")]
    pub fetched_at: DateTime<Utc>,
}

/// Postal code attached to a failed provider entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLocation {
    #[serde(rename = "zipCode")]
    pub postal_code: String,
}

/// A provider that answered, tagged with its source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSuccess {
    pub source: String,
    #[serde(flatten)]
    pub weather: NormalizedWeather,
    pub is_error: bool,
}

/// A provider that failed or is not implemented
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFailure {
    pub source: String,
    pub is_error: bool,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ErrorLocation>,
}

/// One entry of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceResult {
    Success(ServiceSuccess),
    Failure(ServiceFailure),
}

impl ServiceResult {
    pub fn success(source: &str, weather: NormalizedWeather) -> Self {
        Self::Success(ServiceSuccess {
            source: source.to_string(),
            weather,
            is_error: false,
        })
    }

    pub fn failure(source: &str, error_message: impl Into<String>, postal_code: &str) -> Self {
        Self::Failure(ServiceFailure {
            source: source.to_string(),
            is_error: true,
            error_message: error_message.into(),
            location: Some(ErrorLocation {
                postal_code: postal_code.to_string(),
            }),
        })
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Success(s) => &s.source,
            Self::Failure(f) => &f.source,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Results from every declared provider for one postal code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    #[serde(rename = "zipCode")]
    pub postal_code: String,
    pub services: Vec<ServiceResult>,
    #[serde(rename = "timestamp")]
    pub fetched_at: DateTime<Utc>,
    #[serde(rename = "cached")]
    pub served_from_cache: bool,
}

/// Body of a successful `/api/weather` response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherResponse {
    Current(NormalizedWeather),
    Comparison(ComparisonResult),
}

/// Which shape of data a request asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMode {
    #[default]
    Current,
    Comparison,
}

impl RequestMode {
    /// Parse the `type` query parameter. Anything other than `comparison` is `Current`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("comparison") => Self::Comparison,
            _ => Self::Current,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}
