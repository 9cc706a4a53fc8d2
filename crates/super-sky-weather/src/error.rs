//! Error types for the weather proxy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

use azure_maps_client::AzureMapsError;

#[derive(Debug)]
pub enum WeatherError {
    /// Bad request input; never reaches an upstream
    Validation(String),
    /// The requested single service is not one we can query
    UnsupportedService(String),
    /// Geocoding found nothing usable for the postal code
    LocationNotFound(String),
    /// Upstream transport failure, timeout, or non-2xx status
    Upstream(AzureMapsError),
    /// Upstream answered 2xx with a body we cannot use
    InvalidPayload(String),
    /// Placeholder provider
    NotImplemented(String),
    /// Configuration error
    Config(String),
}

impl WeatherError {
    /// True for failures caused by an upstream provider rather than the request
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Upstream(_) | Self::InvalidPayload(_) | Self::LocationNotFound(_)
        )
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{}", msg),
            Self::UnsupportedService(service) => {
                write!(f, "Unsupported weather service: {}", service)
            }
            Self::LocationNotFound(zip) => write!(f, "No location found for ZIP code: {}", zip),
            Self::Upstream(e) => write!(f, "{}", e),
            Self::InvalidPayload(msg) => write!(f, "{}", msg),
            Self::NotImplemented(_) => write!(f, "Service not implemented yet"),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for WeatherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AzureMapsError> for WeatherError {
    fn from(e: AzureMapsError) -> Self {
        Self::Upstream(e)
    }
}

impl From<tracing_subscriber::filter::ParseError> for WeatherError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let body = match self {
            WeatherError::Validation(msg) => {
                return (StatusCode::BAD_REQUEST, axum::Json(json!({ "error": msg })))
                    .into_response();
            }
            WeatherError::UnsupportedService(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    axum::Json(json!({ "error": "Unsupported weather service" })),
                )
                    .into_response();
            }
            other => {
                tracing::error!(error = %other, "Weather API error");
                json!({
                    "error": "Failed to fetch weather data",
                    "details": other.to_string(),
                })
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
