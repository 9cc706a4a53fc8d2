//! HTTP server for the weather proxy
//!
//! Provides /health and /api/weather endpoints.

use crate::aggregator::WeatherAggregator;
use crate::error::WeatherError;
use crate::types::{HealthResponse, RequestMode, WeatherResponse};
use crate::validation::ZIP_CODE_REQUIRED;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

const DEFAULT_SERVICE: &str = "azure";

/// Shared state for the HTTP server
pub struct ServerState {
    pub aggregator: WeatherAggregator,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(aggregator: WeatherAggregator) -> Self {
        Self {
            aggregator,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Query parameters for /api/weather
///
/// Parsed from raw pairs so a repeated key takes its first value instead of
/// rejecting the request.
#[derive(Debug, Default)]
pub struct WeatherQuery {
    zip_code: Option<String>,
    service: Option<String>,
    request_type: Option<String>,
}

impl WeatherQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "zipCode" => &mut query.zip_code,
                "service" => &mut query.service,
                "type" => &mut query.request_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weather", get(get_weather))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let cache_stats = state.aggregator.cache_stats().await;
    // Clamp in case the wall clock stepped backwards
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: cache_stats,
    })
}

/// Current conditions for one service, or a comparison across all of them
async fn get_weather(
    State(state): State<SharedState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<WeatherResponse>, WeatherError> {
    let params = WeatherQuery::from_pairs(pairs);
    let zip_code = params
        .zip_code
        .filter(|z| !z.is_empty())
        .ok_or_else(|| WeatherError::Validation(ZIP_CODE_REQUIRED.to_string()))?;

    let mode = RequestMode::from_param(params.request_type.as_deref());
    let service = params
        .service
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SERVICE);

    let response = state
        .aggregator
        .get_weather(&zip_code, mode, service)
        .await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::default_providers;
    use azure_maps_client::AzureMapsClient;
    use axum::body::Body;
    use axum::extract::Query as UpstreamQuery;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use fetch_cache::FetchCache;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tower::ServiceExt;

    /// Serve a fake Azure Maps on a random local port. The conditions
    /// endpoint answers with `conditions_status`.
    async fn spawn_upstream(conditions_status: StatusCode) -> String {
        let search = |UpstreamQuery(params): UpstreamQuery<HashMap<String, String>>| async move {
            let results = match params.get("query").map(String::as_str) {
                Some("99999") => json!([]),
                _ => json!([{
                    "position": {"lat": 40.75, "lon": -73.99},
                    "address": {"municipality": "New York", "countrySubdivision": "NY"}
                }]),
            };
            Json(json!({ "results": results }))
        };

        let conditions = move || async move {
            if !conditions_status.is_success() {
                return (conditions_status, "upstream unavailable").into_response();
            }
            Json(json!({
                "results": [{
                    "phrase": "Sunny",
                    "temperature": {"value": 72.0, "unit": "F"},
                    "realFeelTemperature": {"value": 70.0, "unit": "F"},
                    "relativeHumidity": 45
                }]
            }))
            .into_response()
        };

        let router = Router::new()
            .route("/search/address/json", get(search))
            .route("/weather/currentConditions/json", get(conditions));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn create_test_state(base_url: &str, api_key: Option<&str>) -> SharedState {
        let client =
            AzureMapsClient::with_base_url(base_url, api_key.map(str::to_string)).unwrap();
        let aggregator =
            WeatherAggregator::new(default_providers(client), Arc::new(FetchCache::new()));
        Arc::new(ServerState::new(aggregator))
    }

    async fn upstream_state(conditions_status: StatusCode) -> SharedState {
        let base = spawn_upstream(conditions_status).await;
        create_test_state(&base, Some("test-key"))
    }

    /// State whose upstream is unreachable; for requests that must not get that far
    fn offline_state() -> SharedState {
        create_test_state("http://127.0.0.1:9", Some("test-key"))
    }

    async fn send(state: SharedState, uri: &str) -> (StatusCode, Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, json) = send(offline_state(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert_eq!(json["cache"]["entries"], 0);
    }

    #[tokio::test]
    async fn test_missing_zip_code() {
        for uri in ["/api/weather", "/api/weather?zipCode=", "/api/weather?type=comparison"] {
            let (status, json) = send(offline_state(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json, json!({ "error": "ZIP code is required" }));
        }
    }

    #[tokio::test]
    async fn test_invalid_zip_code_regardless_of_params() {
        for query in [
            "zipCode=1234",
            "zipCode=abcde",
            "zipCode=10001-12",
            "zipCode=123456&type=comparison",
            "zipCode=ABCDE&service=azure&type=current",
            "zipCode=1000x&service=unknown",
        ] {
            let (status, json) = send(offline_state(), &format!("/api/weather?{query}")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
            assert_eq!(json, json!({ "error": "Invalid ZIP code format" }));
        }
    }

    #[tokio::test]
    async fn test_unsupported_service() {
        let (status, json) = send(
            offline_state(),
            "/api/weather?zipCode=10001&service=openmeteo&type=current",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "Unsupported weather service" }));
    }

    #[tokio::test]
    async fn test_current_weather_from_azure() {
        let state = upstream_state(StatusCode::OK).await;

        let (status, json) = send(
            state,
            "/api/weather?zipCode=10001&type=current&service=azure",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["service"], "Azure Maps (AccuWeather)");
        assert_eq!(json["current"]["temperature"], 72.0);
        assert_eq!(json["current"]["feelsLike"], 70.0);
        assert_eq!(json["current"]["description"], "Sunny");
        assert_eq!(json["current"]["windSpeed"], 0.0);
        assert_eq!(json["location"]["zipCode"], "10001");
        assert_eq!(json["location"]["city"], "New York");
        assert_eq!(json["location"]["state"], "NY");
        assert_eq!(json["cached"], false);
    }

    #[tokio::test]
    async fn test_current_is_default_mode_and_azure_default_service() {
        let state = upstream_state(StatusCode::OK).await;

        let (status, json) = send(state, "/api/weather?zipCode=10001-1234").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["location"]["zipCode"], "10001-1234");
    }

    #[tokio::test]
    async fn test_current_upstream_failure_is_500() {
        let state = upstream_state(StatusCode::SERVICE_UNAVAILABLE).await;

        let (status, json) = send(state, "/api/weather?zipCode=10001&service=azure").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to fetch weather data");
        assert!(json["details"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_current_location_not_found_is_500() {
        let state = upstream_state(StatusCode::OK).await;

        let (status, json) = send(state, "/api/weather?zipCode=99999").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["details"], "No location found for ZIP code: 99999");
    }

    #[tokio::test]
    async fn test_current_missing_credentials_is_500() {
        let state = create_test_state("http://127.0.0.1:9", None);

        let (status, json) = send(state, "/api/weather?zipCode=10001").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["details"], "Azure Maps API credentials not configured");
    }

    #[tokio::test]
    async fn test_comparison_lists_all_services() {
        let state = upstream_state(StatusCode::OK).await;

        let (status, json) = send(state, "/api/weather?zipCode=10001&type=comparison").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["zipCode"], "10001");
        assert_eq!(json["cached"], false);

        let services = json["services"].as_array().unwrap();
        let sources: Vec<&str> = services
            .iter()
            .map(|s| s["source"].as_str().unwrap())
            .collect();
        assert_eq!(sources, ["AzureMaps", "OpenMeteo", "Foreca", "GoogleWeather"]);

        assert_eq!(services[0]["isError"], false);
        assert_eq!(services[0]["current"]["temperature"], 72.0);
        for placeholder in &services[1..] {
            assert_eq!(placeholder["isError"], true);
            assert_eq!(placeholder["errorMessage"], "Service not implemented yet");
            assert_eq!(placeholder["location"]["zipCode"], "10001");
        }
    }

    #[tokio::test]
    async fn test_comparison_survives_upstream_failure() {
        let state = upstream_state(StatusCode::INTERNAL_SERVER_ERROR).await;

        let (status, json) = send(state, "/api/weather?zipCode=10001&type=comparison").await;

        assert_eq!(status, StatusCode::OK);
        let services = json["services"].as_array().unwrap();
        assert_eq!(services.len(), 4);
        assert_eq!(services[0]["source"], "AzureMaps");
        assert_eq!(services[0]["isError"], true);
        assert_eq!(services[0]["errorMessage"], "Failed to fetch Azure Maps data");
    }

    #[tokio::test]
    async fn test_second_comparison_is_cached() {
        let state = upstream_state(StatusCode::OK).await;

        let (_, first) = send(state.clone(), "/api/weather?zipCode=10001&type=comparison").await;
        let (status, second) =
            send(state.clone(), "/api/weather?zipCode=10001&type=comparison").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["cached"], false);
        assert_eq!(second["cached"], true);
        assert_eq!(second["timestamp"], first["timestamp"]);

        let (_, health) = send(state, "/health").await;
        assert_eq!(health["cache"]["entries"], 1);
        assert_eq!(health["cache"]["hits"], 1);
    }

    #[tokio::test]
    async fn test_current_does_not_populate_cache() {
        let state = upstream_state(StatusCode::OK).await;

        send(state.clone(), "/api/weather?zipCode=10001").await;
        let (_, health) = send(state, "/health").await;

        assert_eq!(health["cache"]["entries"], 0);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_leak_api_key() {
        let state = create_test_state("http://127.0.0.1:9", Some("SECRET-KEY-123"));

        let (status, json) = send(state.clone(), "/api/weather?zipCode=10001").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to fetch weather data");
        assert!(!json.to_string().contains("SECRET-KEY-123"), "{json}");

        let (status, json) = send(state, "/api/weather?zipCode=10001&type=comparison").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["services"][0]["isError"], true);
        assert!(!json.to_string().contains("SECRET-KEY-123"), "{json}");
    }

    #[tokio::test]
    async fn test_repeated_query_key_takes_first_value() {
        let (status, json) = send(
            offline_state(),
            "/api/weather?zipCode=10001&zipCode=10002&type=comparison&type=current",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["zipCode"], "10001");
        assert_eq!(json["services"].as_array().unwrap().len(), 4);

        let (status, json) =
            send(offline_state(), "/api/weather?zipCode=abc&zipCode=10001").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "Invalid ZIP code format" }));
    }

    #[test]
    fn test_weather_query_from_pairs() {
        let pairs = vec![
            ("service".to_string(), "".to_string()),
            ("other".to_string(), "x".to_string()),
            ("service".to_string(), "azure".to_string()),
            ("zipCode".to_string(), "10001".to_string()),
        ];
        let query = WeatherQuery::from_pairs(pairs);

        assert_eq!(query.zip_code.as_deref(), Some("10001"));
        assert_eq!(query.service.as_deref(), Some(""));
        assert!(query.request_type.is_none());
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let slow = || async {
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            Json(json!({ "results": [] }))
        };
        let router = Router::new()
            .route("/search/address/json", get(slow))
            .route("/weather/currentConditions/json", get(slow));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = AzureMapsClient::with_timeout(
            &base,
            Some("test-key".into()),
            std::time::Duration::from_millis(100),
        )
        .unwrap();
        let aggregator =
            WeatherAggregator::new(default_providers(client), Arc::new(FetchCache::new()));
        let state = Arc::new(ServerState::new(aggregator));

        let (status, json) = send(state.clone(), "/api/weather?zipCode=10001").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to fetch weather data");
        let details = json["details"].as_str().unwrap();
        assert!(details.starts_with("Azure Maps request timed out"), "{details}");

        let (status, json) = send(state, "/api/weather?zipCode=10001&type=comparison").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["services"][0]["source"], "AzureMaps");
        assert_eq!(json["services"][0]["isError"], true);
        assert_eq!(json["services"][0]["errorMessage"], "Failed to fetch Azure Maps data");
    }

    #[tokio::test]
    async fn test_uptime_never_negative() {
        let client = AzureMapsClient::with_base_url("http://127.0.0.1:9", None).unwrap();
        let aggregator =
            WeatherAggregator::new(default_providers(client), Arc::new(FetchCache::new()));
        // Clock stepped back after startup
        let state = Arc::new(ServerState {
            aggregator,
            started_at: Utc::now() + chrono::Duration::hours(1),
        });

        let (status, json) = send(state, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["uptime_secs"], 0);
    }

    #[test]
    fn test_server_state_new() {
        let state = offline_state();

        let diff = (Utc::now() - state.started_at).num_seconds();
        assert!((0..5).contains(&diff));
    }
}
