//! Super Sky Weather - ZIP code weather lookup proxy
//!
//! Serves normalized current conditions from Azure Maps and a cached
//! comparison across all declared weather providers.

use std::sync::Arc;

use azure_maps_client::AzureMapsClient;
use fetch_cache::FetchCache;
use super_sky_weather::provider::default_providers;
use super_sky_weather::{
    start_server, Config, Result, ServerState, SharedState, WeatherAggregator, WeatherError,
};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("super_sky_weather=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if config.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Super Sky Weather...");
    info!("Port: {}", config.port);
    info!("Azure Maps base URL: {}", config.azure_maps_base_url);
    if config.azure_maps_api_key.is_none() {
        warn!("AZURE_MAPS_API_KEY is not set; Azure Maps lookups will fail");
    }

    let azure = AzureMapsClient::with_base_url(
        &config.azure_maps_base_url,
        config.azure_maps_api_key.clone(),
    )?;

    // One cache for the life of the process, shared by all handlers
    let cache = Arc::new(FetchCache::new());
    let aggregator = WeatherAggregator::new(default_providers(azure), cache);

    let state: SharedState = Arc::new(ServerState::new(aggregator));

    // Start HTTP server (blocking)
    start_server(state, config.port)
        .await
        .map_err(|e| WeatherError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
