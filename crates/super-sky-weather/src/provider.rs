//! Weather providers behind a common interface

use async_trait::async_trait;
use azure_maps_client::AzureMapsClient;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Result, WeatherError};
use crate::normalize::normalize_azure_maps;
use crate::types::NormalizedWeather;

/// A source of current conditions for a postal code
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Source tag used in comparison results, e.g. `AzureMaps`
    fn source(&self) -> &str;

    /// Human-readable name used in error messages
    fn display_name(&self) -> &str;

    /// Value of the `service` query parameter that selects this provider
    /// for single-service requests, if it can be selected at all
    fn service_id(&self) -> Option<&str> {
        None
    }

    async fn fetch(&self, postal_code: &str) -> Result<NormalizedWeather>;
}

/// Azure Maps (AccuWeather data): geocode the postal code, then fetch
/// current conditions at its coordinates.
pub struct AzureMapsProvider {
    client: AzureMapsClient,
}

impl AzureMapsProvider {
    pub fn new(client: AzureMapsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WeatherProvider for AzureMapsProvider {
    fn source(&self) -> &str {
        "AzureMaps"
    }

    fn display_name(&self) -> &str {
        "Azure Maps"
    }

    fn service_id(&self) -> Option<&str> {
        Some("azure")
    }

    async fn fetch(&self, postal_code: &str) -> Result<NormalizedWeather> {
        let place = self
            .client
            .search_postal_code(postal_code)
            .await?
            .ok_or_else(|| WeatherError::LocationNotFound(postal_code.to_string()))?;

        let Some((lat, lon)) = place.coordinates() else {
            warn!(zip_code = %postal_code, "Geocoding result has no position");
            return Err(WeatherError::LocationNotFound(postal_code.to_string()));
        };

        debug!(zip_code = %postal_code, lat, lon, "Resolved ZIP code");

        let conditions = self.client.current_conditions(lat, lon).await?;
        normalize_azure_maps(&conditions, postal_code, place.address.as_ref())
    }
}

/// A declared provider with no integration yet. Always fails without a network call.
pub struct UnimplementedProvider {
    source: &'static str,
    display_name: &'static str,
}

impl UnimplementedProvider {
    pub const fn new(source: &'static str, display_name: &'static str) -> Self {
        Self {
            source,
            display_name,
        }
    }
}

#[async_trait]
impl WeatherProvider for UnimplementedProvider {
    fn source(&self) -> &str {
        self.source
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    async fn fetch(&self, _postal_code: &str) -> Result<NormalizedWeather> {
        Err(WeatherError::NotImplemented(self.source.to_string()))
    }
}

/// The declared provider list, in comparison order: Azure Maps first, then
/// the placeholders.
pub fn default_providers(azure: AzureMapsClient) -> Vec<Arc<dyn WeatherProvider>> {
    vec![
        Arc::new(AzureMapsProvider::new(azure)),
        Arc::new(UnimplementedProvider::new("OpenMeteo", "Open-Meteo")),
        Arc::new(UnimplementedProvider::new("Foreca", "Foreca")),
        Arc::new(UnimplementedProvider::new("GoogleWeather", "Google Weather")),
    ]
}
