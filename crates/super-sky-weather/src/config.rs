use std::env;

use azure_maps_client::DEFAULT_BASE_URL;
use url::Url;

use crate::error::{Result, WeatherError};

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Missing keys are not fatal at startup; Azure lookups fail per request instead
    pub azure_maps_api_key: Option<String>,
    pub azure_maps_base_url: String,
    /// Emit Stackdriver-formatted JSON logs
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            azure_maps_api_key: None,
            azure_maps_base_url: DEFAULT_BASE_URL.to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let azure_maps_api_key = lookup("AZURE_MAPS_API_KEY").filter(|k| !k.trim().is_empty());

        let azure_maps_base_url = match lookup("AZURE_MAPS_BASE_URL") {
            Some(raw) if !raw.trim().is_empty() => {
                Url::parse(raw.trim()).map_err(|e| {
                    WeatherError::Config(format!("invalid AZURE_MAPS_BASE_URL {raw:?}: {e}"))
                })?;
                raw.trim().trim_end_matches('/').to_string()
            }
            _ => defaults.azure_maps_base_url,
        };

        let log_json = lookup("LOG_FORMAT").is_some_and(|v| v == "json");

        Ok(Self {
            port,
            azure_maps_api_key,
            azure_maps_base_url,
            log_json,
        })
    }
}
