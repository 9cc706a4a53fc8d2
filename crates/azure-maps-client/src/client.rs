use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AzureMapsError, Result};
use crate::types::{AddressResult, AddressSearchResponse, CurrentConditionsResponse};

pub const DEFAULT_BASE_URL: &str = "https://atlas.microsoft.com";
const DEFAULT_USER_AGENT: &str = "Super-Sky-Weather-App/1.0";
const API_VERSION: &str = "1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Azure Maps client for postal-code search and current conditions
pub struct AzureMapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AzureMapsClient {
    /// Create a client against the public Azure Maps endpoint
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom base URL (gateways, test servers)
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout (10 seconds by default)
    pub fn with_timeout(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(AzureMapsError::MissingCredentials)
    }

    /// Look up a US postal code, returning the best match if any
    pub async fn search_postal_code(&self, postal_code: &str) -> Result<Option<AddressResult>> {
        let api_key = self.api_key()?;
        let url = format!("{}/search/address/json", self.base_url);

        debug!(postal_code, "Searching Azure Maps address");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api-version", API_VERSION),
                ("subscription-key", api_key),
                ("query", postal_code),
                ("countrySet", "US"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let data: AddressSearchResponse = Self::read_json(response).await?;
        Ok(data.results.into_iter().next())
    }

    /// Fetch current conditions at the given coordinates
    pub async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditionsResponse> {
        let api_key = self.api_key()?;
        let url = format!("{}/weather/currentConditions/json", self.base_url);
        let query = format!("{},{}", latitude, longitude);

        debug!(lat = latitude, lon = longitude, "Fetching Azure Maps current conditions");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api-version", API_VERSION),
                ("query", query.as_str()),
                ("subscription-key", api_key),
            ])
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    let e = e.without_url();
                    debug!(status = %status, error = %e, "Failed to read Azure Maps error body");
                    String::new()
                }
            };
            warn!(status = %status, body = %body, "Azure Maps request failed");
            return Err(AzureMapsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
