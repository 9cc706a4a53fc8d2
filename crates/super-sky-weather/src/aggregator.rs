//! Single-service lookups and the cached multi-provider comparison

use chrono::Utc;
use fetch_cache::{CacheStats, FetchCache, LONG_TTL};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{Result, WeatherError};
use crate::provider::WeatherProvider;
use crate::types::{
    ComparisonResult, NormalizedWeather, RequestMode, ServiceResult, WeatherResponse,
};
use crate::validation::validate_postal_code;

/// Cache key for a comparison of one postal code
pub fn comparison_cache_key(postal_code: &str) -> String {
    format!("comparison-weather-{}", postal_code)
}

/// Routes weather requests to providers and caches comparison results
pub struct WeatherAggregator {
    providers: Vec<Arc<dyn WeatherProvider>>,
    cache: Arc<FetchCache<ComparisonResult>>,
}

impl WeatherAggregator {
    /// `providers` is the declared list, in the order comparison results are reported
    pub fn new(
        providers: Vec<Arc<dyn WeatherProvider>>,
        cache: Arc<FetchCache<ComparisonResult>>,
    ) -> Self {
        Self { providers, cache }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Look up weather for a postal code.
    ///
    /// `service` only matters for [`RequestMode::Current`].
    pub async fn get_weather(
        &self,
        postal_code: &str,
        mode: RequestMode,
        service: &str,
    ) -> Result<WeatherResponse> {
        validate_postal_code(postal_code)?;

        match mode {
            RequestMode::Comparison => Ok(WeatherResponse::Comparison(
                self.comparison(postal_code).await,
            )),
            RequestMode::Current => Ok(WeatherResponse::Current(
                self.current(postal_code, service).await?,
            )),
        }
    }

    /// Fetch from one provider. Not cached.
    pub async fn current(&self, postal_code: &str, service: &str) -> Result<NormalizedWeather> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.service_id() == Some(service))
            .ok_or_else(|| WeatherError::UnsupportedService(service.to_string()))?;

        debug!(zip_code = %postal_code, source = provider.source(), "Single-service lookup");
        provider.fetch(postal_code).await
    }

    /// Fetch from every provider, or return a fresh cached comparison.
    ///
    /// Provider failures become error entries; this never fails as a whole.
    pub async fn comparison(&self, postal_code: &str) -> ComparisonResult {
        let cache_key = comparison_cache_key(postal_code);

        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!(zip_code = %postal_code, "Serving comparison from cache");
            return ComparisonResult {
                served_from_cache: true,
                ..cached
            };
        }

        let fetches = self.providers.iter().map(|provider| async move {
            match provider.fetch(postal_code).await {
                Ok(weather) => ServiceResult::success(provider.source(), weather),
                Err(e @ WeatherError::NotImplemented(_)) => {
                    ServiceResult::failure(provider.source(), e.to_string(), postal_code)
                }
                Err(e) => {
                    // Upstream outages log at warn, local failures at error
                    if e.is_upstream() {
                        warn!(
                            zip_code = %postal_code,
                            source = provider.source(),
                            error = %e,
                            "Provider failed during comparison"
                        );
                    } else {
                        error!(
                            zip_code = %postal_code,
                            source = provider.source(),
                            error = %e,
                            "Provider failed during comparison"
                        );
                    }
                    ServiceResult::failure(
                        provider.source(),
                        format!("Failed to fetch {} data", provider.display_name()),
                        postal_code,
                    )
                }
            }
        });

        // join_all keeps the declared order regardless of completion order
        let services = join_all(fetches).await;

        let result = ComparisonResult {
            postal_code: postal_code.to_string(),
            services,
            fetched_at: Utc::now(),
            served_from_cache: false,
        };

        info!(
            zip_code = %postal_code,
            failed = result.services.iter().filter(|s| s.is_error()).count(),
            "Built weather comparison"
        );

        self.cache.put(cache_key, result.clone(), LONG_TTL).await;
        result
    }
}
