//! Conversion of provider payloads into the common weather schema

use azure_maps_client::{Address, CurrentConditionsResponse, UnitValue};
use chrono::Utc;

use crate::error::{Result, WeatherError};
use crate::types::{CurrentConditions, Location, NormalizedWeather};

pub const AZURE_MAPS_SERVICE_NAME: &str = "Azure Maps (AccuWeather)";
const UNKNOWN: &str = "Unknown";

fn number(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

fn unit_value(value: Option<&UnitValue>) -> f64 {
    number(value.and_then(|v| v.value))
}

/// First non-empty string, or "Unknown"
fn text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Normalize an Azure Maps current-conditions payload.
///
/// City and state come from the geocoding address when available, then from
/// the conditions payload itself. Fails when the payload has no result.
pub fn normalize_azure_maps(
    data: &CurrentConditionsResponse,
    postal_code: &str,
    address: Option<&Address>,
) -> Result<NormalizedWeather> {
    let result = data.results.first().ok_or_else(|| {
        WeatherError::InvalidPayload("Invalid Azure Maps weather data received".to_string())
    })?;

    let payload_location = result.location.as_ref();
    let location = Location {
        city: text([
            address.and_then(|a| a.municipality.as_deref()),
            payload_location.and_then(|l| l.city.as_deref()),
        ]),
        state: text([
            address.and_then(|a| a.country_subdivision.as_deref()),
            payload_location.and_then(|l| l.country_subdivision.as_deref()),
        ]),
        postal_code: postal_code.to_string(),
    };

    let wind = result.wind.as_ref();
    let current = CurrentConditions {
        temperature: unit_value(result.temperature.as_ref()),
        feels_like: unit_value(result.real_feel_temperature.as_ref()),
        description: text([result.phrase.as_deref()]),
        humidity: number(result.relative_humidity),
        wind_speed: unit_value(wind.and_then(|w| w.speed.as_ref())),
        wind_direction: number(wind.and_then(|w| w.direction.as_ref()).and_then(|d| d.degrees)),
        pressure: unit_value(result.pressure.as_ref()),
        visibility: unit_value(result.visibility.as_ref()),
        uv_index: number(result.uv_index),
        cloud_cover: number(result.cloud_cover),
    };

    Ok(NormalizedWeather {
        source_name: AZURE_MAPS_SERVICE_NAME.to_string(),
        location,
        current,
        forecast_daily: Vec::new(),
        forecast_hourly: Vec::new(),
        served_from_cache: false,
        fetched_at: Utc::now(),
    })
}
