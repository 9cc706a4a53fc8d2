use serde::Deserialize;

/// Response from `search/address/json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressSearchResponse {
    #[serde(default)]
    pub results: Vec<AddressResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressResult {
    pub position: Option<Position>,
    pub address: Option<Address>,
}

impl AddressResult {
    /// Latitude and longitude, if both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let position = self.position.as_ref()?;
        Some((position.lat?, position.lon?))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Position {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub municipality: Option<String>,
    pub country_subdivision: Option<String>,
    pub postal_code: Option<String>,
}

/// Response from `weather/currentConditions/json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditionsResponse {
    #[serde(default)]
    pub results: Vec<CurrentConditions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub phrase: Option<String>,
    pub temperature: Option<UnitValue>,
    pub real_feel_temperature: Option<UnitValue>,
    pub relative_humidity: Option<f64>,
    pub wind: Option<Wind>,
    pub pressure: Option<UnitValue>,
    pub visibility: Option<UnitValue>,
    pub uv_index: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub location: Option<ConditionsLocation>,
}

/// A measurement with its unit, e.g. `{"value": 72.0, "unit": "F"}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitValue {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    pub direction: Option<WindDirection>,
    pub speed: Option<UnitValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindDirection {
    pub degrees: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsLocation {
    pub city: Option<String>,
    pub country_subdivision: Option<String>,
}
