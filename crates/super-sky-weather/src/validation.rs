use regex::Regex;
use std::sync::LazyLock;

use crate::error::WeatherError;

pub const ZIP_CODE_REQUIRED: &str = "ZIP code is required";
pub const INVALID_ZIP_CODE: &str = "Invalid ZIP code format";

/// Five ASCII digits, optionally followed by a dash and four more (ZIP+4)
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").unwrap());

pub fn is_valid_postal_code(value: &str) -> bool {
    POSTAL_CODE_RE.is_match(value)
}

/// Validate a US postal code, rejecting anything that is not `12345` or `12345-6789`.
pub fn validate_postal_code(value: &str) -> Result<(), WeatherError> {
    if !is_valid_postal_code(value) {
        return Err(WeatherError::Validation(INVALID_ZIP_CODE.to_string()));
    }
    Ok(())
}
