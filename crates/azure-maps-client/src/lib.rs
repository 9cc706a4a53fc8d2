//! Azure Maps Client
//!
//! A small client for the two Azure Maps endpoints the weather service needs:
//! postal-code address search (for coordinates) and current weather conditions.
//! Responses are returned as-is with every field optional; callers decide on
//! defaults.

mod client;
mod error;
mod types;

pub use client::{AzureMapsClient, DEFAULT_BASE_URL};
pub use error::{AzureMapsError, Result};
pub use types::*;
