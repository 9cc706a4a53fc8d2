//! Super Sky Weather Library
//!
//! ZIP-code weather lookups against upstream providers, normalized into one
//! schema, with a cached multi-provider comparison mode.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod server;
pub mod types;
pub mod validation;

pub use aggregator::WeatherAggregator;
pub use config::Config;
pub use error::{Result, WeatherError};
pub use provider::{AzureMapsProvider, UnimplementedProvider, WeatherProvider};
pub use server::{create_router, start_server, ServerState, SharedState};
pub use types::*;
