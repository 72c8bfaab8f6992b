//! Weather pipeline for Nimbus
//!
//! Resolves place names via the Open-Meteo geocoding API, fetches daily
//! forecasts for a coordinate pair and shapes them into per-day records.

pub mod cache;
pub mod condition;
pub mod geocode;
pub mod normalize;
pub mod provider;
pub mod types;

pub use cache::{CoordinateKey, RequestCache};
pub use condition::{weather_label, WeatherCondition, UNKNOWN_CONDITION};
pub use geocode::GeocodeClient;
pub use normalize::{normalize, normalize_in};
pub use provider::WeatherProvider;
pub use types::*;
