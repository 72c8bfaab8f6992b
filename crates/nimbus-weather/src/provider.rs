use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::instrument;

use crate::types::{Coordinates, RawForecastResponse, WeatherError};

const USER_AGENT: &str = concat!("Nimbus/", env!("CARGO_PKG_VERSION"));

/// Daily series requested from the forecast API
pub const DAILY_SERIES: &str = "weather_code,temperature_2m_max,temperature_2m_min,wind_speed_10m_max";

/// Build the HTTP client shared by the geocoding and forecast clients
pub(crate) fn http_client(timeout: Duration) -> Result<Client, WeatherError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Forecast fetcher backed by the Open-Meteo forecast API
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(http_client(timeout)?),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the daily forecast for a coordinate pair.
    ///
    /// Day boundaries are UTC and expressed as Unix seconds. The response is
    /// returned in its raw parallel-array shape.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<RawForecastResponse, WeatherError> {
        let coordinates = Coordinates::new(latitude, longitude);
        if !coordinates.is_finite() {
            return Err(WeatherError::InvalidCoordinates(coordinates));
        }

        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&timezone=UTC&format=json&timeformat=unixtime",
            self.base_url, latitude, longitude, DAILY_SERIES
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::ForecastFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Forecast returned status {}", status);
            return Err(WeatherError::ForecastFailed(format!("status {}", status)));
        }

        let raw: RawForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::MalformedForecast(e.to_string()))?;

        tracing::info!(
            "Fetched {} forecast days for {}",
            raw.daily.time.len(),
            coordinates
        );
        Ok(raw)
    }
}
