//! Weather backend: async geocoding and forecast fetching.
//! Network work runs on the tokio runtime; results come back over a channel
//! and are applied by the model.

use nimbus_weather::{
    normalize, Coordinates, DayForecast, GeocodeCandidate, GeocodeClient, WeatherError,
    WeatherProvider,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Error type for weather operations, cheap to clone into the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherServiceError {
    Resolution(String),
    Forecast(String),
    MalformedForecast(String),
    NotInitialized,
}

impl WeatherServiceError {
    fn from_resolution(e: WeatherError) -> Self {
        WeatherServiceError::Resolution(e.to_string())
    }

    fn from_forecast(e: WeatherError) -> Self {
        match e {
            WeatherError::MalformedForecast(msg) => WeatherServiceError::MalformedForecast(msg),
            other => WeatherServiceError::Forecast(other.to_string()),
        }
    }
}

impl std::fmt::Display for WeatherServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherServiceError::Resolution(s) => write!(f, "Geocode error: {}", s),
            WeatherServiceError::Forecast(s) => write!(f, "Weather error: {}", s),
            WeatherServiceError::MalformedForecast(s) => write!(f, "Malformed forecast: {}", s),
            WeatherServiceError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherServiceError {}

/// Messages sent from async operations back to the model
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of resolving a confirmed query
    GeocodeDone {
        query: String,
        result: Result<Vec<GeocodeCandidate>, WeatherServiceError>,
    },
    /// Result of fetching and normalizing a forecast
    ForecastDone {
        coordinates: Coordinates,
        result: Result<Vec<DayForecast>, WeatherServiceError>,
    },
}

/// Request resolution of `query`.
/// Sends `GeocodeDone` on the channel when complete.
pub fn request_geocode(
    tx: &UnboundedSender<WeatherServiceMessage>,
    runtime: Option<&Handle>,
    client: GeocodeClient,
    query: String,
) {
    let tx = tx.clone();
    let Some(runtime) = runtime else {
        let _ = tx.send(WeatherServiceMessage::GeocodeDone {
            query,
            result: Err(WeatherServiceError::NotInitialized),
        });
        return;
    };

    runtime.spawn(async move {
        let result = client
            .resolve(&query)
            .await
            .map_err(WeatherServiceError::from_resolution);
        if let Err(e) = &result {
            tracing::warn!("Geocode for {:?} failed: {}", query, e);
        }
        let _ = tx.send(WeatherServiceMessage::GeocodeDone { query, result });
    });
}

/// Request the forecast for `coordinates`, normalized into display days.
/// Sends `ForecastDone` on the channel when complete.
pub fn request_forecast(
    tx: &UnboundedSender<WeatherServiceMessage>,
    runtime: Option<&Handle>,
    provider: WeatherProvider,
    coordinates: Coordinates,
) {
    let tx = tx.clone();
    let Some(runtime) = runtime else {
        let _ = tx.send(WeatherServiceMessage::ForecastDone {
            coordinates,
            result: Err(WeatherServiceError::NotInitialized),
        });
        return;
    };

    runtime.spawn(async move {
        let result = provider
            .fetch_forecast(coordinates.latitude, coordinates.longitude)
            .await
            .and_then(|raw| normalize(&raw))
            .map_err(WeatherServiceError::from_forecast);
        if let Err(e) = &result {
            tracing::warn!("Forecast for {} failed: {}", coordinates, e);
        }
        let _ = tx.send(WeatherServiceMessage::ForecastDone {
            coordinates,
            result,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn weather_error_display() {
        assert!(format!("{}", WeatherServiceError::Resolution("500".into())).contains("Geocode"));
        assert!(format!("{}", WeatherServiceError::Forecast("timeout".into())).contains("Weather"));
        assert!(format!("{}", WeatherServiceError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn malformed_forecast_keeps_its_kind() {
        let err = WeatherServiceError::from_forecast(WeatherError::MalformedForecast("len".into()));
        assert_eq!(err, WeatherServiceError::MalformedForecast("len".into()));

        let err = WeatherServiceError::from_forecast(WeatherError::ForecastFailed("503".into()));
        assert!(matches!(err, WeatherServiceError::Forecast(_)));
    }

    #[test]
    fn missing_runtime_reports_not_initialized() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let client = GeocodeClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

        request_geocode(&tx, None, client, "Berlin".into());

        let WeatherServiceMessage::GeocodeDone { query, result } = rx.try_recv().unwrap() else {
            unreachable!("expected GeocodeDone");
        };
        assert_eq!(query, "Berlin");
        assert_eq!(result, Err(WeatherServiceError::NotInitialized));
    }
}
