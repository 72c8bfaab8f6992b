use serde::{Deserialize, Serialize};

/// A place matching a geocoding query
///
/// Field names follow the geocoding API so results map one to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub id: i64,
    pub name: String,
    /// Missing for a handful of places (oceans, disputed regions)
    #[serde(default)]
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Latitude/longitude pair a forecast is requested for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Forecast API response, kept in its parallel-array shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastResponse {
    pub daily: DailySeries,
}

/// Daily series indexed by day. All arrays are expected to share a length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySeries {
    /// Day start, Unix seconds (UTC)
    pub time: Vec<i64>,
    /// WMO weather interpretation code
    pub weather_code: Vec<i64>,
    /// °C
    pub temperature_2m_max: Vec<f64>,
    /// °C
    pub temperature_2m_min: Vec<f64>,
    /// km/h
    pub wind_speed_10m_max: Vec<f64>,
}

/// One normalized forecast day, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayForecast {
    /// Weekday name, e.g. "Friday"
    pub day: String,
    /// Short date, e.g. "3/7/2025"
    pub date: String,
    pub raw_weather_code: i64,
    /// Human readable condition label
    pub weather_code: String,
    pub temperature_2m_max: i64,
    pub temperature_2m_min: i64,
    pub wind_speed_10m_max: i64,
}

/// Weather pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Geocode fetch failed: {0}")]
    ResolutionFailed(String),
    #[error("Weather fetch failed: {0}")]
    ForecastFailed(String),
    #[error("Malformed forecast: {0}")]
    MalformedForecast(String),
    #[error("Coordinates must be finite, got {0}")]
    InvalidCoordinates(Coordinates),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_from_api_json() {
        let json = serde_json::json!({
            "id": 2950159,
            "name": "Berlin",
            "latitude": 52.52437,
            "longitude": 13.41053,
            "elevation": 74.0,
            "country_code": "DE",
            "timezone": "Europe/Berlin"
        });
        let candidate: GeocodeCandidate = serde_json::from_value(json).unwrap();
        assert_eq!(candidate.id, 2950159);
        assert_eq!(candidate.country_code, "DE");
        assert_eq!(candidate.coordinates(), Coordinates::new(52.52437, 13.41053));
    }

    #[test]
    fn test_candidate_without_country_code() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Atlantic Ocean",
            "latitude": 0.0,
            "longitude": -30.0
        });
        let candidate: GeocodeCandidate = serde_json::from_value(json).unwrap();
        assert_eq!(candidate.country_code, "");
    }

    #[test]
    fn test_candidate_missing_coordinates_is_rejected() {
        let json = serde_json::json!({ "id": 1, "name": "Nowhere" });
        assert!(serde_json::from_value::<GeocodeCandidate>(json).is_err());
    }

    #[test]
    fn test_coordinates_finite() {
        assert!(Coordinates::new(52.52, 13.405).is_finite());
        assert!(!Coordinates::new(f64::NAN, 13.405).is_finite());
        assert!(!Coordinates::new(52.52, f64::INFINITY).is_finite());
    }
}
