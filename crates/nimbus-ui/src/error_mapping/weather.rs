use crate::services::weather_service::WeatherServiceError;
use nimbus_core::{AppError, WeatherError};

impl From<WeatherServiceError> for AppError {
    fn from(e: WeatherServiceError) -> Self {
        match e {
            WeatherServiceError::Resolution(s) => AppError::Weather(WeatherError::ResolutionFailed(s)),
            WeatherServiceError::Forecast(s) => AppError::Weather(WeatherError::ForecastFailed(s)),
            WeatherServiceError::MalformedForecast(s) => {
                AppError::Weather(WeatherError::MalformedForecast(s))
            }
            WeatherServiceError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}
