//! Shapes the forecast API's parallel arrays into per-day records.
//!
//! Numeric values are rounded half away from zero (`f64::round`), so 2.5
//! displays as 3 and -0.5 as -1.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::condition::weather_label;
use crate::types::{DailySeries, DayForecast, RawForecastResponse, WeatherError};

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const WEEKDAY_FORMAT: &str = "%A";

/// Normalize a raw forecast using the local time zone for dates.
pub fn normalize(raw: &RawForecastResponse) -> Result<Vec<DayForecast>, WeatherError> {
    normalize_in(raw, &Local)
}

/// Normalize a raw forecast, rendering dates in `tz`.
///
/// Produces one record per entry of `time`, in source order. Fails with
/// `MalformedForecast` if any series length differs from `time`, a timestamp
/// is out of range or a numeric value is not finite.
pub fn normalize_in<Tz>(raw: &RawForecastResponse, tz: &Tz) -> Result<Vec<DayForecast>, WeatherError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let daily = &raw.daily;
    check_lengths(daily)?;

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| -> Result<DayForecast, WeatherError> {
            let start = DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or_else(|| {
                WeatherError::MalformedForecast(format!(
                    "time[{}] = {} is out of range",
                    i, timestamp
                ))
            })?;
            let local = start.with_timezone(tz);
            let code = daily.weather_code[i];

            Ok(DayForecast {
                day: local.format(WEEKDAY_FORMAT).to_string(),
                date: local.format(DATE_FORMAT).to_string(),
                raw_weather_code: code,
                weather_code: weather_label(code).to_string(),
                temperature_2m_max: round_whole(daily.temperature_2m_max[i], "temperature_2m_max", i)?,
                temperature_2m_min: round_whole(daily.temperature_2m_min[i], "temperature_2m_min", i)?,
                wind_speed_10m_max: round_whole(daily.wind_speed_10m_max[i], "wind_speed_10m_max", i)?,
            })
        })
        .collect()
}

fn check_lengths(daily: &DailySeries) -> Result<(), WeatherError> {
    let expected = daily.time.len();
    let series = [
        ("weather_code", daily.weather_code.len()),
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("temperature_2m_min", daily.temperature_2m_min.len()),
        ("wind_speed_10m_max", daily.wind_speed_10m_max.len()),
    ];

    for (name, len) in series {
        if len != expected {
            tracing::warn!("Forecast series {} has {} entries, expected {}", name, len, expected);
            return Err(WeatherError::MalformedForecast(format!(
                "{} has {} entries but time has {}",
                name, len, expected
            )));
        }
    }
    Ok(())
}

fn round_whole(value: f64, field: &str, index: usize) -> Result<i64, WeatherError> {
    if !value.is_finite() {
        return Err(WeatherError::MalformedForecast(format!(
            "{}[{}] is not a finite number",
            field, index
        )));
    }
    Ok(value.round() as i64)
}
