//! Plain-text rendering of the weather model for the terminal.

use std::fmt::Write;

use nimbus_weather::{DayForecast, GeocodeCandidate, WeatherCondition};

use crate::models::WeatherModel;

pub const SELECT_PROMPT: &str = "--Select a location--";

/// Option label for a candidate, e.g. "Berlin, DE (Lat: 52.52, Lon: 13.405)"
pub fn candidate_label(candidate: &GeocodeCandidate) -> String {
    format!(
        "{}, {} (Lat: {}, Lon: {})",
        candidate.name, candidate.country_code, candidate.latitude, candidate.longitude
    )
}

/// Numbered candidate list; empty when there is nothing to choose from
pub fn render_candidates(candidates: &[GeocodeCandidate], selected: Option<i64>) -> String {
    if candidates.is_empty() {
        return String::new();
    }

    let mut out = format!("{}\n", SELECT_PROMPT);
    for (i, candidate) in candidates.iter().enumerate() {
        let marker = if Some(candidate.id) == selected { '*' } else { ' ' };
        let _ = writeln!(out, "{} {}. {}", marker, i + 1, candidate_label(candidate));
    }
    out
}

pub fn render_day(day: &DayForecast) -> String {
    let icon = WeatherCondition::from_wmo_code(day.raw_weather_code).icon_name();
    format!(
        "{} - {}\n  [{}] {}\n  Min: {}°C - Max: {}°C\n  Max wind speed: {} km/h\n",
        day.day,
        day.date,
        icon,
        day.weather_code,
        day.temperature_2m_min,
        day.temperature_2m_max,
        day.wind_speed_10m_max
    )
}

/// Render the whole screen
pub fn render(model: &WeatherModel) -> String {
    let mut out = String::new();

    if model.is_geocode_loading() {
        out.push_str("Searching...\n");
    }
    if let Some(err) = model.geocode_error() {
        let _ = writeln!(out, "{}", err);
    }

    if let Some(candidates) = model.candidates() {
        if candidates.is_empty() {
            let _ = writeln!(
                out,
                "No locations found for \"{}\".",
                model.state().confirmed_query()
            );
        }
        out.push_str(&render_candidates(
            candidates,
            model.state().selected_location_id(),
        ));
    }

    if model.resolved_location().is_some() && model.is_forecast_loading() {
        out.push_str("Loading weather data...\n");
    }
    if let Some(err) = model.forecast_error() {
        let _ = writeln!(out, "{}", err);
    }

    if let Some(forecast) = model.forecast() {
        let days: Vec<&DayForecast> = forecast.days.iter().take(model.display_days()).collect();
        let _ = writeln!(
            out,
            "\n{} day weather for {}",
            days.len(),
            forecast.location.name
        );
        for day in days {
            out.push_str(&render_day(day));
        }
    }

    out
}
