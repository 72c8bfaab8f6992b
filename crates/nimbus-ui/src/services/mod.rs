//! Async services that run network work off the input loop.

pub mod weather_service;

pub use weather_service::{WeatherServiceError, WeatherServiceMessage};
