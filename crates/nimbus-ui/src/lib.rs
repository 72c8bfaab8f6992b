//! Search/selection state, fetch orchestration and the terminal view.

pub mod error_mapping;
pub mod models;
pub mod services;
pub mod state;
pub mod view;

pub use models::weather_model::WeatherModel;
pub use services::weather_service::{WeatherServiceError, WeatherServiceMessage};
pub use state::{SearchPhase, SearchState, Submission};
