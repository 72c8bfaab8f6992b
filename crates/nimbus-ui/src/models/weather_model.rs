//! Weather model: owns the search state, the current candidate set and the
//! displayed forecast, and decides when each fetch may run.
//!
//! Results arrive as `WeatherServiceMessage`s and are applied last-input-wins:
//! a geocode result only lands if its query is still the confirmed query, a
//! forecast only if its coordinates still match the resolved location.

use std::time::Duration;

use nimbus_core::{AppError, WeatherConfig};
use nimbus_weather::{
    CoordinateKey, Coordinates, DayForecast, GeocodeCandidate, GeocodeClient, RequestCache,
    WeatherError, WeatherProvider,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::services::weather_service::{self, WeatherServiceError, WeatherServiceMessage};
use crate::state::{SearchPhase, SearchState};

/// Forecast currently on screen and the location it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub location: GeocodeCandidate,
    pub days: Vec<DayForecast>,
}

pub struct WeatherModel {
    state: SearchState,
    candidates: Option<Vec<GeocodeCandidate>>,
    geocode_loading: bool,
    geocode_error: Option<String>,
    forecast: Option<ForecastView>,
    forecast_loading: bool,
    forecast_error: Option<String>,
    display_days: usize,
    // Internal state
    geocoder: GeocodeClient,
    provider: WeatherProvider,
    geocode_cache: RequestCache<String, Vec<GeocodeCandidate>>,
    forecast_cache: RequestCache<CoordinateKey, Vec<DayForecast>>,
    tx: UnboundedSender<WeatherServiceMessage>,
    runtime: Option<Handle>,
}

impl WeatherModel {
    /// Build a model from config. Returns the receiver the caller polls and
    /// feeds back through [`WeatherModel::apply`].
    pub fn new(
        config: &WeatherConfig,
    ) -> Result<(Self, UnboundedReceiver<WeatherServiceMessage>), WeatherError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let ttl = match config.cache_ttl_minutes {
            0 => None,
            minutes => Some(Duration::from_secs(u64::from(minutes) * 60)),
        };
        let (tx, rx) = mpsc::unbounded_channel();

        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            tracing::error!("WeatherModel created outside a tokio runtime; fetches will fail");
        }

        let model = Self {
            state: SearchState::new(),
            candidates: None,
            geocode_loading: false,
            geocode_error: None,
            forecast: None,
            forecast_loading: false,
            forecast_error: None,
            display_days: config.display_days,
            geocoder: GeocodeClient::new(&config.geocoding_url, timeout)?,
            provider: WeatherProvider::new(&config.forecast_url, timeout)?,
            geocode_cache: RequestCache::new(ttl),
            forecast_cache: RequestCache::new(ttl),
            tx,
            runtime,
        };
        Ok((model, rx))
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.phase(self.candidates.as_deref())
    }

    /// Candidate set for the confirmed query, once resolved
    pub fn candidates(&self) -> Option<&[GeocodeCandidate]> {
        self.candidates.as_deref()
    }

    pub fn resolved_location(&self) -> Option<&GeocodeCandidate> {
        self.state.resolved_location(self.candidates.as_deref()?)
    }

    pub fn forecast(&self) -> Option<&ForecastView> {
        self.forecast.as_ref()
    }

    pub fn is_geocode_loading(&self) -> bool {
        self.geocode_loading
    }

    pub fn is_forecast_loading(&self) -> bool {
        self.forecast_loading
    }

    pub fn geocode_error(&self) -> Option<&str> {
        self.geocode_error.as_deref()
    }

    pub fn forecast_error(&self) -> Option<&str> {
        self.forecast_error.as_deref()
    }

    pub fn display_days(&self) -> usize {
        self.display_days
    }

    /// Keystroke-level edit; nothing is fetched.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.set_draft(text);
    }

    /// Confirm the draft query and start resolving it.
    ///
    /// The previous candidate set is discarded and the selection reset. The
    /// last forecast stays visible until a new one replaces it.
    pub fn submit(&mut self) {
        let submission = self.state.submit();
        tracing::info!(
            "Search #{} confirmed: {:?}",
            submission.generation,
            submission.query
        );

        self.candidates = None;
        self.geocode_error = None;
        self.forecast_loading = false;
        self.forecast_error = None;

        if let Some(cached) = self.geocode_cache.get(&submission.query) {
            tracing::debug!("Using cached candidates for {:?}", submission.query);
            self.candidates = Some(cached.clone());
            self.geocode_loading = false;
            return;
        }

        self.geocode_loading = true;
        if !self.geocode_cache.begin(submission.query.clone()) {
            tracing::debug!("Geocode for {:?} already in flight", submission.query);
            return;
        }
        weather_service::request_geocode(
            &self.tx,
            self.runtime.as_ref(),
            self.geocoder.clone(),
            submission.query,
        );
    }

    /// Select a candidate by id. Fetches the forecast only when the id
    /// resolves to a candidate in the current set. Returns whether it did.
    pub fn select(&mut self, id: i64) -> bool {
        self.state.select(id);
        self.forecast_error = None;

        let Some(location) = self.resolved_location().cloned() else {
            tracing::debug!("Location id {} is not in the current candidate set", id);
            self.forecast_loading = false;
            return false;
        };

        let coordinates = location.coordinates();
        let key = CoordinateKey::from(coordinates);
        if let Some(days) = self.forecast_cache.get(&key) {
            tracing::debug!("Using cached forecast for {}", coordinates);
            self.forecast = Some(ForecastView {
                location,
                days: days.clone(),
            });
            self.forecast_loading = false;
            return true;
        }

        self.forecast_loading = true;
        if !self.forecast_cache.begin(key) {
            tracing::debug!("Forecast for {} already in flight", coordinates);
            return true;
        }
        weather_service::request_forecast(
            &self.tx,
            self.runtime.as_ref(),
            self.provider.clone(),
            coordinates,
        );
        true
    }

    /// Select the `position`-th (1-based) candidate of the current set.
    pub fn select_position(&mut self, position: usize) -> bool {
        let id = self
            .candidates
            .as_deref()
            .and_then(|c| c.get(position.checked_sub(1)?))
            .map(|candidate| candidate.id);
        match id {
            Some(id) => self.select(id),
            None => false,
        }
    }

    /// Apply a finished request. Returns true if visible state changed.
    pub fn apply(&mut self, message: WeatherServiceMessage) -> bool {
        match message {
            WeatherServiceMessage::GeocodeDone { query, result } => {
                self.apply_geocode(query, result)
            }
            WeatherServiceMessage::ForecastDone {
                coordinates,
                result,
            } => self.apply_forecast(coordinates, result),
        }
    }

    fn apply_geocode(
        &mut self,
        query: String,
        result: Result<Vec<GeocodeCandidate>, WeatherServiceError>,
    ) -> bool {
        match &result {
            Ok(candidates) => self.geocode_cache.insert(query.clone(), candidates.clone()),
            Err(_) => self.geocode_cache.abandon(&query),
        }

        let current = self.state.has_confirmed_query() && query == self.state.confirmed_query();
        if !current || !self.geocode_loading {
            tracing::debug!("Discarding superseded geocode result for {:?}", query);
            return false;
        }

        self.geocode_loading = false;
        match result {
            Ok(candidates) => {
                self.candidates = Some(candidates);
                self.geocode_error = None;
            }
            Err(e) => {
                self.geocode_error = Some(AppError::from(e).user_message().to_string());
            }
        }
        true
    }

    fn apply_forecast(
        &mut self,
        coordinates: Coordinates,
        result: Result<Vec<DayForecast>, WeatherServiceError>,
    ) -> bool {
        let key = CoordinateKey::from(coordinates);
        match &result {
            Ok(days) => self.forecast_cache.insert(key, days.clone()),
            Err(_) => self.forecast_cache.abandon(&key),
        }

        let location = match self.resolved_location() {
            Some(location) if location.coordinates() == coordinates => location.clone(),
            _ => {
                tracing::debug!("Discarding superseded forecast for {}", coordinates);
                return false;
            }
        };

        self.forecast_loading = false;
        match result {
            Ok(days) => {
                self.forecast = Some(ForecastView { location, days });
                self.forecast_error = None;
            }
            Err(e) => {
                self.forecast_error = Some(AppError::from(e).user_message().to_string());
            }
        }
        true
    }
}
