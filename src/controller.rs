//! Orchestration of location lookup, weather fetches and panel updates
//!
//! The controller owns the dashboard state. Operations that need the network
//! spawn a tokio task per request and return immediately; results come back
//! as [`Update`] messages which the UI loop feeds into [`WeatherViewController::apply`].
//! Each weather load fans out three independent fetches, and a failure in one
//! only affects its own panel.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::dashboard::{ChartPanel, CurrentPanel, Dashboard, ForecastPanel};
use crate::data::{
    sample_chart_series, select_daily_forecast, Coordinate, TemperatureUnit, WeatherClient,
    WeatherError,
};
use crate::location::{LocationError, LocationSource};
use crate::map::MapView;
use crate::updates::{Generation, GenerationCounter, Update};

/// Capacity of the update channel
const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Coordinates location acquisition, weather fetches and the dashboard
pub struct WeatherViewController {
    client: WeatherClient,
    locator: Arc<dyn LocationSource>,
    dashboard: Dashboard,
    /// Generations of acquire/resolve requests
    location_requests: GenerationCounter,
    /// Generations of weather loads
    weather_loads: GenerationCounter,
    updates_tx: mpsc::Sender<Update>,
    updates_rx: mpsc::Receiver<Update>,
}

impl WeatherViewController {
    pub fn new(
        client: WeatherClient,
        locator: Arc<dyn LocationSource>,
        map: MapView,
        unit: TemperatureUnit,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            client,
            locator,
            dashboard: Dashboard::new(map, unit),
            location_requests: GenerationCounter::default(),
            weather_loads: GenerationCounter::default(),
            updates_tx,
            updates_rx,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The city search field
    pub fn city_input_mut(&mut self) -> &mut String {
        &mut self.dashboard.city_input
    }

    pub fn dismiss_message(&mut self) {
        self.dashboard.dismiss_message();
    }

    pub fn zoom_in(&mut self) {
        self.dashboard.map.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.dashboard.map.zoom_out();
    }

    /// Asks the location source for the current position.
    ///
    /// On success the weather for that position is loaded; on failure the
    /// current panel falls back to placeholders. No retry is attempted.
    pub fn acquire_location(&mut self) -> Generation {
        let generation = self.location_requests.advance();
        let locator = Arc::clone(&self.locator);
        let tx = self.updates_tx.clone();

        tracing::debug!(generation = generation.value(), "acquiring location");

        tokio::spawn(async move {
            let result = locator.current_position().await;
            let _ = tx
                .send(Update::LocationAcquired { generation, result })
                .await;
        });

        generation
    }

    /// Looks up a city by name and loads its weather.
    ///
    /// Blank input is rejected with a validation message and no request is
    /// made; `None` is returned in that case.
    pub fn resolve_city(&mut self, name: &str) -> Option<Generation> {
        let city = name.trim();
        if city.is_empty() {
            self.dashboard.display_message("Please enter a city name.");
            return None;
        }

        let generation = self.location_requests.advance();
        let client = self.client.clone();
        let tx = self.updates_tx.clone();
        let city = city.to_string();

        tracing::info!(generation = generation.value(), city = %city, "resolving city");

        tokio::spawn(async move {
            let result = client.locate_city(&city).await;
            let _ = tx
                .send(Update::CityResolved {
                    generation,
                    city,
                    result,
                })
                .await;
        });

        Some(generation)
    }

    /// Centers the map on a coordinate and starts the three independent
    /// fetches: current conditions, daily forecast and chart series.
    pub fn load_weather_for(&mut self, coordinate: Coordinate) -> Generation {
        let generation = self.weather_loads.advance();

        tracing::info!(
            generation = generation.value(),
            lat = coordinate.latitude,
            lon = coordinate.longitude,
            "loading weather"
        );

        self.dashboard.coordinate = Some(coordinate);
        self.dashboard.map.show(coordinate);
        self.dashboard.forecast = ForecastPanel::Loading;
        self.dashboard.chart = ChartPanel::Loading;

        let client = self.client.clone();
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_current(coordinate).await;
            let _ = tx
                .send(Update::CurrentLoaded {
                    generation,
                    coordinate,
                    result,
                })
                .await;
        });

        let client = self.client.clone();
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = client
                .fetch_forecast(coordinate)
                .await
                .map(|entries| select_daily_forecast(&entries));
            let _ = tx.send(Update::ForecastLoaded { generation, result }).await;
        });

        let client = self.client.clone();
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = client
                .fetch_forecast(coordinate)
                .await
                .map(|entries| sample_chart_series(&entries));
            let _ = tx.send(Update::ChartLoaded { generation, result }).await;
        });

        generation
    }

    /// Loads the weather for the last coordinate again
    pub fn reload(&mut self) -> Option<Generation> {
        let coordinate = self.dashboard.coordinate?;
        Some(self.load_weather_for(coordinate))
    }

    /// Switches between Celsius and Fahrenheit and returns the new unit
    pub fn toggle_temperature_unit(&mut self) -> TemperatureUnit {
        self.dashboard.unit = self.dashboard.unit.toggled();
        self.dashboard.unit
    }

    /// Applies every update that has already arrived, without waiting.
    /// Returns how many were received.
    pub fn process_pending(&mut self) -> usize {
        let mut received = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply(update);
            received += 1;
        }
        received
    }

    /// Waits for `count` updates and applies them in arrival order
    pub async fn wait_for_updates(&mut self, count: usize) -> usize {
        let mut received = 0;
        while received < count {
            match self.updates_rx.recv().await {
                Some(update) => {
                    self.apply(update);
                    received += 1;
                }
                None => break,
            }
        }
        received
    }

    /// Applies one update to the dashboard, dropping it if a newer request
    /// of the same kind has been issued since.
    pub fn apply(&mut self, update: Update) {
        let counter = match &update {
            Update::LocationAcquired { .. } | Update::CityResolved { .. } => &self.location_requests,
            _ => &self.weather_loads,
        };
        if !counter.is_current(update.generation()) {
            tracing::debug!(
                kind = update.kind(),
                generation = update.generation().value(),
                latest = counter.latest().value(),
                "discarding stale update"
            );
            return;
        }

        match update {
            Update::LocationAcquired { result, .. } => match result {
                Ok(coordinate) => {
                    self.load_weather_for(coordinate);
                }
                Err(err) => self.show_location_error(&err),
            },
            Update::CityResolved { city, result, .. } => {
                self.dashboard.city_input.clear();
                match result {
                    Ok(coordinate) => {
                        self.load_weather_for(coordinate);
                    }
                    Err(err) => {
                        tracing::warn!(city = %city, error = %err, "city lookup failed");
                        self.dashboard.display_message(city_error_message(&city, &err));
                    }
                }
            }
            Update::CurrentLoaded {
                coordinate, result, ..
            } => match result {
                Ok(current) => {
                    let popup = format!(
                        "{}: {}, {}°C",
                        current.location_name, current.description, current.temperature_c
                    );
                    self.dashboard.map.place_marker(coordinate, popup);
                    self.dashboard.current = CurrentPanel::Ready(current);
                }
                Err(err) => {
                    tracing::error!(error = %err, "fetching current weather failed");
                    let message = current_error_message(&err);
                    self.dashboard.city_input.clear();
                    self.dashboard.map.remove_marker();
                    self.dashboard.current = CurrentPanel::unavailable(message.clone());
                    self.dashboard.display_message(message);
                }
            },
            Update::ForecastLoaded { result, .. } => match result {
                Ok(days) => {
                    self.dashboard.forecast = ForecastPanel::Ready(days);
                }
                Err(err) => {
                    tracing::error!(error = %err, "fetching forecast failed");
                    self.dashboard.forecast =
                        ForecastPanel::Failed("Failed to load forecast data.".to_string());
                }
            },
            Update::ChartLoaded { result, .. } => match result {
                Ok(series) => {
                    self.dashboard.chart = ChartPanel::Ready(series);
                }
                Err(err) => {
                    tracing::error!(error = %err, "fetching chart data failed");
                    let message = match err {
                        WeatherError::NotFound(_) | WeatherError::Provider { .. } => {
                            "Failed to load chart data."
                        }
                        _ => "Error: Could not load chart data.",
                    };
                    self.dashboard.chart = ChartPanel::Failed(message.to_string());
                }
            },
        }
    }

    fn show_location_error(&mut self, err: &LocationError) {
        tracing::warn!(code = err.code(), message = %err.message, "location unavailable");

        self.dashboard.city_input.clear();
        self.dashboard.current = CurrentPanel::location_error();
        self.dashboard.map.remove_marker();
        self.dashboard
            .display_message(format!("Unable to determine your location: {}", err.message));
    }
}

fn city_error_message(city: &str, err: &WeatherError) -> String {
    match err {
        WeatherError::NotFound(_) => {
            format!("City not found: {}. Please check the spelling.", city)
        }
        WeatherError::Provider { .. } => format!(
            "Error: {}",
            err.provider_message().unwrap_or("Weather info not found for this city.")
        ),
        _ => "Failed to fetch weather data for the city. Please try again.".to_string(),
    }
}

fn current_error_message(err: &WeatherError) -> String {
    match err {
        WeatherError::NotFound(_) | WeatherError::Provider { .. } => format!(
            "Error: {}",
            err.provider_message()
                .unwrap_or("Weather info not found for this location.")
        ),
        _ => "Failed to fetch weather data. Please try again.".to_string(),
    }
}
