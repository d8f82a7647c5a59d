//! Core data models for wxdash
//!
//! This module contains the data types shared by the provider client, the
//! forecast derivations and the dashboard view state.

pub mod forecast;
pub mod icons;
pub mod openweather;

pub use forecast::{sample_chart_series, select_daily_forecast};
pub use icons::WeatherIcon;
pub use openweather::{WeatherClient, WeatherError};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, -90 to 90
    pub latitude: f64,
    /// Longitude, -180 to 180
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current weather at a location, as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Name of the location the provider resolved
    pub location_name: String,
    /// Human-readable description, e.g. "light rain"
    pub description: String,
    /// Provider icon code, e.g. "10d"
    pub icon_code: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Wind speed in metres per second
    pub wind_speed_ms: f64,
}

/// One 3-hour data point from the provider's forecast list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Wall-clock time reported alongside the timestamp
    pub local_time: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Human-readable description
    pub description: String,
    /// Short condition group, e.g. "Rain"
    pub condition: String,
    /// Provider icon code
    pub icon_code: String,
}

/// A single day in the multi-day forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
    pub icon_code: String,
}

impl ForecastDay {
    /// Label such as "Mon, Jul 15"
    pub fn label(&self) -> String {
        self.date.format("%a, %b %-d").to_string()
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::from_code(&self.icon_code)
    }
}

/// A single sample of the temperature trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Axis label such as "Jul 15"
    pub label: String,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature_c: f64,
}

/// Ordered samples for the temperature trend chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Unit used when displaying temperatures
///
/// Values are always stored in Celsius; the unit only affects formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Returns the other unit
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Converts a Celsius value into this unit
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    /// Formats a Celsius value in this unit with one decimal, without symbol
    pub fn format_value(self, celsius: f64) -> String {
        format!("{:.1}", self.from_celsius(celsius))
    }

    /// Formats a Celsius value in this unit with one decimal and symbol, e.g. "15.2°C"
    pub fn format(self, celsius: f64) -> String {
        format!("{}{}", self.format_value(celsius), self.symbol())
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}
