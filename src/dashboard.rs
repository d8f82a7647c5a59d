//! View state for the dashboard panels
//!
//! Every panel stores data in canonical form (temperatures in Celsius) and
//! derives its display strings on demand, so toggling the unit never
//! accumulates rounding error.

use crate::data::{ChartSeries, Coordinate, CurrentConditions, ForecastDay, TemperatureUnit, WeatherIcon};
use crate::map::MapView;

/// Shown in place of a value that is not available
pub const PLACEHOLDER: &str = "--";

/// Current conditions panel
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentPanel {
    /// Nothing requested yet
    Waiting,
    /// No data; shows a title and explanation instead
    Placeholder { title: String, description: String },
    Ready(CurrentConditions),
}

impl CurrentPanel {
    pub fn location_error() -> Self {
        CurrentPanel::Placeholder {
            title: "Location Error".to_string(),
            description: "Unable to access location data. Please enable location services or enter a city manually.".to_string(),
        }
    }

    pub fn unavailable(description: impl Into<String>) -> Self {
        CurrentPanel::Placeholder {
            title: "Weather Unavailable".to_string(),
            description: description.into(),
        }
    }

    pub fn city_name_text(&self) -> &str {
        match self {
            CurrentPanel::Waiting => "Locating...",
            CurrentPanel::Placeholder { title, .. } => title,
            CurrentPanel::Ready(current) => &current.location_name,
        }
    }

    pub fn description_text(&self) -> &str {
        match self {
            CurrentPanel::Waiting => "",
            CurrentPanel::Placeholder { description, .. } => description,
            CurrentPanel::Ready(current) => &current.description,
        }
    }

    /// Headline temperature with unit, e.g. "15.2°C" or "--°C"
    pub fn temperature_text(&self, unit: TemperatureUnit) -> String {
        match self {
            CurrentPanel::Ready(current) => unit.format(current.temperature_c),
            _ => format!("{}{}", PLACEHOLDER, unit.symbol()),
        }
    }

    /// Bare temperature value, e.g. "15.2" or "--"
    pub fn temperature_value_text(&self, unit: TemperatureUnit) -> String {
        match self {
            CurrentPanel::Ready(current) => unit.format_value(current.temperature_c),
            _ => PLACEHOLDER.to_string(),
        }
    }

    pub fn humidity_text(&self) -> String {
        match self {
            CurrentPanel::Ready(current) => format!("{}%", current.humidity_pct),
            _ => PLACEHOLDER.to_string(),
        }
    }

    pub fn wind_text(&self) -> String {
        match self {
            CurrentPanel::Ready(current) => format!("{} m/s", current.wind_speed_ms),
            _ => PLACEHOLDER.to_string(),
        }
    }

    pub fn icon(&self) -> Option<WeatherIcon> {
        match self {
            CurrentPanel::Ready(current) => Some(WeatherIcon::from_code(&current.icon_code)),
            _ => None,
        }
    }
}

/// Multi-day forecast panel
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastPanel {
    Empty,
    Loading,
    Ready(Vec<ForecastDay>),
    Failed(String),
}

/// Temperature trend chart panel
///
/// A new series replaces the previous one entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPanel {
    Empty,
    Loading,
    Ready(ChartSeries),
    Failed(String),
}

/// Notification box for errors and validation notices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub text: String,
    pub visible: bool,
}

/// Everything the dashboard shows
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub current: CurrentPanel,
    pub forecast: ForecastPanel,
    pub chart: ChartPanel,
    pub map: MapView,
    /// Text typed into the city search field
    pub city_input: String,
    pub unit: TemperatureUnit,
    /// Coordinate of the last weather load
    pub coordinate: Option<Coordinate>,
    message: Option<MessageBox>,
}

impl Dashboard {
    pub fn new(map: MapView, unit: TemperatureUnit) -> Self {
        Self {
            current: CurrentPanel::Waiting,
            forecast: ForecastPanel::Empty,
            chart: ChartPanel::Empty,
            map,
            city_input: String::new(),
            unit,
            coordinate: None,
            message: None,
        }
    }

    /// Shows a message, creating the message box on first use and reusing it
    /// afterwards
    pub fn display_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.message.as_mut() {
            Some(message) => {
                message.text = text;
                message.visible = true;
            }
            None => {
                self.message = Some(MessageBox {
                    text,
                    visible: true,
                });
            }
        }
    }

    pub fn dismiss_message(&mut self) {
        if let Some(message) = self.message.as_mut() {
            message.visible = false;
        }
    }

    /// The message currently on screen, if any
    pub fn visible_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|message| message.visible)
            .map(|message| message.text.as_str())
    }
}
