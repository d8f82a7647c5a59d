//! Command-line interface parsing for the weather dashboard
//!
//! This module handles parsing of CLI arguments using clap and decides what
//! the dashboard shows first: a city, a fixed coordinate, or the position
//! reported by geolocation.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::Coordinate;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Latitude outside -90..=90
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    /// Only one half of a coordinate was given
    #[error("Invalid coordinate: --lat and --lon must be given together")]
    IncompleteCoordinate,

    #[error("Invalid city: name must not be empty")]
    EmptyCity,
}

/// Weather dashboard - current conditions, forecast and map in the terminal
#[derive(Parser, Debug)]
#[command(name = "wxdash")]
#[command(about = "Weather dashboard with forecast, temperature chart and map")]
#[command(version)]
pub struct Cli {
    /// Show the weather for a city instead of the current location
    ///
    /// Examples:
    ///   wxdash --city Paris
    ///   wxdash --city "New York"
    #[arg(long, value_name = "NAME", conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude of the location to show (use with --lon)
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the location to show (use with --lat)
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Display temperatures in Fahrenheit
    #[arg(long)]
    pub fahrenheit: bool,

    /// Do not look up the current location from the network
    #[arg(long)]
    pub no_geolocate: bool,

    /// OpenWeatherMap API key (overrides OPENWEATHER_API_KEY and the config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Path to the config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// What the dashboard loads right after it starts
#[derive(Debug, Clone, PartialEq)]
pub enum InitialAction {
    /// Ask the location source for the position
    Geolocate,
    /// Look up a city by name
    City(String),
    /// Load weather for a known coordinate
    Coordinates(Coordinate),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub initial_action: InitialAction,
    /// Fahrenheit requested on the command line
    pub fahrenheit: bool,
    /// Geolocation turned off on the command line
    pub no_geolocate: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_action: InitialAction::Geolocate,
            fahrenheit: false,
            no_geolocate: false,
        }
    }
}

/// Validates a latitude/longitude pair
pub fn parse_coordinate(lat: f64, lon: f64) -> Result<Coordinate, CliError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CliError::InvalidLatitude(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CliError::InvalidLongitude(lon));
    }
    Ok(Coordinate::new(lat, lon))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the initial action to run
    /// * `Err(CliError)` if the coordinate or city is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_action = match (&cli.city, cli.lat, cli.lon) {
            (Some(city), _, _) => {
                let city = city.trim();
                if city.is_empty() {
                    return Err(CliError::EmptyCity);
                }
                InitialAction::City(city.to_string())
            }
            (None, Some(lat), Some(lon)) => InitialAction::Coordinates(parse_coordinate(lat, lon)?),
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(CliError::IncompleteCoordinate)
            }
            (None, None, None) => InitialAction::Geolocate,
        };

        Ok(StartupConfig {
            initial_action,
            fahrenheit: cli.fahrenheit,
            no_geolocate: cli.no_geolocate,
        })
    }
}
