//! OpenWeatherMap API client
//!
//! This module fetches current conditions and the 5-day/3-hour forecast from
//! an OpenWeatherMap-compatible provider and parses them into our data types.

use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::{Coordinate, CurrentConditions, ForecastEntry};

/// Base URL for the OpenWeatherMap data API
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Provider has no data for the queried city or coordinate
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider answered with a non-success status
    #[error("Provider returned status {code}: {message}")]
    Provider { code: u16, message: String },

    /// Failure status whose body is not a provider response, such as a
    /// proxy error page
    #[error("Unexpected response body with status {status}: {body}")]
    UnexpectedBody { status: u16, body: String },

    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

impl WeatherError {
    /// Message reported by the provider, if it sent one
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            WeatherError::NotFound(message) | WeatherError::Provider { message, .. }
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// Client for fetching weather data from the provider
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a new WeatherClient against a custom base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch current conditions for the given coordinates
    pub async fn fetch_current(
        &self,
        coordinate: Coordinate,
    ) -> Result<CurrentConditions, WeatherError> {
        let body = self
            .get("weather", &coordinate_query(coordinate))
            .await?;
        let response: OwCurrentResponse = serde_json::from_str(&body)?;

        parse_current(response)
    }

    /// Look up a city by name and return the coordinate the provider
    /// resolved it to
    pub async fn locate_city(&self, city: &str) -> Result<Coordinate, WeatherError> {
        let body = self
            .get("weather", &[("q", city.to_string())])
            .await?;
        let response: OwCurrentResponse = serde_json::from_str(&body)?;

        let coord = response
            .coord
            .ok_or_else(|| WeatherError::MissingField("coord".to_string()))?;
        Ok(Coordinate::new(coord.lat, coord.lon))
    }

    /// Fetch the 5-day/3-hour forecast list for the given coordinates
    pub async fn fetch_forecast(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self
            .get("forecast", &coordinate_query(coordinate))
            .await?;
        let response: OwForecastResponse = serde_json::from_str(&body)?;

        response.list.into_iter().map(parse_forecast_entry).collect()
    }

    /// Issues a GET against an endpoint and returns the body once the
    /// provider's response code reports success
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        tracing::debug!(endpoint, "requesting provider");

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        check_response_code(status, &body)?;
        Ok(body)
    }
}

fn coordinate_query(coordinate: Coordinate) -> [(&'static str, String); 2] {
    [
        ("lat", coordinate.latitude.to_string()),
        ("lon", coordinate.longitude.to_string()),
    ]
}

/// Checks the `cod` field every provider response carries.
///
/// The provider sends `cod` as a number on some endpoints and as a string on
/// others, for success and failure alike.
fn check_response_code(status: StatusCode, body: &str) -> Result<(), WeatherError> {
    let envelope: StatusEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) if status.is_success() => return Err(err.into()),
        Err(_) => {
            return Err(WeatherError::UnexpectedBody {
                status: status.as_u16(),
                body: truncate_body(body),
            })
        }
    };

    let message = envelope
        .message
        .as_ref()
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();

    match envelope.cod.as_u16() {
        Some(200) => Ok(()),
        Some(404) => Err(WeatherError::NotFound(message)),
        Some(code) => Err(WeatherError::Provider { code, message }),
        None => Err(WeatherError::Provider {
            code: status.as_u16(),
            message,
        }),
    }
}

fn parse_current(response: OwCurrentResponse) -> Result<CurrentConditions, WeatherError> {
    let weather = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingField("weather".to_string()))?;

    Ok(CurrentConditions {
        location_name: response.name,
        description: weather.description,
        icon_code: weather.icon,
        temperature_c: response.main.temp,
        humidity_pct: response.main.humidity,
        wind_speed_ms: response.wind.speed,
    })
}

fn parse_forecast_entry(entry: OwForecastEntry) -> Result<ForecastEntry, WeatherError> {
    let local_time = parse_datetime(&entry.dt_txt)?;
    let weather = entry
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingField("list[].weather".to_string()))?;

    Ok(ForecastEntry {
        timestamp: entry.dt,
        local_time,
        temperature_c: entry.main.temp,
        description: weather.description,
        condition: weather.main,
        icon_code: weather.icon,
    })
}

/// Parse a forecast time string (e.g., "2024-07-15 12:00:00") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| WeatherError::InvalidTimeFormat(datetime_str.to_string()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// `cod` as sent by the provider
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseCode {
    Number(u16),
    Text(String),
}

impl ResponseCode {
    fn as_u16(&self) -> Option<u16> {
        match self {
            ResponseCode::Number(code) => Some(*code),
            ResponseCode::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Fields shared by every provider response
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    cod: ResponseCode,
    /// A string on errors; the forecast endpoint sends a number on success
    #[serde(default)]
    message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

/// Response of the current weather endpoint
#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    coord: Option<OwCoord>,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Response of the forecast endpoint
#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}
