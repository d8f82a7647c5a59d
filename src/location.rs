//! Sources for the user's current position
//!
//! A terminal has no built-in geolocation, so the default source asks an
//! IP geolocation service. Fixed coordinates and a disabled source cover the
//! cases where the user supplies a position or turns lookup off.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::data::Coordinate;

/// Default IP geolocation endpoint (ip-api.com compatible)
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// Why a position could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl LocationErrorKind {
    /// Numeric code following the usual geolocation convention
    pub fn code(self) -> u16 {
        match self {
            LocationErrorKind::PermissionDenied => 1,
            LocationErrorKind::PositionUnavailable => 2,
            LocationErrorKind::Timeout => 3,
        }
    }
}

impl fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LocationErrorKind::PermissionDenied => "permission denied",
            LocationErrorKind::PositionUnavailable => "position unavailable",
            LocationErrorKind::Timeout => "timeout",
        };
        f.write_str(text)
    }
}

/// Error reported by a [`LocationSource`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location error ({}): {message}", .kind.code())]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub message: String,
}

impl LocationError {
    pub fn new(kind: LocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }
}

/// Something that can report the device's current position
#[async_trait]
pub trait LocationSource: Send + Sync + fmt::Debug {
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// Refuses every request, used when geolocation is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLocator;

#[async_trait]
impl LocationSource for DisabledLocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::new(
            LocationErrorKind::PermissionDenied,
            "Geolocation is disabled in the configuration.",
        ))
    }
}

/// Looks up the position of the machine's public IP address
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    client: Client,
    url: String,
}

/// Response of the IP geolocation service
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpGeolocator {
    /// Creates a geolocator with a request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LocationSource for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(transport_error)?;

        let lookup: IpLookupResponse = response.json().await.map_err(transport_error)?;

        if lookup.status != "success" {
            let message = lookup
                .message
                .unwrap_or_else(|| "location lookup failed".to_string());
            return Err(LocationError::new(
                LocationErrorKind::PositionUnavailable,
                message,
            ));
        }

        match (lookup.lat, lookup.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
            _ => Err(LocationError::new(
                LocationErrorKind::PositionUnavailable,
                "location service returned no coordinates",
            )),
        }
    }
}

fn transport_error(err: reqwest::Error) -> LocationError {
    let kind = if err.is_timeout() {
        LocationErrorKind::Timeout
    } else {
        LocationErrorKind::PositionUnavailable
    };
    LocationError::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_error_codes_follow_geolocation_convention() {
        assert_eq!(LocationErrorKind::PermissionDenied.code(), 1);
        assert_eq!(LocationErrorKind::PositionUnavailable.code(), 2);
        assert_eq!(LocationErrorKind::Timeout.code(), 3);
    }

    #[test]
    fn test_error_display_includes_code_and_message() {
        let err = LocationError::new(LocationErrorKind::PermissionDenied, "denied");
        assert_eq!(err.to_string(), "location error (1): denied");
        assert_eq!(err.code(), 1);
    }

    #[tokio::test]
    async fn test_fixed_location_returns_coordinate() {
        let source = FixedLocation(Coordinate::new(49.28, -123.12));
        let position = source.current_position().await.unwrap();
        assert_eq!(position, Coordinate::new(49.28, -123.12));
    }

    #[tokio::test]
    async fn test_disabled_locator_denies() {
        let err = DisabledLocator.current_position().await.unwrap_err();
        assert_eq!(err.kind, LocationErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_ip_geolocator_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .and(query_param("fields", "status,message,lat,lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 48.85,
                "lon": 2.35
            })))
            .mount(&mock_server)
            .await;

        let locator = IpGeolocator::new(
            format!("{}/json/", mock_server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();
        let position = locator.current_position().await.unwrap();

        assert!((position.latitude - 48.85).abs() < 0.0001);
        assert!((position.longitude - 2.35).abs() < 0.0001);
    }

    #[tokio::test]
    async fn test_ip_geolocator_failure_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&mock_server)
            .await;

        let locator = IpGeolocator::new(mock_server.uri(), Duration::from_secs(5)).unwrap();
        let err = locator.current_position().await.unwrap_err();

        assert_eq!(err.kind, LocationErrorKind::PositionUnavailable);
        assert_eq!(err.message, "private range");
    }

    #[tokio::test]
    async fn test_ip_geolocator_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(serde_json::json!({"status": "success", "lat": 1.0, "lon": 1.0})),
            )
            .mount(&mock_server)
            .await;

        let locator = IpGeolocator::new(mock_server.uri(), Duration::from_millis(50)).unwrap();
        let err = locator.current_position().await.unwrap_err();

        assert_eq!(err.kind, LocationErrorKind::Timeout);
    }
}
