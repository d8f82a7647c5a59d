//! Map model: center, zoom, tile layers and the location marker
//!
//! The terminal renders coastlines instead of raster tiles, but the model
//! keeps the same layer bookkeeping a tiled map would so the weather overlay
//! is swapped rather than stacked when the location changes.

use std::f64::consts::PI;

use crate::data::Coordinate;

/// Zoom used when the map is first shown
pub const DEFAULT_ZOOM: u8 = 10;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Default weather overlay layer
pub const DEFAULT_OVERLAY_LAYER: &str = "temp_new";

/// Default base URL for weather overlay tiles
pub const DEFAULT_TILE_BASE_URL: &str = "https://tile.openweathermap.org";

/// Narrowest span the terminal viewport shows, in degrees of longitude
const MIN_VIEW_SPAN_DEGREES: f64 = 6.0;

const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
const OWM_ATTRIBUTION: &str = "Weather data © OpenWeatherMap";

/// A raster tile layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    /// URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    pub opacity: f32,
    pub attribution: String,
}

impl TileLayer {
    /// The OpenStreetMap base layer
    pub fn base() -> Self {
        Self {
            name: "OpenStreetMap".to_string(),
            url_template: OSM_TILE_URL.to_string(),
            opacity: 1.0,
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }

    /// A semi-transparent weather overlay such as "temp_new"
    pub fn weather_overlay(overlay: &OverlaySettings) -> Self {
        Self {
            name: overlay.layer.clone(),
            url_template: format!(
                "{}/map/{}/{{z}}/{{x}}/{{y}}.png?appid={}",
                overlay.tile_base_url.trim_end_matches('/'),
                overlay.layer,
                overlay.api_key
            ),
            opacity: 0.5,
            attribution: OWM_ATTRIBUTION.to_string(),
        }
    }

    pub fn is_weather_overlay(&self) -> bool {
        self.attribution.contains("OpenWeatherMap")
    }

    /// Expands the template for one tile
    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{s}", "a")
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Where weather overlay tiles come from
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub tile_base_url: String,
    pub layer: String,
    pub api_key: String,
}

/// Marker pinned at the current location
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub popup: String,
}

/// Longitude and latitude bounds of the visible area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// State of the map panel
#[derive(Debug, Clone)]
pub struct MapView {
    center: Option<Coordinate>,
    zoom: u8,
    /// Zoom every recenter returns to
    default_zoom: u8,
    layers: Vec<TileLayer>,
    marker: Option<Marker>,
    overlay: OverlaySettings,
}

impl MapView {
    pub fn new(overlay: OverlaySettings, zoom: u8) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            center: None,
            zoom,
            default_zoom: zoom,
            layers: Vec::new(),
            marker: None,
            overlay,
        }
    }

    /// Centers the map on a coordinate, initializing it on first use.
    ///
    /// The first call adds the base layer. Every call resets the zoom to the
    /// configured level and replaces the weather overlay so exactly one is
    /// present.
    pub fn show(&mut self, coordinate: Coordinate) {
        if self.center.is_none() {
            self.layers.push(TileLayer::base());
        } else {
            self.layers.retain(|layer| !layer.is_weather_overlay());
        }
        self.layers.push(TileLayer::weather_overlay(&self.overlay));
        self.center = Some(coordinate);
        self.zoom = self.default_zoom;
    }

    /// Places the marker, replacing any existing one
    pub fn place_marker(&mut self, coordinate: Coordinate, popup: impl Into<String>) {
        self.marker = Some(Marker {
            coordinate,
            popup: popup.into(),
        });
    }

    pub fn remove_marker(&mut self) {
        self.marker = None;
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Slippy-map tile containing the center at the current zoom
    pub fn center_tile(&self) -> Option<(u8, u32, u32)> {
        self.center.map(|center| {
            let (x, y) = tile_index(center, self.zoom);
            (self.zoom, x, y)
        })
    }

    /// Area to draw around the center
    pub fn viewport(&self) -> Option<Viewport> {
        let center = self.center?;
        let lon_span = (360.0 / 2f64.powi(i32::from(self.zoom))).max(MIN_VIEW_SPAN_DEGREES);
        let lat_span = lon_span / 2.0;

        let lat_min = (center.latitude - lat_span / 2.0).max(-90.0);
        let lat_max = (center.latitude + lat_span / 2.0).min(90.0);

        Some(Viewport {
            x_bounds: [
                center.longitude - lon_span / 2.0,
                center.longitude + lon_span / 2.0,
            ],
            y_bounds: [lat_min, lat_max],
        })
    }
}

/// Web-Mercator tile index of a coordinate
pub fn tile_index(coordinate: Coordinate, zoom: u8) -> (u32, u32) {
    let n = 2f64.powi(i32::from(zoom));
    let max_index = n - 1.0;
    let lat_rad = coordinate.latitude.clamp(-85.0511, 85.0511).to_radians();

    let x = ((coordinate.longitude + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    (x.clamp(0.0, max_index) as u32, y.clamp(0.0, max_index) as u32)
}
