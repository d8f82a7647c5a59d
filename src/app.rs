//! Application state management for the weather dashboard
//!
//! This module contains the main application state and maps keyboard input
//! onto controller operations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::InitialAction;
use crate::controller::WeatherViewController;
use crate::dashboard::Dashboard;

/// Whether keys go to the city search field or trigger commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the city search field
    Editing,
}

/// Main application struct managing input state and the controller
pub struct App {
    pub controller: WeatherViewController,
    pub input_mode: InputMode,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
}

impl App {
    pub fn new(controller: WeatherViewController) -> Self {
        Self {
            controller,
            input_mode: InputMode::Normal,
            should_quit: false,
            show_help: false,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        self.controller.dashboard()
    }

    /// Runs the action chosen at startup
    pub fn start(&mut self, action: &InitialAction) {
        match action {
            InitialAction::Geolocate => {
                self.controller.acquire_location();
            }
            InitialAction::City(city) => {
                self.controller.resolve_city(city);
            }
            InitialAction::Coordinates(coordinate) => {
                self.controller.load_weather_for(*coordinate);
            }
        }
    }

    /// Applies finished background fetches. Returns how many arrived.
    pub fn tick(&mut self) -> usize {
        self.controller.process_pending()
    }

    /// Handles keyboard input
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key_event),
            InputMode::Normal => self.handle_normal_key(key_event),
        }
    }

    fn handle_normal_key(&mut self, key_event: KeyEvent) {
        // Enter and Esc close a visible message box before acting as commands
        if self.dashboard().visible_message().is_some()
            && matches!(key_event.code, KeyCode::Enter | KeyCode::Esc)
        {
            self.controller.dismiss_message();
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('/') | KeyCode::Char('c') => {
                self.controller.dismiss_message();
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Char('u') => {
                let unit = self.controller.toggle_temperature_unit();
                tracing::debug!(?unit, "temperature unit toggled");
            }
            KeyCode::Char('l') => {
                self.controller.acquire_location();
            }
            KeyCode::Char('r') => {
                self.controller.reload();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.controller.zoom_in();
            }
            KeyCode::Char('-') => {
                self.controller.zoom_out();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let city = self.dashboard().city_input.clone();
                self.controller.resolve_city(&city);
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.controller.city_input_mut().clear();
            }
            KeyCode::Backspace => {
                self.controller.city_input_mut().pop();
            }
            KeyCode::Char(c) => {
                self.controller.city_input_mut().push(c);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Coordinate, TemperatureUnit, WeatherClient};
    use crate::location::FixedLocation;
    use crate::map::{MapView, OverlaySettings, DEFAULT_ZOOM};
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
    }

    fn test_app() -> App {
        app_with("http://127.0.0.1:9")
    }

    fn app_with(base_url: &str) -> App {
        let map = MapView::new(
            OverlaySettings {
                tile_base_url: "http://tiles.test".to_string(),
                layer: "temp_new".to_string(),
                api_key: "KEY".to_string(),
            },
            DEFAULT_ZOOM,
        );
        let controller = WeatherViewController::new(
            WeatherClient::with_base_url("KEY", base_url),
            Arc::new(FixedLocation(Coordinate::new(49.28, -123.12))),
            map,
            TemperatureUnit::Celsius,
        );
        App::new(controller)
    }

    #[test]
    fn test_q_quits() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_esc_quits_in_normal_mode() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_slash_and_c_start_editing() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('c')));
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_editing_collects_text_and_backspace() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "Parisq");
        app.handle_key(key_event(KeyCode::Backspace));

        assert_eq!(app.dashboard().city_input, "Paris");
        // 'q' was typed, not treated as quit
        assert!(!app.should_quit);
    }

    #[test]
    fn test_esc_cancels_editing() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "Ber");
        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.dashboard().city_input.is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_submitting_blank_city_shows_validation_message() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "   ");
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.dashboard().visible_message(),
            Some("Please enter a city name.")
        );
    }

    #[test]
    fn test_esc_dismisses_message_before_quitting() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Enter));
        assert!(app.dashboard().visible_message().is_some());

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.dashboard().visible_message().is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_starting_a_search_closes_the_message() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Enter));
        assert!(app.dashboard().visible_message().is_some());

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.dashboard().visible_message().is_none());

        type_text(&mut app, "Ber");
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.dashboard().city_input.is_empty());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_search_after_validation_message_submits_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coord": {"lat": 48.85, "lon": 2.35},
                "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}],
                "main": {"temp": 15.2, "humidity": 72},
                "wind": {"speed": 4.1},
                "name": "Paris",
                "cod": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_with(&server.uri());
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(
            app.dashboard().visible_message(),
            Some("Please enter a city name.")
        );

        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "Paris");
        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);

        let received = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            app.controller.wait_for_updates(1),
        )
        .await
        .unwrap();
        assert_eq!(received, 1);
        assert_eq!(
            app.dashboard().map.center(),
            Some(Coordinate::new(48.85, 2.35))
        );
        server.verify().await;
    }

    #[test]
    fn test_u_toggles_unit() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.dashboard().unit, TemperatureUnit::Fahrenheit);
        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.dashboard().unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_zoom_keys() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('+')));
        assert_eq!(app.dashboard().map.zoom(), DEFAULT_ZOOM + 1);
        app.handle_key(key_event(KeyCode::Char('-')));
        app.handle_key(key_event(KeyCode::Char('-')));
        assert_eq!(app.dashboard().map.zoom(), DEFAULT_ZOOM - 1);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.dashboard().unit, TemperatureUnit::Celsius);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_reload_without_location_is_ignored() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert_eq!(app.tick(), 0);
    }

    #[tokio::test]
    async fn test_start_with_coordinates_recenters_map() {
        let mut app = test_app();
        app.start(&InitialAction::Coordinates(Coordinate::new(48.85, 2.35)));

        assert_eq!(
            app.dashboard().map.center(),
            Some(Coordinate::new(48.85, 2.35))
        );
    }

    #[tokio::test]
    async fn test_l_acquires_location_and_loads() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('l')));

        let received = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            app.controller.wait_for_updates(1),
        )
        .await
        .unwrap();
        assert_eq!(received, 1);
        assert_eq!(
            app.dashboard().map.center(),
            Some(Coordinate::new(49.28, -123.12))
        );
    }
}
