//! UI rendering module for the weather dashboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod chart;
pub mod dashboard;
pub mod help_overlay;
pub mod map;
pub mod message_box;

use ratatui::Frame;

use crate::app::App;

pub use help_overlay::render as render_help_overlay;

/// Colors shared by the dashboard panels
pub(crate) mod colors {
    use ratatui::style::Color;

    /// Section headers and borders
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Placeholder and unavailable values
    pub const UNKNOWN: Color = Color::DarkGray;
    /// Temperatures
    pub const TEMPERATURE: Color = Color::Yellow;
    /// Errors
    pub const ERROR: Color = Color::Red;
    /// Location marker on the map
    pub const MARKER: Color = Color::LightRed;
    /// Text field while it has focus
    pub const EDITING: Color = Color::Yellow;
}

/// Renders the whole screen: the dashboard, then any overlays
pub fn render(frame: &mut Frame, app: &App) {
    dashboard::render(frame, app.dashboard(), app.input_mode);

    if let Some(text) = app.dashboard().visible_message() {
        message_box::render(frame, text);
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}
