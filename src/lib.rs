//! Weather dashboard library
//!
//! Terminal dashboard showing current conditions, a five-day forecast, a
//! temperature trend chart and a map for the user's location or a searched
//! city. The binary wires these modules to a crossterm terminal.

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod data;
pub mod location;
pub mod logging;
pub mod map;
pub mod ui;
pub mod updates;
