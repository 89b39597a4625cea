// Unitcast dashboard: configuration, application state, terminal UI and
// the headless JSON export.

pub mod app;
pub mod config;
pub mod export;
pub mod tui;
