//! `forecast-dashboard` - Open-Meteo forecasts for a few fixed places
//!
//! This library fetches hourly and daily forecasts per location, combines
//! and cleans them into tables, and renders charts into an HTML page.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use models::{FetchProfile, ForecastTables, ForecastWindow, Location, Variant};
pub use pipeline::{Dashboard, Notice, NoticeLevel};
pub use render::PageRenderer;
pub use weather::{ForecastProvider, ForecastResponse, OpenMeteoClient};
pub use web::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
