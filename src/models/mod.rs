//! Data models for the forecast dashboard
//!
//! - Location: named coordinates and the built-in location table
//! - Window: the requested date range
//! - Profile: which series are fetched for a dashboard variant
//! - Forecast: hourly/daily rows and the combined tables

pub mod forecast;
pub mod location;
pub mod profile;
pub mod window;

pub use forecast::{DailyRecord, ForecastTables, HourlyRecord};
pub use location::{Location, default_locations};
pub use profile::{DailyVariable, FetchProfile, HourlyVariable, Variant};
pub use window::{ForecastWindow, default_api_ceiling};
