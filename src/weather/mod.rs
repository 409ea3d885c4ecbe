//! Forecast retrieval
//!
//! The pipeline only talks to a [`ForecastProvider`]; `OpenMeteoClient` is
//! the HTTP implementation used outside of tests.

use async_trait::async_trait;

use crate::Result;
use crate::models::{FetchProfile, ForecastWindow, Location};

pub mod open_meteo;
pub mod response;

pub use open_meteo::OpenMeteoClient;
pub use response::{DailySeries, ForecastResponse, HourlySeries};

/// Fetch a forecast for one location and date window.
///
/// Implementations return the parsed body even when the API reports an
/// error in it; only transport and decoding failures are `Err`.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(
        &self,
        location: &Location,
        window: &ForecastWindow,
        profile: &FetchProfile,
    ) -> Result<ForecastResponse>;
}
