//! Open-Meteo forecast client
//!
//! One GET per call, no retries and no client-side timeout. The API
//! answers invalid requests with HTTP 400 and a JSON body carrying
//! `reason`, so the body is decoded regardless of status and handed back
//! to the caller.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use super::{ForecastProvider, ForecastResponse};
use crate::config::WeatherConfig;
use crate::models::{FetchProfile, ForecastWindow, Location};
use crate::{DashboardError, Result};

/// HTTP client for the Open-Meteo `/forecast` endpoint
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    /// Create a new client from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("forecast-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    /// Full URL of the forecast endpoint
    #[must_use]
    pub fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    /// Query parameters for one location and window
    #[must_use]
    pub fn query_params(
        &self,
        location: &Location,
        window: &ForecastWindow,
        profile: &FetchProfile,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("hourly", profile.hourly_query()),
        ];
        if let Some(daily) = profile.daily_query() {
            params.push(("daily", daily));
        }
        params.push(("start_date", window.start_date.format("%Y-%m-%d").to_string()));
        params.push(("end_date", window.end_date.format("%Y-%m-%d").to_string()));
        params.push(("timezone", self.timezone.clone()));
        params
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self, location, window, profile), fields(location = %location.name, window = %window))]
    async fn fetch_forecast(
        &self,
        location: &Location,
        window: &ForecastWindow,
        profile: &FetchProfile,
    ) -> Result<ForecastResponse> {
        let url = self.forecast_url();
        let params = self.query_params(location, window, profile);
        debug!(url = %url, ?params, "Requesting forecast");

        let start_time = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("Forecast request failed: {}", e);
                DashboardError::api(format!("Forecast request for {} failed: {e}", location.name))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DashboardError::api(format!(
                "Failed to read forecast response for {}: {e}",
                location.name
            ))
        })?;

        let forecast: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            error!(%status, "Forecast response is not valid JSON: {}", e);
            DashboardError::parse(format!(
                "Invalid forecast data received for {} (HTTP {status}): {e}",
                location.name
            ))
        })?;

        let elapsed = start_time.elapsed();
        if status.is_success() {
            info!(
                "Retrieved forecast with {} hourly and {} daily points in {:.3}s",
                forecast.hourly.as_ref().map_or(0, |h| h.time.len()),
                forecast.daily.as_ref().map_or(0, |d| d.time.len()),
                elapsed.as_secs_f64()
            );
        } else {
            warn!(
                %status,
                reason = forecast.reason_or_unknown(),
                "Forecast API reported an error"
            );
        }

        if elapsed.as_secs() > 5 {
            warn!("Slow forecast API response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn client() -> OpenMeteoClient {
        OpenMeteoClient::new(&WeatherConfig::default()).unwrap()
    }

    fn window() -> ForecastWindow {
        ForecastWindow::compute(
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            21,
            NaiveDate::from_ymd_opt(2025, 4, 22).unwrap(),
        )
    }

    #[test]
    fn test_forecast_url() {
        assert_eq!(
            client().forecast_url(),
            "https://api.open-meteo.com/v1/forecast"
        );
    }

    #[test]
    fn test_query_params_temperature_comparison() {
        let location = Location::new("Tar, Kroatië", 45.3064, 13.6158);
        let params = client().query_params(
            &location,
            &window(),
            &FetchProfile::temperature_comparison(),
        );

        assert_eq!(
            params,
            vec![
                ("latitude", "45.3064".to_string()),
                ("longitude", "13.6158".to_string()),
                (
                    "hourly",
                    "temperature_2m,apparent_temperature,precipitation".to_string()
                ),
                ("start_date", "2025-04-01".to_string()),
                ("end_date", "2025-04-22".to_string()),
                ("timezone", "Europe/Berlin".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_daily_range_includes_daily() {
        let location = Location::new("Leeuwarden", 53.2012, 5.7999);
        let params = client().query_params(&location, &window(), &FetchProfile::daily_range());

        assert!(params.contains(&("hourly", "apparent_temperature".to_string())));
        assert!(params.contains(&(
            "daily",
            "temperature_2m_min,temperature_2m_max".to_string()
        )));
    }
}
