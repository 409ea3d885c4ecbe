//! HTTP routes served against an in-memory provider

use std::sync::Arc;

use async_trait::async_trait;
use forecast_dashboard::weather::HourlySeries;
use forecast_dashboard::{
    AppState, DashboardConfig, FetchProfile, ForecastProvider, ForecastResponse, ForecastWindow,
    Location, Result, web,
};

/// Answers every location with the same body
struct FixedProvider(ForecastResponse);

#[async_trait]
impl ForecastProvider for FixedProvider {
    async fn fetch_forecast(
        &self,
        _location: &Location,
        _window: &ForecastWindow,
        _profile: &FetchProfile,
    ) -> Result<ForecastResponse> {
        Ok(self.0.clone())
    }
}

fn two_hours() -> ForecastResponse {
    ForecastResponse {
        hourly: Some(HourlySeries {
            time: vec!["2025-04-01T00:00".into(), "2025-04-01T01:00".into()],
            temperature: Some(vec![Some(10.0), Some(11.0)]),
            apparent_temperature: Some(vec![Some(9.0), Some(9.5)]),
            precipitation: Some(vec![Some(0.0), Some(0.3)]),
        }),
        ..ForecastResponse::default()
    }
}

async fn spawn(response: ForecastResponse) -> String {
    let config = DashboardConfig {
        locations: vec![Location::new("A", 45.0, 13.0)],
        ..DashboardConfig::default()
    };
    let state = AppState::new(config, Arc::new(FixedProvider(response))).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, web::router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_page_renders_charts() {
    let base = spawn(two_hours()).await;

    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("<h1>Hourly weather forecast (up to 21 days)</h1>"));
    assert!(body.contains("<svg"));
}

#[tokio::test]
async fn test_forecast_json_lists_rows() {
    let base = spawn(two_hours()).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/api/forecast"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["tables"]["hourly"].as_array().unwrap().len(), 2);
    assert_eq!(body["profile"]["variant"], "temperature-comparison");
}

#[tokio::test]
async fn test_forecast_json_is_unavailable_without_data() {
    let base = spawn(ForecastResponse::default()).await;

    let response = reqwest::get(format!("{base}/api/forecast")).await.unwrap();
    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No weather data available.");
    assert_eq!(body["notices"][0]["level"], "warning");
}

#[tokio::test]
async fn test_unknown_variant_is_bad_request() {
    let base = spawn(two_hours()).await;

    let response = reqwest::get(format!("{base}/?variant=sideways")).await.unwrap();
    assert_eq!(response.status(), 400);
}

#[test]
fn test_window_starts_on_utc_date_regardless_of_api_timezone() {
    let mut config = DashboardConfig {
        locations: vec![Location::new("A", 45.0, 13.0)],
        ..DashboardConfig::default()
    };
    // Far east of UTC, so the local date is ahead for much of the day
    config.weather.timezone = "Pacific/Kiritimati".to_string();
    config.weather.api_ceiling_date = chrono::NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
    let state = AppState::new(config, Arc::new(FixedProvider(two_hours()))).unwrap();

    let before = chrono::Utc::now().date_naive();
    let window = state.window_for(&FetchProfile::daily_range());
    let after = chrono::Utc::now().date_naive();

    assert!(window.start_date == before || window.start_date == after);
    assert_eq!(window.days(), 17);
}
