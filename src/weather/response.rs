//! Forecast API response structures and conversion into rows

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{DailyRecord, FetchProfile, ForecastTables, HourlyRecord};
use crate::{DashboardError, Result};

/// Body of a forecast response.
///
/// A successful answer carries `hourly` (and `daily` when requested). An
/// API-reported failure carries `error: true` and a `reason` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Time-aligned hourly arrays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub apparent_temperature: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub precipitation: Option<Vec<Option<f64>>>,
}

/// Time-aligned daily arrays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_min", default)]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_max", default)]
    pub temperature_max: Option<Vec<Option<f64>>>,
}

fn value_at(series: Option<&Vec<Option<f64>>>, index: usize) -> Option<f64> {
    series.and_then(|values| values.get(index).copied().flatten())
}

fn parse_hour(raw: &str, location: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| DashboardError::parse(format!("Invalid timestamp '{raw}' for {location}: {e}")))
}

fn parse_day(raw: &str, location: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| DashboardError::parse(format!("Invalid date '{raw}' for {location}: {e}")))
}

impl ForecastResponse {
    /// Top-level keys the profile needs but the response lacks
    #[must_use]
    pub fn missing_sections(&self, profile: &FetchProfile) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.hourly.is_none() {
            missing.push("hourly");
        }
        if profile.wants_daily() && self.daily.is_none() {
            missing.push("daily");
        }
        missing
    }

    /// The API's reason, or "unknown error" when it gave none
    #[must_use]
    pub fn reason_or_unknown(&self) -> &str {
        self.reason.as_deref().unwrap_or("unknown error")
    }

    /// Turn the response arrays into rows tagged with `location`
    pub fn into_tables(self, location: &str, profile: &FetchProfile) -> Result<ForecastTables> {
        let hourly = match &self.hourly {
            Some(series) => series.records(location)?,
            None => Vec::new(),
        };
        let daily = match (&self.daily, profile.wants_daily()) {
            (Some(series), true) => series.records(location)?,
            _ => Vec::new(),
        };
        Ok(ForecastTables { hourly, daily })
    }
}

impl HourlySeries {
    /// One row per entry of `time`; values missing at an index become `None`
    pub fn records(&self, location: &str) -> Result<Vec<HourlyRecord>> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                Ok(HourlyRecord {
                    time: parse_hour(raw, location)?,
                    temperature: value_at(self.temperature.as_ref(), i),
                    apparent_temperature: value_at(self.apparent_temperature.as_ref(), i),
                    precipitation: value_at(self.precipitation.as_ref(), i),
                    location: location.to_string(),
                })
            })
            .collect()
    }
}

impl DailySeries {
    pub fn records(&self, location: &str) -> Result<Vec<DailyRecord>> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                Ok(DailyRecord {
                    date: parse_day(raw, location)?,
                    temperature_min: value_at(self.temperature_min.as_ref(), i),
                    temperature_max: value_at(self.temperature_max.as_ref(), i),
                    location: location.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_payload_is_missing_hourly() {
        let response: ForecastResponse = serde_json::from_value(json!({
            "error": true,
            "reason": "Parameter 'start_date' is out of allowed range"
        }))
        .unwrap();

        assert_eq!(
            response.missing_sections(&FetchProfile::temperature_comparison()),
            vec!["hourly"]
        );
        assert_eq!(
            response.missing_sections(&FetchProfile::daily_range()),
            vec!["hourly", "daily"]
        );
        assert!(response.reason_or_unknown().contains("out of allowed range"));
    }

    #[test]
    fn test_reason_defaults_to_unknown() {
        let response: ForecastResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.reason_or_unknown(), "unknown error");
    }

    #[test]
    fn test_hourly_without_daily_is_incomplete_for_daily_range() {
        let response: ForecastResponse = serde_json::from_value(json!({
            "hourly": { "time": [], "apparent_temperature": [] }
        }))
        .unwrap();
        assert_eq!(
            response.missing_sections(&FetchProfile::daily_range()),
            vec!["daily"]
        );
        assert!(
            response
                .missing_sections(&FetchProfile::temperature_comparison())
                .is_empty()
        );
    }

    #[test]
    fn test_into_tables_tags_rows_and_keeps_nulls() {
        let response: ForecastResponse = serde_json::from_value(json!({
            "hourly": {
                "time": ["2025-04-01T00:00", "2025-04-01T01:00", "2025-04-01T02:00"],
                "temperature_2m": [10.5, null, 9.8],
                "apparent_temperature": [8.1, 7.9, 7.5],
                "precipitation": [0.0, 0.2]
            }
        }))
        .unwrap();

        let tables = response
            .into_tables("Leeuwarden", &FetchProfile::temperature_comparison())
            .unwrap();

        assert_eq!(tables.hourly.len(), 3);
        assert!(tables.daily.is_empty());
        assert!(tables.hourly.iter().all(|r| r.location == "Leeuwarden"));
        assert_eq!(tables.hourly[0].temperature, Some(10.5));
        assert_eq!(tables.hourly[1].temperature, None);
        // Shorter array than `time`
        assert_eq!(tables.hourly[2].precipitation, None);
        assert_eq!(
            tables.hourly[1].time.format("%Y-%m-%d %H:%M").to_string(),
            "2025-04-01 01:00"
        );
    }

    #[test]
    fn test_into_tables_daily() {
        let response: ForecastResponse = serde_json::from_value(json!({
            "hourly": { "time": ["2025-04-01T00:00"], "apparent_temperature": [3.0] },
            "daily": {
                "time": ["2025-04-01", "2025-04-02"],
                "temperature_2m_min": [2.0, 3.5],
                "temperature_2m_max": [11.0, 14.2]
            }
        }))
        .unwrap();

        let tables = response
            .into_tables("Tar", &FetchProfile::daily_range())
            .unwrap();
        assert_eq!(tables.hourly.len(), 1);
        assert_eq!(tables.daily.len(), 2);
        assert_eq!(tables.daily[1].temperature_max, Some(14.2));
        assert_eq!(tables.daily[1].location, "Tar");
    }

    #[test]
    fn test_invalid_timestamp_is_parse_error() {
        let series = HourlySeries {
            time: vec!["yesterday".to_string()],
            ..Default::default()
        };
        let err = series.records("A").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
        assert!(err.to_string().contains("yesterday"));
    }
}
