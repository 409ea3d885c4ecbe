//! Forecast rows and the combined tables built from them

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::profile::{DailyVariable, FetchProfile, HourlyVariable};

/// One hour of forecast for one location.
///
/// Series that were not requested, or that the API reported as `null`,
/// are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub time: NaiveDateTime,
    /// Air temperature at 2 m in °C
    pub temperature: Option<f64>,
    /// Apparent ("feels like") temperature in °C
    pub apparent_temperature: Option<f64>,
    /// Precipitation volume in mm
    pub precipitation: Option<f64>,
    pub location: String,
}

impl HourlyRecord {
    /// Value of a single series
    #[must_use]
    pub fn value(&self, variable: HourlyVariable) -> Option<f64> {
        match variable {
            HourlyVariable::Temperature => self.temperature,
            HourlyVariable::ApparentTemperature => self.apparent_temperature,
            HourlyVariable::Precipitation => self.precipitation,
        }
    }

    /// True when every series the profile requests has a value
    #[must_use]
    pub fn is_complete(&self, profile: &FetchProfile) -> bool {
        profile
            .hourly
            .iter()
            .all(|variable| self.value(*variable).is_some())
    }

    /// Lower and upper envelope of temperature and apparent temperature
    #[must_use]
    pub fn temperature_envelope(&self) -> Option<(f64, f64)> {
        match (self.temperature, self.apparent_temperature) {
            (Some(actual), Some(apparent)) => Some((actual.min(apparent), actual.max(apparent))),
            _ => None,
        }
    }
}

/// One day of forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub location: String,
}

impl DailyRecord {
    #[must_use]
    pub fn value(&self, variable: DailyVariable) -> Option<f64> {
        match variable {
            DailyVariable::TemperatureMin => self.temperature_min,
            DailyVariable::TemperatureMax => self.temperature_max,
        }
    }

    #[must_use]
    pub fn is_complete(&self, profile: &FetchProfile) -> bool {
        profile
            .daily
            .iter()
            .all(|variable| self.value(*variable).is_some())
    }
}

/// Hourly and daily rows, in the order they were fetched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTables {
    pub hourly: Vec<HourlyRecord>,
    pub daily: Vec<DailyRecord>,
}

impl ForecastTables {
    /// Append another table's rows after this table's rows
    pub fn append(&mut self, mut other: ForecastTables) {
        self.hourly.append(&mut other.hourly);
        self.daily.append(&mut other.daily);
    }

    /// Hourly rows tagged with `location`
    pub fn hourly_for<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a HourlyRecord> {
        self.hourly.iter().filter(move |row| row.location == location)
    }

    /// Daily rows tagged with `location`
    pub fn daily_for<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a DailyRecord> {
        self.daily.iter().filter(move |row| row.location == location)
    }
}
