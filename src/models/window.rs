//! Forecast date window

use std::fmt;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Last date the forecast API accepted when the dashboard was first set up
#[must_use]
pub fn default_api_ceiling() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 22).unwrap_or_default()
}

/// Inclusive range of calendar dates requested from the forecast API.
///
/// `end_date >= start_date` is not guaranteed: once today passes the API
/// ceiling the window is inverted and the API answers with an error reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ForecastWindow {
    /// `start = today`, `end = min(today + horizon_days, ceiling)`
    #[must_use]
    pub fn compute(today: NaiveDate, horizon_days: u32, ceiling: NaiveDate) -> Self {
        let horizon_end = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);

        Self {
            start_date: today,
            end_date: horizon_end.min(ceiling),
        }
    }

    /// Window starting at the current UTC date
    #[must_use]
    pub fn for_today(horizon_days: u32, ceiling: NaiveDate) -> Self {
        Self::compute(Utc::now().date_naive(), horizon_days, ceiling)
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.end_date < self.start_date
    }

    /// Number of calendar days covered, zero for an inverted window
    #[must_use]
    pub fn days(&self) -> u64 {
        if self.is_inverted() {
            0
        } else {
            self.end_date.signed_duration_since(self.start_date).num_days().unsigned_abs() + 1
        }
    }
}

impl fmt::Display for ForecastWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start_date, self.end_date)
    }
}
