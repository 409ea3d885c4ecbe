//! Fetch, combine and clean forecasts for every configured location.
//!
//! One run is strictly sequential: each location is fetched after the
//! previous one completes, and nothing is kept between runs.

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::models::{FetchProfile, ForecastTables, ForecastWindow, Location};
use crate::weather::ForecastProvider;
use crate::{DashboardError, Result};

/// Severity of a message shown on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A user-visible message produced during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Result of fetching a single location
#[derive(Debug, Clone, Default)]
pub struct LocationForecast {
    pub tables: ForecastTables,
    /// Set when the location contributed no rows
    pub notice: Option<Notice>,
}

/// Everything the renderer needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub profile: FetchProfile,
    pub window: ForecastWindow,
    pub locations: Vec<Location>,
    pub notices: Vec<Notice>,
    /// Cleaned rows, empty when the run halted
    pub tables: ForecastTables,
}

impl Dashboard {
    /// True when the run stopped before charts could be drawn
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }

    #[must_use]
    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Warning)
    }
}

/// Fetch one location and convert the response into tagged rows.
///
/// A response without the expected sections yields empty tables and a
/// warning naming the location and the API's reason.
#[instrument(skip(provider, location, window, profile), fields(location = %location.name))]
pub async fn fetch_location(
    provider: &dyn ForecastProvider,
    location: &Location,
    window: &ForecastWindow,
    profile: &FetchProfile,
) -> Result<LocationForecast> {
    let response = provider.fetch_forecast(location, window, profile).await?;

    let missing = response.missing_sections(profile);
    if !missing.is_empty() {
        let reason = response.reason_or_unknown();
        warn!(?missing, reason, "Forecast response lacks expected data");
        return Ok(LocationForecast {
            tables: ForecastTables::default(),
            notice: Some(Notice::warning(format!(
                "No data for {}: {}",
                location.name, reason
            ))),
        });
    }

    let tables = response.into_tables(&location.name, profile)?;
    info!(
        hourly = tables.hourly.len(),
        daily = tables.daily.len(),
        "Converted forecast into rows"
    );

    Ok(LocationForecast {
        tables,
        notice: None,
    })
}

/// Concatenate per-location tables in the order given
pub fn combine<I>(parts: I) -> ForecastTables
where
    I: IntoIterator<Item = ForecastTables>,
{
    parts
        .into_iter()
        .fold(ForecastTables::default(), |mut combined, part| {
            combined.append(part);
            combined
        })
}

/// Fail with `NoData` when a table the profile needs has no rows at all
pub fn ensure_not_empty(tables: &ForecastTables, profile: &FetchProfile) -> Result<()> {
    if tables.hourly.is_empty() || (profile.wants_daily() && tables.daily.is_empty()) {
        return Err(DashboardError::no_data());
    }
    Ok(())
}

/// Drop rows missing any field the profile requires; others are kept as-is
#[must_use]
pub fn clean(tables: ForecastTables, profile: &FetchProfile) -> ForecastTables {
    ForecastTables {
        hourly: tables
            .hourly
            .into_iter()
            .filter(|row| row.is_complete(profile))
            .collect(),
        daily: tables
            .daily
            .into_iter()
            .filter(|row| row.is_complete(profile))
            .collect(),
    }
}

/// Run the whole pipeline for `locations`.
///
/// Transport and parse failures abort the run with `Err`. Total data
/// unavailability does not: it produces a halted dashboard carrying the
/// warnings gathered so far plus the fatal error notice.
#[instrument(skip_all, fields(variant = %profile.variant, locations = locations.len(), window = %window))]
pub async fn run(
    provider: &dyn ForecastProvider,
    locations: &[Location],
    profile: &FetchProfile,
    window: ForecastWindow,
) -> Result<Dashboard> {
    if window.is_inverted() {
        warn!("Forecast window ends before it starts; the API ceiling date has passed");
    }

    let mut notices = Vec::new();
    let mut parts = Vec::with_capacity(locations.len());
    for location in locations {
        let fetched = fetch_location(provider, location, &window, profile).await?;
        notices.extend(fetched.notice);
        parts.push(fetched.tables);
    }

    let combined = combine(parts);
    if let Err(err) = ensure_not_empty(&combined, profile) {
        error!("{}", err);
        notices.push(Notice::error(err.user_message()));
        return Ok(Dashboard {
            profile: profile.clone(),
            window,
            locations: locations.to_vec(),
            notices,
            tables: ForecastTables::default(),
        });
    }

    let before = (combined.hourly.len(), combined.daily.len());
    let tables = clean(combined, profile);
    info!(
        hourly = tables.hourly.len(),
        daily = tables.daily.len(),
        dropped_hourly = before.0 - tables.hourly.len(),
        dropped_daily = before.1 - tables.daily.len(),
        "Forecast tables ready"
    );

    Ok(Dashboard {
        profile: profile.clone(),
        window,
        locations: locations.to_vec(),
        notices,
        tables,
    })
}
