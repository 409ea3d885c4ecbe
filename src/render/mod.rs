//! HTML page rendering
//!
//! The page is a single tera template with the charts inlined as SVG and
//! the cleaned tables in collapsible `<details>` panels.

pub mod charts;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::models::{
    DailyRecord, DailyVariable, FetchProfile, HourlyRecord, HourlyVariable, Variant,
};
use crate::pipeline::Dashboard;
use crate::{DashboardError, Result};

pub use charts::{ChartView, charts_for};

const PAGE_TEMPLATE: &str = "dashboard.html";

/// A table shown in a collapsible panel
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

/// One column per variable the profile fetches, framed by time and location
fn hourly_table(title: &str, rows: &[HourlyRecord], profile: &FetchProfile) -> TableView {
    let headers: Vec<&'static str> = std::iter::once("time")
        .chain(profile.hourly.iter().map(HourlyVariable::api_name))
        .chain(std::iter::once("location"))
        .collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            std::iter::once(r.time.format("%Y-%m-%d %H:%M").to_string())
                .chain(profile.hourly.iter().map(|v| format_value(r.value(*v))))
                .chain(std::iter::once(r.location.clone()))
                .collect()
        })
        .collect();
    TableView {
        title: title.to_string(),
        headers,
        rows,
    }
}

fn daily_table(rows: &[DailyRecord], profile: &FetchProfile) -> TableView {
    let headers: Vec<&'static str> = std::iter::once("date")
        .chain(profile.daily.iter().map(DailyVariable::api_name))
        .chain(std::iter::once("location"))
        .collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            std::iter::once(r.date.format("%Y-%m-%d").to_string())
                .chain(profile.daily.iter().map(|v| format_value(r.value(*v))))
                .chain(std::iter::once(r.location.clone()))
                .collect()
        })
        .collect();
    TableView {
        title: "Daily data".to_string(),
        headers,
        rows,
    }
}

/// Tables shown under the charts for the dashboard's variant
#[must_use]
pub fn tables_for(dashboard: &Dashboard) -> Vec<TableView> {
    let tables = &dashboard.tables;
    let profile = &dashboard.profile;
    match profile.variant {
        Variant::TemperatureComparison => {
            vec![hourly_table("Raw data", &tables.hourly, profile)]
        }
        Variant::DailyRange => vec![
            daily_table(&tables.daily, profile),
            hourly_table("Hourly data", &tables.hourly, profile),
        ],
    }
}

/// Renders dashboards into complete HTML pages
#[derive(Debug, Clone)]
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_template(PAGE_TEMPLATE, include_str!("../../templates/dashboard.html"))
            .map_err(|e| DashboardError::render(format!("Failed to compile page template: {e}")))?;
        Ok(Self { tera })
    }

    /// Render the page. Charts are only drawn when the run was not halted.
    pub fn render(&self, dashboard: &Dashboard, title: &str) -> Result<String> {
        let halted = dashboard.is_halted();
        let (charts, tables) = if halted {
            (Vec::new(), Vec::new())
        } else {
            (charts_for(dashboard)?, tables_for(dashboard))
        };
        debug!(halted, charts = charts.len(), "Rendering dashboard page");

        let mut context = Context::new();
        context.insert("title", title);
        context.insert("window", &dashboard.window.to_string());
        context.insert("inverted", &dashboard.window.is_inverted());
        context.insert("days", &dashboard.window.days());
        context.insert("notices", &dashboard.notices);
        context.insert("halted", &halted);
        context.insert("charts", &charts);
        context.insert("tables", &tables);

        self.tera
            .render(PAGE_TEMPLATE, &context)
            .map_err(|e| DashboardError::render(format!("Failed to render page: {e}")))
    }
}
