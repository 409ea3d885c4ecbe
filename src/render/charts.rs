//! SVG time-series charts drawn with plotters

use chrono::{Duration, NaiveDateTime, NaiveTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use plotters::series::DottedLineSeries;
use serde::Serialize;

use crate::models::{ForecastTables, Location, Variant};
use crate::pipeline::Dashboard;
use crate::{DashboardError, Result};

const CHART_SIZE: (u32, u32) = (1440, 480);
const BAND_ALPHA: f64 = 0.3;
/// Pixel distance between dots along a dotted line
const DOT_SPACING: i32 = 6;

/// A titled chart; `svg` is `None` when there was nothing to plot
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub title: String,
    pub svg: Option<String>,
}

fn render_err<E: std::fmt::Display>(e: E) -> DashboardError {
    DashboardError::render(e.to_string())
}

fn location_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

/// Axis bounds for a set of points, padded so lines do not touch the frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: NaiveDateTime,
    x_max: NaiveDateTime,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a (NaiveDateTime, f64)>,
    {
        let mut iter = points.into_iter();
        let &(t0, v0) = iter.next()?;
        let mut bounds = Self {
            x_min: t0,
            x_max: t0,
            y_min: v0,
            y_max: v0,
        };
        for &(t, v) in iter {
            bounds.x_min = bounds.x_min.min(t);
            bounds.x_max = bounds.x_max.max(t);
            bounds.y_min = bounds.y_min.min(v);
            bounds.y_max = bounds.y_max.max(v);
        }
        Some(bounds)
    }

    fn padded(mut self, floor_at_zero: bool) -> Self {
        if self.x_max <= self.x_min {
            self.x_max = self.x_min + Duration::hours(1);
        }
        let span = self.y_max - self.y_min;
        let padding = if span.abs() > 1e-6 { span * 0.1 } else { 1.0 };
        self.y_min = if floor_at_zero { 0.0 } else { self.y_min - padding };
        self.y_max += padding;
        self
    }
}

/// Per-location series used by one chart
struct LocationSeries<'a> {
    name: &'a str,
    color: RGBAColor,
    band: Vec<(NaiveDateTime, f64, f64)>,
    line: Vec<(NaiveDateTime, f64)>,
}

impl LocationSeries<'_> {
    fn is_empty(&self) -> bool {
        self.band.is_empty() && self.line.is_empty()
    }

    fn band_polygon(&self) -> Vec<(NaiveDateTime, f64)> {
        let upper = self.band.iter().map(|&(t, _, high)| (t, high));
        let lower = self.band.iter().rev().map(|&(t, low, _)| (t, low));
        upper.chain(lower).collect()
    }

    fn all_points(&self) -> Vec<(NaiveDateTime, f64)> {
        self.band
            .iter()
            .flat_map(|&(t, low, high)| [(t, low), (t, high)])
            .chain(self.line.iter().copied())
            .collect()
    }
}

#[derive(Clone, Copy)]
enum LineStyle {
    Solid,
    Dotted,
}

struct ChartSpec<'a> {
    y_desc: &'a str,
    band_label: &'a str,
    line_label: &'a str,
    line_style: LineStyle,
    floor_at_zero: bool,
}

fn draw_chart(series: &[LocationSeries<'_>], spec: &ChartSpec<'_>) -> Result<Option<String>> {
    let points: Vec<_> = series.iter().flat_map(LocationSeries::all_points).collect();
    let Some(bounds) = Bounds::from_points(&points) else {
        return Ok(None);
    };
    let bounds = bounds.padded(spec.floor_at_zero);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(
                RangedDateTime::from(bounds.x_min..bounds.x_max),
                bounds.y_min..bounds.y_max,
            )
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Date and time")
            .y_desc(spec.y_desc)
            .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%d-%m %Hh").to_string())
            .light_line_style(BLACK.mix(0.08))
            .draw()
            .map_err(render_err)?;

        for location in series.iter().filter(|s| !s.is_empty()) {
            let color = location.color;

            if !location.band.is_empty() {
                let fill = color.mix(BAND_ALPHA).filled();
                chart
                    .draw_series(std::iter::once(Polygon::new(location.band_polygon(), fill)))
                    .map_err(render_err)?
                    .label(format!("{}: {}", location.name, spec.band_label))
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 18, y + 5)], fill));
            }

            if !location.line.is_empty() {
                let stroke = color.stroke_width(2);
                let drawn = match spec.line_style {
                    LineStyle::Solid => chart
                        .draw_series(LineSeries::new(location.line.iter().copied(), stroke))
                        .map_err(render_err)?,
                    LineStyle::Dotted => chart
                        .draw_series(DottedLineSeries::new(
                            location.line.iter().copied(),
                            0,
                            DOT_SPACING,
                            move |c: (i32, i32)| Circle::new(c, 2, color.filled()),
                        ))
                        .map_err(render_err)?,
                };
                drawn
                    .label(format!("{}: {}", location.name, spec.line_label))
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], stroke));
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK.mix(0.3))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(Some(svg))
}

/// Band between actual and apparent temperature plus a solid temperature line
pub fn temperature_chart(tables: &ForecastTables, locations: &[Location]) -> Result<ChartView> {
    let series: Vec<_> = locations
        .iter()
        .enumerate()
        .map(|(i, location)| {
            let rows: Vec<_> = tables.hourly_for(&location.name).collect();
            LocationSeries {
                name: &location.name,
                color: location_color(i),
                band: rows
                    .iter()
                    .filter_map(|r| r.temperature_envelope().map(|(lo, hi)| (r.time, lo, hi)))
                    .collect(),
                line: rows
                    .iter()
                    .filter_map(|r| r.temperature.map(|t| (r.time, t)))
                    .collect(),
            }
        })
        .collect();

    let svg = draw_chart(
        &series,
        &ChartSpec {
            y_desc: "Temperature (°C)",
            band_label: "feels-like vs. actual",
            line_label: "temperature",
            line_style: LineStyle::Solid,
            floor_at_zero: false,
        },
    )?;

    Ok(ChartView {
        title: "Temperature: actual vs. apparent".to_string(),
        svg,
    })
}

/// Precipitation volume shaded from zero
pub fn precipitation_chart(tables: &ForecastTables, locations: &[Location]) -> Result<ChartView> {
    let series: Vec<_> = locations
        .iter()
        .enumerate()
        .map(|(i, location)| LocationSeries {
            name: &location.name,
            color: location_color(i),
            band: tables
                .hourly_for(&location.name)
                .filter_map(|r| r.precipitation.map(|p| (r.time, 0.0, p)))
                .collect(),
            line: Vec::new(),
        })
        .collect();

    let svg = draw_chart(
        &series,
        &ChartSpec {
            y_desc: "Precipitation (mm)",
            band_label: "precipitation",
            line_label: "",
            line_style: LineStyle::Solid,
            floor_at_zero: true,
        },
    )?;

    Ok(ChartView {
        title: "Precipitation".to_string(),
        svg,
    })
}

/// Daily min/max band with a dotted hourly apparent-temperature line
pub fn daily_range_chart(tables: &ForecastTables, locations: &[Location]) -> Result<ChartView> {
    let series: Vec<_> = locations
        .iter()
        .enumerate()
        .map(|(i, location)| LocationSeries {
            name: &location.name,
            color: location_color(i),
            band: tables
                .daily_for(&location.name)
                .filter_map(|d| match (d.temperature_min, d.temperature_max) {
                    (Some(lo), Some(hi)) => Some((d.date.and_time(NaiveTime::MIN), lo, hi)),
                    _ => None,
                })
                .collect(),
            line: tables
                .hourly_for(&location.name)
                .filter_map(|r| r.apparent_temperature.map(|t| (r.time, t)))
                .collect(),
        })
        .collect();

    let svg = draw_chart(
        &series,
        &ChartSpec {
            y_desc: "Temperature (°C)",
            band_label: "daily min–max",
            line_label: "apparent temperature (hourly)",
            line_style: LineStyle::Dotted,
            floor_at_zero: false,
        },
    )?;

    Ok(ChartView {
        title: "Daily temperature range and apparent temperature".to_string(),
        svg,
    })
}

/// All charts for the dashboard's variant
pub fn charts_for(dashboard: &Dashboard) -> Result<Vec<ChartView>> {
    let tables = &dashboard.tables;
    let locations = &dashboard.locations;
    match dashboard.profile.variant {
        Variant::TemperatureComparison => Ok(vec![
            temperature_chart(tables, locations)?,
            precipitation_chart(tables, locations)?,
        ]),
        Variant::DailyRange => Ok(vec![daily_range_chart(tables, locations)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRecord, HourlyRecord};
    use chrono::NaiveDate;

    fn hourly(location: &str, h: u32, temperature: f64, apparent: f64, rain: f64) -> HourlyRecord {
        HourlyRecord {
            time: NaiveDate::from_ymd_opt(2025, 4, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            temperature: Some(temperature),
            apparent_temperature: Some(apparent),
            precipitation: Some(rain),
            location: location.to_string(),
        }
    }

    fn locations() -> Vec<Location> {
        vec![Location::new("A", 0.0, 0.0), Location::new("B", 1.0, 1.0)]
    }

    #[test]
    fn test_temperature_chart_only_labels_locations_with_rows() {
        let tables = ForecastTables {
            hourly: (0..6).map(|h| hourly("A", h, 10.0 + f64::from(h), 8.0, 0.1)).collect(),
            daily: Vec::new(),
        };

        let chart = temperature_chart(&tables, &locations()).unwrap();
        let svg = chart.svg.expect("chart should be drawn");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("A: temperature"));
        assert!(svg.contains("A: feels-like vs. actual"));
        assert!(!svg.contains("B: temperature"));
        assert!(svg.contains("Temperature (°C)"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_empty_tables_produce_no_svg() {
        let chart = precipitation_chart(&ForecastTables::default(), &locations()).unwrap();
        assert!(chart.svg.is_none());
        assert_eq!(chart.title, "Precipitation");
    }

    #[test]
    fn test_daily_range_chart() {
        let tables = ForecastTables {
            hourly: vec![hourly("B", 0, 0.0, 3.0, 0.0), hourly("B", 1, 0.0, 2.5, 0.0)],
            daily: vec![DailyRecord {
                date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                temperature_min: Some(1.0),
                temperature_max: Some(9.0),
                location: "B".to_string(),
            }],
        };

        let chart = daily_range_chart(&tables, &locations()).unwrap();
        let svg = chart.svg.unwrap();
        assert!(svg.contains("B: daily min–max"));
        assert!(svg.contains("B: apparent temperature (hourly)"));
    }

    #[test]
    fn test_daily_range_apparent_line_is_dotted_between_points() {
        let tables = ForecastTables {
            hourly: vec![hourly("A", 0, 0.0, 3.0, 0.0), hourly("A", 1, 0.0, 5.0, 0.0)],
            daily: Vec::new(),
        };

        let svg = daily_range_chart(&tables, &locations()).unwrap().svg.unwrap();
        // Two hourly points spanning the plot give a run of dots, not two markers
        assert!(svg.matches("<circle").count() > 20);
    }

    #[test]
    fn test_bounds_padding() {
        let t = NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bounds = Bounds::from_points(&[(t, 5.0)]).unwrap().padded(false);
        assert_eq!(bounds.x_max, t + Duration::hours(1));
        assert_eq!(bounds.y_min, 4.0);
        assert_eq!(bounds.y_max, 6.0);

        let rain = Bounds::from_points(&[(t, 0.0), (t, 2.0)]).unwrap().padded(true);
        assert_eq!(rain.y_min, 0.0);
        assert!((rain.y_max - 2.2).abs() < 1e-9);
    }
}
