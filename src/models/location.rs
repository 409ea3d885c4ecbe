//! Location model and the built-in location table

use serde::{Deserialize, Serialize};

/// A named place the dashboard fetches forecasts for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Display name, also used to tag every fetched row
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new<S: Into<String>>(name: S, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Whether latitude and longitude are within their valid ranges
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// The locations shown when the configuration does not list any
#[must_use]
pub fn default_locations() -> Vec<Location> {
    vec![
        Location::new("Tar, Kroatië", 45.3064, 13.6158),
        Location::new("Leeuwarden, Nederland", 53.2012, 5.7999),
    ]
}
