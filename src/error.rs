//! Error types and handling for the forecast dashboard

use thiserror::Error;

/// Main error type for the forecast dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport failures talking to the forecast API
    #[error("API error: {message}")]
    Api { message: String },

    /// Response bodies or values that could not be interpreted
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Every location came back empty
    #[error("{message}")]
    NoData { message: String },

    /// Chart or page rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DashboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// The fatal "nothing to show" error
    #[must_use]
    pub fn no_data() -> Self {
        Self::NoData {
            message: "No weather data available.".to_string(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            DashboardError::Api { .. } => {
                "Unable to reach the forecast service. Please check your internet connection."
                    .to_string()
            }
            DashboardError::Parse { .. } => {
                "The forecast service returned data that could not be read.".to_string()
            }
            DashboardError::NoData { message } => message.clone(),
            DashboardError::Render { .. } => "The charts could not be drawn.".to_string(),
            DashboardError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
