//! Error types and handling for the `AirDash` pipeline

use thiserror::Error;

/// Step of the NOAA station resolution that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    /// `GET /points/{lat},{lon}` point metadata lookup
    PointMetadata,
    /// Fetch of the observation station collection
    StationList,
    /// Fetch of the station's latest observation
    LatestObservation,
}

impl std::fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolutionStep::PointMetadata => "point metadata",
            ResolutionStep::StationList => "station list",
            ResolutionStep::LatestObservation => "latest observation",
        };
        f.write_str(name)
    }
}

/// Main error type for the `AirDash` pipeline
#[derive(Error, Debug)]
pub enum AirDashError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream API returned a non-success HTTP status
    #[error("{source_name} API error: HTTP {status}")]
    Upstream { source_name: String, status: u16 },

    /// Weather station resolution failed at a specific step
    #[error("Station resolution failed at {step} step")]
    Resolution { step: ResolutionStep },

    /// Response payload could not be parsed
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Every source attempt in a fetch stage failed
    #[error("No data: {message}")]
    NoData { message: String },

    /// Transport-level request failure
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirDashError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream status error
    pub fn upstream<S: Into<String>>(source_name: S, status: u16) -> Self {
        Self::Upstream {
            source_name: source_name.into(),
            status,
        }
    }

    /// Create a new resolution error for the given step
    #[must_use]
    pub fn resolution(step: ResolutionStep) -> Self {
        Self::Resolution { step }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new no-data error
    pub fn no_data<S: Into<String>>(message: S) -> Self {
        Self::NoData {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirDashError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            AirDashError::Upstream {
                source_name,
                status,
            } => match status {
                401 | 403 => format!(
                    "{source_name} rejected the request (HTTP {status}). Please check your API key."
                ),
                429 => format!("{source_name} rate limit exceeded (HTTP 429)."),
                _ => format!("{source_name} is unavailable (HTTP {status})."),
            },
            AirDashError::Resolution { step } => {
                format!("Weather unavailable: could not resolve {step}.")
            }
            AirDashError::Parse { message } => {
                format!("Received malformed data: {message}")
            }
            AirDashError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AirDashError::NoData { message } => message.clone(),
            AirDashError::Http { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            AirDashError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
