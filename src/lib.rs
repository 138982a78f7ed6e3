//! `AirDash` - multi-source environmental data normalization and fallback
//!
//! This library fetches current conditions and historical measurements from
//! three heterogeneous public APIs (NOAA weather.gov, EPA AirNow, OpenAQ),
//! normalizes their payloads into unified records, and aggregates them with
//! degraded-but-usable fallback behavior when any source fails. Execution is
//! synchronous and single-attempt: there is no cache, no retry, and every
//! refresh re-fetches from scratch.

pub mod airnow;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod noaa;
pub mod openaq;

// Re-export core types for public API
pub use airnow::AirNowClient;
pub use config::{AirDashConfig, ChartMode};
pub use dashboard::{
    combined_timeseries, fallback_series, fetch_cities, AirQualityProvider, CityFetchReport,
    CombinedSeries, FetchWarning, MeasurementProvider,
};
pub use error::{AirDashError, ResolutionStep};
pub use models::{
    AqiCategory, City, CityRegistry, GeoPoint, ObservationRecord, ParameterCatalog,
    PollutantObservation, TimeSeriesPoint, WeatherSnapshot,
};
pub use noaa::NoaaClient;
pub use openaq::OpenAqClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirDashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
