//! Data models for the `AirDash` pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Location: geographic points, cities and the session registry
//! - `AirQuality`: AQI observations and category normalization
//! - Timeseries: historical measurements and the parameter catalog
//! - Weather: normalized station snapshots

pub mod air_quality;
pub mod location;
pub mod timeseries;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::{AqiCategory, ObservationRecord, PollutantObservation};
pub use location::{City, CityRegistry, GeoPoint};
pub use timeseries::{ParameterCatalog, TimeSeriesPoint};
pub use weather::WeatherSnapshot;
