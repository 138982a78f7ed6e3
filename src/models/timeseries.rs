//! Time-series measurement model and the location/parameter catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One historical measurement from a monitoring location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    /// Measurement timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Measured value
    pub value: f64,
    /// Unit of the value, e.g. "µg/m³"
    pub unit: String,
    /// Pollutant parameter code, e.g. "pm25"
    pub parameter: String,
    /// Canonical monitoring location name
    pub location_name: String,
}

/// Mapping from monitoring location name to the pollutant parameters with
/// active sensors there
///
/// Rebuilt wholesale on every catalog fetch; there is no incremental update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterCatalog {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl ParameterCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter as available at a location, deduplicating
    pub fn insert<L, P>(&mut self, location: L, parameter: P)
    where
        L: Into<String>,
        P: Into<String>,
    {
        self.entries
            .entry(location.into())
            .or_default()
            .insert(parameter.into());
    }

    /// Parameters with live sensors at a location, if the location is known
    #[must_use]
    pub fn parameters_for(&self, location: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(location)
    }

    /// All catalogued location names in sorted order
    pub fn location_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of catalogued locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no location was catalogued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
