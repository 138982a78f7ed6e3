//! Air quality observation models and AQI category normalization

use crate::models::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AQI severity category as reported by AirNow
///
/// Observed schema drift across API versions: the `Category` field arrives
/// either as a structured `{"Number": 2, "Name": "Moderate"}` object or as a
/// plain `"Moderate"` string. Both shapes collapse through [`AqiCategory::name`]
/// so call sites never branch on the variant.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum AqiCategory {
    /// Structured `{Number, Name}` object
    Structured {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Number", default)]
        number: Option<i32>,
    },
    /// Plain category string
    Plain(String),
}

impl AqiCategory {
    /// Collapse either shape to the flat category name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            AqiCategory::Structured { name, .. } => name,
            AqiCategory::Plain(name) => name,
        }
    }
}

/// One pollutant row from an AirNow current-observation response
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantObservation {
    /// Pollutant identifier, e.g. "PM2.5" or "O3"
    pub parameter: String,
    /// Air Quality Index value (unitless)
    pub aqi: f64,
    /// Human-readable severity category
    pub category: String,
    /// Reporting area name for the monitoring site
    pub reporting_area: String,
    /// Two-letter state code
    pub state_code: String,
    /// Observation date (UTC midnight)
    pub observed_at: DateTime<Utc>,
}

/// A pollutant observation tagged with the city it was fetched for
///
/// Records never outlive the fetch call that produced them: there is no cache,
/// every refresh re-fetches from scratch.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ObservationRecord {
    /// Pollutant identifier
    pub parameter: String,
    /// Air Quality Index value
    pub aqi: f64,
    /// Unit label for the value column
    pub unit: String,
    /// Flattened category name
    pub category: String,
    /// City the fetch was issued for
    pub city: String,
    /// City coordinates
    pub location: GeoPoint,
    /// Observation timestamp
    pub observed_at: DateTime<Utc>,
}

impl ObservationRecord {
    /// Tag a pollutant observation with its city
    #[must_use]
    pub fn from_observation(obs: PollutantObservation, city: &str, location: GeoPoint) -> Self {
        Self {
            parameter: obs.parameter,
            aqi: obs.aqi,
            unit: "AQI".to_string(),
            category: obs.category,
            city: city.to_string(),
            location,
            observed_at: obs.observed_at,
        }
    }
}
