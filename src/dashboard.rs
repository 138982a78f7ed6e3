//! Fallback/aggregation layer: per-city fetches, combined time series and
//! deterministic fallback substitution
//!
//! Fetches run sequentially, one attempt per call. Per-item failures (one
//! city, one parameter) are isolated and recorded as warnings; only total
//! failure of a whole stage is surfaced; an exhausted time-series fetch is
//! replaced by the documented fallback table so rendering never receives an
//! empty series.

use crate::airnow::AirNowClient;
use crate::models::{City, GeoPoint, ObservationRecord, PollutantObservation, TimeSeriesPoint};
use crate::openaq::OpenAqClient;
use crate::{AirDashError, Result};
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Source of current per-pollutant observations near a point
pub trait AirQualityProvider {
    /// Fetch current observations near a point, one row per pollutant
    fn current_observations(&self, point: &GeoPoint) -> Result<Vec<PollutantObservation>>;
}

impl AirQualityProvider for AirNowClient {
    fn current_observations(&self, point: &GeoPoint) -> Result<Vec<PollutantObservation>> {
        AirNowClient::current_observations(self, point)
    }
}

/// Source of historical measurements for a named location
pub trait MeasurementProvider {
    /// Fetch the trailing-window series for one location and parameter
    fn timeseries(&self, location: &str, parameter: &str, days: u32)
        -> Result<Vec<TimeSeriesPoint>>;
}

impl MeasurementProvider for OpenAqClient {
    fn timeseries(
        &self,
        location: &str,
        parameter: &str,
        days: u32,
    ) -> Result<Vec<TimeSeriesPoint>> {
        OpenAqClient::timeseries(self, location, parameter, days)
    }
}

/// A per-item failure recorded during aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct FetchWarning {
    /// City or parameter the failed fetch was issued for
    pub subject: String,
    /// Failure description
    pub message: String,
}

/// Result of the per-city aggregation stage
#[derive(Debug, Default)]
pub struct CityFetchReport {
    /// Combined observation table across all cities that succeeded
    pub records: Vec<ObservationRecord>,
    /// One warning per failed city, keyed by city name
    pub warnings: Vec<FetchWarning>,
    /// Number of cities whose fetch succeeded
    pub cities_succeeded: usize,
}

/// Combined multi-parameter time series for one location
#[derive(Debug, Default)]
pub struct CombinedSeries {
    /// Points grouped by parameter, each group ordered oldest to newest
    pub points: Vec<TimeSeriesPoint>,
    /// One warning per parameter whose fetch failed
    pub skipped: Vec<FetchWarning>,
    /// Whether the fallback table substituted for live data
    pub used_fallback: bool,
}

/// Fetch current observations for every city, isolating per-city failures
///
/// One city failing records a warning and does not block the others; partial
/// results are acceptable. Zero successful cities is an explicit no-data
/// error, never a silent empty table.
pub fn fetch_cities<P: AirQualityProvider>(provider: &P, cities: &[City]) -> Result<CityFetchReport> {
    if cities.is_empty() {
        return Err(AirDashError::validation("No cities selected"));
    }

    let mut report = CityFetchReport::default();
    for city in cities {
        match provider.current_observations(&city.location) {
            Ok(observations) => {
                info!(
                    "Fetched {} observations for {}",
                    observations.len(),
                    city.name
                );
                report.records.extend(observations.into_iter().map(|obs| {
                    ObservationRecord::from_observation(obs, &city.name, city.location)
                }));
                report.cities_succeeded += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", city.name, e);
                report.warnings.push(FetchWarning {
                    subject: city.name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if report.cities_succeeded == 0 {
        return Err(AirDashError::no_data(format!(
            "All {} city fetches failed",
            cities.len()
        )));
    }
    Ok(report)
}

/// Fetch the time series for every parameter available at a location and
/// union the results
///
/// Parameters that error are skipped with a warning, not failed. If no live
/// point survives, whether every attempt failed or came back empty, the
/// deterministic fallback series for the same parameter set is substituted.
/// Output is grouped by parameter and ordered by timestamp ascending, ready
/// for charting.
pub fn combined_timeseries<M: MeasurementProvider>(
    provider: &M,
    location: &str,
    parameters: &BTreeSet<String>,
    days: u32,
) -> Result<CombinedSeries> {
    if days == 0 {
        return Err(AirDashError::validation(
            "Time-series window must cover at least one day",
        ));
    }
    if parameters.is_empty() {
        return Err(AirDashError::validation(format!(
            "No parameters catalogued for location '{location}'"
        )));
    }

    let mut series = CombinedSeries::default();
    for parameter in parameters {
        match provider.timeseries(location, parameter, days) {
            Ok(points) => {
                info!(
                    "Fetched {} points for {} at '{}'",
                    points.len(),
                    parameter,
                    location
                );
                series.points.extend(points);
            }
            Err(e) => {
                warn!("Skipping parameter {}: {}", parameter, e);
                series.skipped.push(FetchWarning {
                    subject: parameter.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if series.points.is_empty() {
        warn!(
            "No live data for '{}' across {} parameters - substituting fallback series",
            location,
            parameters.len()
        );
        series.points = fallback_series(location, parameters, days);
        series.used_fallback = true;
    }

    // Providers return newest-first; charts want per-parameter ascending
    series
        .points
        .sort_by(|a, b| (&a.parameter, a.timestamp).cmp(&(&b.parameter, b.timestamp)));
    Ok(series)
}

/// Unit attached to every fallback point
pub const FALLBACK_UNIT: &str = "µg/m³";

/// Fixed daily value profiles substituted when every live attempt fails.
/// The values are part of the contract; day counts other than seven cycle
/// through the profile.
const FALLBACK_PROFILES: &[(&str, [f64; 7])] = &[
    ("pm25", [12.0, 18.0, 20.0, 16.0, 15.0, 17.0, 13.0]),
    ("no2", [8.0, 9.0, 12.0, 11.0, 10.0, 9.0, 8.0]),
    ("o3", [25.0, 22.0, 24.0, 21.0, 23.0, 22.0, 20.0]),
];

fn fallback_profile(parameter: &str) -> &'static [f64; 7] {
    FALLBACK_PROFILES
        .iter()
        .find(|(name, _)| *name == parameter)
        .map_or(&FALLBACK_PROFILES[0].1, |(_, profile)| profile)
}

/// Synthesize the deterministic multi-parameter fallback series
///
/// One point per day per parameter, oldest to newest, tagged with the
/// requested parameter set. Parameters without a documented profile reuse the
/// pm25 profile.
#[must_use]
pub fn fallback_series(
    location: &str,
    parameters: &BTreeSet<String>,
    days: u32,
) -> Vec<TimeSeriesPoint> {
    let end = Utc::now();
    let mut points = Vec::with_capacity(parameters.len() * days as usize);
    for parameter in parameters {
        let profile = fallback_profile(parameter);
        for i in 0..days {
            let age_days = i64::from(days - 1 - i);
            points.push(TimeSeriesPoint {
                timestamp: end - ChronoDuration::days(age_days),
                value: profile[(i % 7) as usize],
                unit: FALLBACK_UNIT.to_string(),
                parameter: parameter.clone(),
                location_name: location.to_string(),
            });
        }
    }
    points
}
