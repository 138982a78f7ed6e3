//! Integration tests for the AirDash aggregation pipeline
//!
//! These tests drive the public library API end to end with in-memory
//! providers; no network access is required.

use airdash::dashboard::{combined_timeseries, fetch_cities, FALLBACK_UNIT};
use airdash::models::{
    AqiCategory, CityRegistry, GeoPoint, ParameterCatalog, PollutantObservation, TimeSeriesPoint,
};
use airdash::{AirDashError, AirQualityProvider, MeasurementProvider};
use chrono::{Duration, Utc};
use rstest::rstest;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// Air quality provider backed by a fixed table, failing for listed cities
struct TableProvider {
    rows: Vec<PollutantObservation>,
    failing: Vec<GeoPoint>,
}

impl AirQualityProvider for TableProvider {
    fn current_observations(
        &self,
        point: &GeoPoint,
    ) -> airdash::Result<Vec<PollutantObservation>> {
        if self.failing.contains(point) {
            return Err(AirDashError::upstream("AirNow", 503));
        }
        Ok(self.rows.clone())
    }
}

/// Measurement provider that serves descending hourly points per parameter
struct SeriesProvider {
    data: HashMap<String, Vec<f64>>,
}

impl MeasurementProvider for SeriesProvider {
    fn timeseries(
        &self,
        location: &str,
        parameter: &str,
        _days: u32,
    ) -> airdash::Result<Vec<TimeSeriesPoint>> {
        let Some(values) = self.data.get(parameter) else {
            // Unknown parameter behaves like the provider's 404: empty, not an error
            return Ok(Vec::new());
        };
        let now = Utc::now();
        Ok(values
            .iter()
            .enumerate()
            .map(|(i, value)| TimeSeriesPoint {
                timestamp: now - Duration::hours(i as i64),
                value: *value,
                unit: "µg/m³".to_string(),
                parameter: parameter.to_string(),
                location_name: location.to_string(),
            })
            .collect())
    }
}

fn sample_row() -> PollutantObservation {
    PollutantObservation {
        parameter: "PM2.5".to_string(),
        aqi: 33.0,
        category: "Good".to_string(),
        reporting_area: "Test Area".to_string(),
        state_code: "CA".to_string(),
        observed_at: Utc::now(),
    }
}

fn parameter_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// One failing city out of N still yields results for the other N-1 plus a
/// warning keyed by the failed city's name
#[test]
fn test_partial_city_failure_keeps_other_results() {
    let registry = CityRegistry::with_defaults();
    let failing = registry.get("Phoenix").unwrap().location;
    let provider = TableProvider {
        rows: vec![sample_row()],
        failing: vec![failing],
    };

    let report = fetch_cities(&provider, registry.cities()).unwrap();
    assert_eq!(report.cities_succeeded, registry.len() - 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].subject, "Phoenix");

    let cities: Vec<&str> = report.records.iter().map(|r| r.city.as_str()).collect();
    assert!(cities.contains(&"Los Angeles"));
    assert!(!cities.contains(&"Phoenix"));
}

/// All cities failing surfaces an explicit no-data error, not an empty table
#[test]
fn test_total_city_failure_is_explicit() {
    let registry = CityRegistry::with_defaults();
    let provider = TableProvider {
        rows: vec![sample_row()],
        failing: registry.cities().iter().map(|c| c.location).collect(),
    };

    let result = fetch_cities(&provider, registry.cities());
    assert!(matches!(result, Err(AirDashError::NoData { .. })));
}

/// Catalog-driven fan-out unions every parameter's series and reorders the
/// provider's descending points to ascending per parameter
#[test]
fn test_catalog_driven_series_union() {
    let mut catalog = ParameterCatalog::new();
    catalog.insert("Phoenix Supersite", "pm25");
    catalog.insert("Phoenix Supersite", "o3");
    catalog.insert("Phoenix Supersite", "o3");

    let parameters = catalog.parameters_for("Phoenix Supersite").unwrap();
    assert_eq!(parameters.len(), 2);

    let provider = SeriesProvider {
        data: HashMap::from([
            ("pm25".to_string(), vec![14.0, 12.0, 11.0]),
            ("o3".to_string(), vec![30.0, 28.0]),
        ]),
    };

    let series = combined_timeseries(&provider, "Phoenix Supersite", parameters, 7).unwrap();
    assert!(!series.used_fallback);
    assert_eq!(series.points.len(), 5);

    // Grouped by parameter, each group strictly ascending in time
    let values: Vec<(&str, f64)> = series
        .points
        .iter()
        .map(|p| (p.parameter.as_str(), p.value))
        .collect();
    assert_eq!(
        values,
        vec![
            ("o3", 28.0),
            ("o3", 30.0),
            ("pm25", 11.0),
            ("pm25", 12.0),
            ("pm25", 14.0),
        ]
    );
}

/// The documented 7-day fallback literals appear when every live attempt
/// comes back empty
#[test]
fn test_seven_day_fallback_contract() {
    let provider = SeriesProvider {
        data: HashMap::new(),
    };
    let parameters = parameter_set(&["pm25", "no2", "o3"]);

    let series = combined_timeseries(&provider, "Phoenix Supersite", &parameters, 7).unwrap();
    assert!(series.used_fallback);
    assert_eq!(series.points.len(), 21);

    let values_of = |parameter: &str| -> Vec<f64> {
        series
            .points
            .iter()
            .filter(|p| p.parameter == parameter)
            .map(|p| p.value)
            .collect()
    };
    assert_eq!(values_of("pm25"), vec![12.0, 18.0, 20.0, 16.0, 15.0, 17.0, 13.0]);
    assert_eq!(values_of("no2"), vec![8.0, 9.0, 12.0, 11.0, 10.0, 9.0, 8.0]);
    assert_eq!(values_of("o3"), vec![25.0, 22.0, 24.0, 21.0, 23.0, 22.0, 20.0]);
    assert!(series.points.iter().all(|p| p.unit == FALLBACK_UNIT));
}

/// Category normalization accepts both observed upstream shapes
#[rstest]
#[case(serde_json::json!({"Number": 2, "Name": "Moderate"}), "Moderate")]
#[case(serde_json::json!({"Name": "Moderate"}), "Moderate")]
#[case(serde_json::json!("Moderate"), "Moderate")]
#[case(serde_json::json!({"Number": 1, "Name": "Good"}), "Good")]
fn test_category_normalization(#[case] payload: serde_json::Value, #[case] expected: &str) {
    let category: AqiCategory = serde_json::from_value(payload).unwrap();
    assert_eq!(category.name(), expected);
}

/// A custom city participates in the session exactly like a default one
#[test]
fn test_custom_city_round_trip() {
    let mut registry = CityRegistry::with_defaults();
    registry
        .add(airdash::City::new("Denver", 39.74, -104.99).unwrap())
        .unwrap();

    let provider = TableProvider {
        rows: vec![sample_row()],
        failing: vec![],
    };
    let report = fetch_cities(&provider, registry.cities()).unwrap();
    assert_eq!(report.cities_succeeded, 7);
    assert!(report.records.iter().any(|r| r.city == "Denver"));
}
