//! OpenAQ v3 client: historical measurement series and the location catalog

use crate::error::AirDashError;
use crate::models::{ParameterCatalog, TimeSeriesPoint};
use crate::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://api.openaq.org/v3";

/// Maximum rows per query; locations or points beyond the cap are silently
/// excluded (no pagination)
pub const RESULT_CAP: u32 = 1000;

/// Client for the OpenAQ measurement and location APIs
pub struct OpenAqClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    country: String,
}

impl OpenAqClient {
    /// Create a new client scoped to one country for catalog queries
    ///
    /// The API key is optional: when absent the `X-API-Key` header is simply
    /// omitted rather than treated as an error.
    pub fn new(api_key: Option<String>, country: &str) -> Result<Self> {
        Self::with_base_url(api_key, country, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default base URL
    pub fn with_base_url(api_key: Option<String>, country: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_string(),
        })
    }

    /// Fetch up to [`RESULT_CAP`] measurements for a location and parameter
    /// over the trailing day window, newest first
    ///
    /// `location` must match the provider's canonical location name, not free
    /// text. A 404 response and an empty result set both yield an empty
    /// sequence; only transport and auth failures raise.
    pub fn timeseries(
        &self,
        location: &str,
        parameter: &str,
        days: u32,
    ) -> Result<Vec<TimeSeriesPoint>> {
        if days == 0 {
            return Err(AirDashError::validation(
                "Time-series window must cover at least one day",
            ));
        }

        let (date_from, date_to) = format_window(Utc::now(), days);
        info!(
            "Fetching OpenAQ series for '{}' parameter {} ({} -> {})",
            location, parameter, date_from, date_to
        );

        let url = format!("{}/measurements", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("location", location),
            ("parameter", parameter),
            ("date_from", &date_from),
            ("date_to", &date_to),
            ("limit", &RESULT_CAP.to_string()),
            ("sort", "desc"),
            ("order_by", "datetime"),
        ]);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = request.send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // Deprecated or unknown location: "no data", not an error
            debug!("OpenAQ returned 404 for '{}' - treating as empty", location);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            warn!("OpenAQ measurement request failed with HTTP {}", status);
            return Err(AirDashError::upstream("OpenAQ", status.as_u16()));
        }

        let body: openaq::MeasurementsResponse = response
            .json()
            .map_err(|e| AirDashError::parse(format!("Invalid OpenAQ measurement payload: {e}")))?;

        let points: Vec<TimeSeriesPoint> = body
            .results
            .into_iter()
            .filter_map(|row| match DateTime::parse_from_rfc3339(&row.date.utc) {
                Ok(timestamp) => Some(TimeSeriesPoint {
                    timestamp: timestamp.with_timezone(&Utc),
                    value: row.value,
                    unit: row.unit,
                    parameter: parameter.to_string(),
                    location_name: location.to_string(),
                }),
                Err(e) => {
                    warn!("Skipping measurement with bad timestamp '{}': {}", row.date.utc, e);
                    None
                }
            })
            .collect();

        debug!("OpenAQ returned {} usable points", points.len());
        Ok(points)
    }

    /// Build the location/parameter catalog for the configured country
    ///
    /// Fetches one capped page of locations and collects each location's
    /// sensor parameter names into a deduplicated set.
    pub fn location_catalog(&self) -> Result<ParameterCatalog> {
        info!(
            "Building OpenAQ location catalog for country {}",
            self.country
        );

        let url = format!("{}/locations", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("country", self.country.as_str()),
            ("limit", &RESULT_CAP.to_string()),
        ]);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            warn!("OpenAQ location request failed with HTTP {}", status);
            return Err(AirDashError::upstream("OpenAQ", status.as_u16()));
        }

        let body: openaq::LocationsResponse = response
            .json()
            .map_err(|e| AirDashError::parse(format!("Invalid OpenAQ location payload: {e}")))?;

        let catalog = build_catalog(body);
        info!("Catalogued {} monitoring locations", catalog.len());
        Ok(catalog)
    }
}

/// Compute the `[now - days, now]` query window in the wire format
fn format_window(end: DateTime<Utc>, days: u32) -> (String, String) {
    let start = end - ChronoDuration::days(i64::from(days));
    let fmt = "%Y-%m-%dT%H:%M:%SZ";
    (start.format(fmt).to_string(), end.format(fmt).to_string())
}

fn build_catalog(body: openaq::LocationsResponse) -> ParameterCatalog {
    let mut catalog = ParameterCatalog::new();
    for location in body.results {
        let Some(name) = location.name else {
            continue;
        };
        for sensor in location.sensors {
            catalog.insert(name.clone(), sensor.parameter.name);
        }
    }
    catalog
}

/// OpenAQ v3 API response structures
mod openaq {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct MeasurementsResponse {
        #[serde(default)]
        pub results: Vec<MeasurementRow>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MeasurementRow {
        pub date: MeasurementDate,
        pub value: f64,
        pub unit: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct MeasurementDate {
        pub utc: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct LocationsResponse {
        #[serde(default)]
        pub results: Vec<LocationRow>,
    }

    #[derive(Debug, Deserialize)]
    pub struct LocationRow {
        pub name: Option<String>,
        #[serde(default)]
        pub sensors: Vec<Sensor>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Sensor {
        pub parameter: SensorParameter,
    }

    #[derive(Debug, Deserialize)]
    pub struct SensorParameter {
        pub name: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_window_trailing_z() {
        let end = DateTime::parse_from_rfc3339("2024-06-08T12:30:00+00:00")
            .unwrap()
            .with_timezone(&Utc);
        let (from, to) = format_window(end, 7);
        assert_eq!(from, "2024-06-01T12:30:00Z");
        assert_eq!(to, "2024-06-08T12:30:00Z");
    }

    #[test]
    fn test_measurement_parse() {
        let payload = json!({
            "results": [
                {"date": {"utc": "2024-06-07T23:00:00+00:00", "local": "2024-06-07T16:00:00-07:00"},
                 "value": 12.4, "unit": "µg/m³"},
                {"date": {"utc": "2024-06-07T22:00:00Z"}, "value": 11.9, "unit": "µg/m³"}
            ]
        });
        let body: openaq::MeasurementsResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[0].value, 12.4);
        assert_eq!(body.results[1].date.utc, "2024-06-07T22:00:00Z");
    }

    #[test]
    fn test_measurement_parse_empty_results() {
        let body: openaq::MeasurementsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.results.is_empty());
    }

    #[test]
    fn test_catalog_build_deduplicates() {
        let payload = json!({
            "results": [
                {"name": "A", "sensors": [
                    {"parameter": {"name": "pm25"}},
                    {"parameter": {"name": "pm25"}}
                ]}
            ]
        });
        let body: openaq::LocationsResponse = serde_json::from_value(payload).unwrap();
        let catalog = build_catalog(body);
        let parameters = catalog.parameters_for("A").unwrap();
        assert_eq!(parameters.len(), 1);
        assert!(parameters.contains("pm25"));
    }

    #[test]
    fn test_catalog_build_skips_unnamed_locations() {
        let payload = json!({
            "results": [
                {"name": null, "sensors": [{"parameter": {"name": "pm25"}}]},
                {"name": "B", "sensors": [{"parameter": {"name": "no2"}}]}
            ]
        });
        let body: openaq::LocationsResponse = serde_json::from_value(payload).unwrap();
        let catalog = build_catalog(body);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.parameters_for("B").is_some());
    }

    #[test]
    fn test_zero_day_window_rejected() {
        let client = OpenAqClient::new(None, "US").unwrap();
        assert!(client.timeseries("Phoenix Supersite", "pm25", 0).is_err());
    }

    #[test]
    fn test_blank_api_key_treated_as_absent() {
        let client = OpenAqClient::new(Some("  ".to_string()), "US").unwrap();
        assert!(client.api_key.is_none());
    }
}
