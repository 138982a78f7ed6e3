//! EPA AirNow client: current air quality observations near a point

use crate::error::AirDashError;
use crate::models::{GeoPoint, PollutantObservation};
use crate::Result;
use chrono::{NaiveDate, Utc};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://www.airnowapi.org";

/// Default search radius around the query point, in miles
pub const DEFAULT_DISTANCE_MILES: u32 = 25;

/// Client for the AirNow current-observation API
pub struct AirNowClient {
    client: Client,
    api_key: String,
    base_url: String,
    distance_miles: u32,
}

impl AirNowClient {
    /// Create a new client with the default search radius
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, DEFAULT_DISTANCE_MILES)
    }

    /// Create a client with explicit base URL and search radius
    pub fn with_options(api_key: &str, base_url: &str, distance_miles: u32) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AirDashError::config("AirNow API key is required"));
        }
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            distance_miles,
        })
    }

    /// Fetch current observations near a point, one row per pollutant
    pub fn current_observations(&self, point: &GeoPoint) -> Result<Vec<PollutantObservation>> {
        info!(
            "Fetching AirNow observations near {} (radius {} miles)",
            point.format_coordinates(),
            self.distance_miles
        );

        let url = format!("{}/aq/observation/latLong/current/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "application/json".to_string()),
                ("latitude", point.latitude.to_string()),
                ("longitude", point.longitude.to_string()),
                ("distance", self.distance_miles.to_string()),
                ("API_KEY", self.api_key.clone()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!("AirNow request failed with HTTP {}", status);
            return Err(AirDashError::upstream("AirNow", status.as_u16()));
        }

        let rows: Vec<airnow::ObservationRow> = response
            .json()
            .map_err(|e| AirDashError::parse(format!("Invalid AirNow payload: {e}")))?;

        debug!("AirNow returned {} pollutant rows", rows.len());
        Ok(rows.into_iter().map(PollutantObservation::from).collect())
    }
}

/// AirNow API response structures
mod airnow {
    use crate::models::AqiCategory;
    use serde::Deserialize;

    /// One pollutant row of a current-observation response
    #[derive(Debug, Deserialize)]
    pub struct ObservationRow {
        #[serde(rename = "DateObserved")]
        pub date_observed: String,
        #[serde(rename = "ReportingArea")]
        pub reporting_area: String,
        #[serde(rename = "StateCode")]
        pub state_code: String,
        #[serde(rename = "ParameterName")]
        pub parameter_name: String,
        #[serde(rename = "AQI")]
        pub aqi: f64,
        #[serde(rename = "Category")]
        pub category: AqiCategory,
    }
}

impl From<airnow::ObservationRow> for PollutantObservation {
    fn from(row: airnow::ObservationRow) -> Self {
        // AirNow pads the date with a trailing space; a row with an unparsable
        // date keeps today's date rather than failing
        let date = NaiveDate::parse_from_str(row.date_observed.trim(), "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive());
        Self {
            parameter: row.parameter_name,
            aqi: row.aqi,
            category: row.category.name().to_string(),
            reporting_area: row.reporting_area,
            state_code: row.state_code,
            observed_at: date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_row_with_structured_category() {
        let payload = json!({
            "DateObserved": "2024-06-01 ",
            "HourObserved": 10,
            "ReportingArea": "NW Coastal LA",
            "StateCode": "CA",
            "ParameterName": "PM2.5",
            "AQI": 33,
            "Category": {"Number": 1, "Name": "Good"}
        });

        let row: airnow::ObservationRow = serde_json::from_value(payload).unwrap();
        let obs = PollutantObservation::from(row);
        assert_eq!(obs.parameter, "PM2.5");
        assert_eq!(obs.aqi, 33.0);
        assert_eq!(obs.category, "Good");
        assert_eq!(obs.observed_at.date_naive().to_string(), "2024-06-01");
    }

    #[test]
    fn test_row_with_plain_category() {
        let payload = json!({
            "DateObserved": "2024-06-01",
            "ReportingArea": "Houston",
            "StateCode": "TX",
            "ParameterName": "O3",
            "AQI": 65,
            "Category": "Moderate"
        });

        let row: airnow::ObservationRow = serde_json::from_value(payload).unwrap();
        let obs = PollutantObservation::from(row);
        assert_eq!(obs.category, "Moderate");
    }

    #[test]
    fn test_row_with_bad_date_falls_back_to_today() {
        let payload = json!({
            "DateObserved": "not-a-date",
            "ReportingArea": "Phoenix",
            "StateCode": "AZ",
            "ParameterName": "PM10",
            "AQI": 12,
            "Category": "Good"
        });

        let row: airnow::ObservationRow = serde_json::from_value(payload).unwrap();
        let obs = PollutantObservation::from(row);
        assert_eq!(obs.observed_at.year(), Utc::now().year());
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(AirNowClient::new("").is_err());
        assert!(AirNowClient::new("  ").is_err());
        assert!(AirNowClient::new("test-key").is_ok());
    }
}
