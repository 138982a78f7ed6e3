//! NOAA weather.gov client: station resolution and observation normalization
//!
//! Resolving a coordinate to current conditions is a three-step lookup: point
//! metadata, the station collection it references, and that station's latest
//! observation. The first station in the returned collection is used as-is,
//! with no distance ranking, matching the documented upstream behavior.

use crate::error::{AirDashError, ResolutionStep};
use crate::models::{GeoPoint, WeatherSnapshot};
use crate::Result;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

/// Client for the weather.gov observation API
pub struct NoaaClient {
    client: Client,
    base_url: String,
}

impl NoaaClient {
    /// Create a new client
    ///
    /// The `contact` string is sent as the User-Agent on every request, as
    /// required by the weather.gov usage policy (an email address is
    /// recommended).
    pub fn new(contact: &str) -> Result<Self> {
        Self::with_base_url(contact, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default base URL
    pub fn with_base_url(contact: &str, base_url: &str) -> Result<Self> {
        if contact.trim().is_empty() {
            return Err(AirDashError::config(
                "A contact identifier (User-Agent) is required for the weather service",
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(contact)
                .map_err(|_| AirDashError::config("Contact identifier is not a valid header value"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/ld+json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the nearest reported station for a point and normalize its
    /// latest observation
    pub fn latest_snapshot(&self, point: &GeoPoint) -> Result<WeatherSnapshot> {
        info!(
            "Resolving weather station for coordinates: {}",
            point.format_coordinates()
        );

        // Step 1: point metadata carries the station collection URL
        let point_url = format!(
            "{}/points/{},{}",
            self.base_url, point.latitude, point.longitude
        );
        debug!("Point metadata request URL: {}", point_url);

        let response = self.client.get(&point_url).send()?;
        if !response.status().is_success() {
            warn!(
                "Point metadata lookup failed with HTTP {}",
                response.status()
            );
            return Err(AirDashError::resolution(ResolutionStep::PointMetadata));
        }
        let point_data: nws::PointResponse = response
            .json()
            .map_err(|e| AirDashError::parse(format!("Invalid point metadata payload: {e}")))?;

        // Step 2: station collection, first entry wins
        let stations_url = point_data.properties.observation_stations;
        debug!("Station collection request URL: {}", stations_url);

        let response = self.client.get(&stations_url).send()?;
        if !response.status().is_success() {
            warn!("Station list fetch failed with HTTP {}", response.status());
            return Err(AirDashError::resolution(ResolutionStep::StationList));
        }
        let stations: nws::StationsResponse = response
            .json()
            .map_err(|e| AirDashError::parse(format!("Invalid station list payload: {e}")))?;

        let Some(station_url) = stations.observation_stations.first() else {
            warn!("Station collection was empty for {}", point_url);
            return Err(AirDashError::resolution(ResolutionStep::StationList));
        };

        // Step 3: latest observation for that station
        let snapshot = self.fetch_latest(&format!("{station_url}/observations/latest"))?;
        info!(
            "Resolved station {} -> temperature {}",
            station_url,
            snapshot.format_temperature()
        );
        Ok(snapshot)
    }

    /// Fetch the latest observation for a known station code directly,
    /// skipping point resolution (debug probe)
    pub fn station_snapshot(&self, station_id: &str) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}/stations/{}/observations/latest",
            self.base_url,
            urlencoding::encode(station_id)
        );
        self.fetch_latest(&url)
    }

    fn fetch_latest(&self, url: &str) -> Result<WeatherSnapshot> {
        debug!("Latest observation request URL: {}", url);

        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            warn!(
                "Latest observation fetch failed with HTTP {}",
                response.status()
            );
            return Err(AirDashError::resolution(ResolutionStep::LatestObservation));
        }

        let observation: nws::ObservationResponse = response
            .json()
            .map_err(|e| AirDashError::parse(format!("Invalid observation payload: {e}")))?;

        Ok(WeatherSnapshot::from(observation.properties))
    }
}

/// weather.gov API response structures
mod nws {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct PointResponse {
        pub properties: PointProperties,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PointProperties {
        /// URL of the observation station collection for this grid point
        pub observation_stations: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StationsResponse {
        /// Station URLs in upstream ordering
        #[serde(default)]
        pub observation_stations: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ObservationResponse {
        pub properties: ObservationProperties,
    }

    /// Latest-observation fields this pipeline reads
    ///
    /// Every level is optional: an absent or null block must only null out its
    /// own snapshot field, never fail the whole extraction.
    #[derive(Debug, Deserialize, Default)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ObservationProperties {
        pub temperature: Option<Measurement>,
        pub wind_speed: Option<Measurement>,
        pub wind_direction: Option<Measurement>,
        pub relative_humidity: Option<Measurement>,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    pub struct Measurement {
        pub value: Option<f64>,
    }
}

impl From<nws::ObservationProperties> for WeatherSnapshot {
    fn from(props: nws::ObservationProperties) -> Self {
        let value_of = |m: Option<nws::Measurement>| m.and_then(|m| m.value);
        Self {
            temperature_c: value_of(props.temperature),
            wind_speed_ms: value_of(props.wind_speed),
            wind_direction_deg: value_of(props.wind_direction),
            relative_humidity_pct: value_of(props.relative_humidity),
        }
    }
}
