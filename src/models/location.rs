//! Geographic coordinates and the session city registry

use crate::error::AirDashError;
use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point, validating coordinate ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AirDashError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AirDashError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AirDashError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format point as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A named city the dashboard fetches data for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Display name, unique within a registry
    pub name: String,
    /// City coordinates
    pub location: GeoPoint,
}

impl City {
    /// Create a new city
    pub fn new<S: Into<String>>(name: S, latitude: f64, longitude: f64) -> Result<Self, AirDashError> {
        Ok(Self {
            name: name.into(),
            location: GeoPoint::new(latitude, longitude)?,
        })
    }
}

/// Session-scoped city registry
///
/// Seeded with a fixed default list at session start; user-entered cities are
/// appended with a uniqueness check on name. Cities are never removed, so a
/// name is a stable lookup key for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct CityRegistry {
    cities: Vec<City>,
}

/// Default city list used when no custom cities are supplied
const DEFAULT_CITIES: &[(&str, f64, f64)] = &[
    ("Los Angeles", 34.05, -118.25),
    ("New York", 40.71, -74.01),
    ("Chicago", 41.88, -87.63),
    ("Houston", 29.76, -95.36),
    ("Phoenix", 33.45, -112.07),
    ("San Francisco", 37.77, -122.42),
];

impl CityRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the default US city list
    #[must_use]
    pub fn with_defaults() -> Self {
        let cities = DEFAULT_CITIES
            .iter()
            .map(|(name, lat, lon)| City {
                name: (*name).to_string(),
                location: GeoPoint {
                    latitude: *lat,
                    longitude: *lon,
                },
            })
            .collect();
        Self { cities }
    }

    /// Append a city, rejecting duplicate names
    pub fn add(&mut self, city: City) -> Result<(), AirDashError> {
        if self.cities.iter().any(|c| c.name == city.name) {
            return Err(AirDashError::validation(format!(
                "City '{}' is already registered",
                city.name
            )));
        }
        self.cities.push(city);
        Ok(())
    }

    /// Look up a city by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }

    /// All registered cities in insertion order
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Number of registered cities
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(34.05, -118.25).is_ok());
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_format_coordinates() {
        let point = GeoPoint::new(34.05, -118.25).unwrap();
        assert_eq!(point.format_coordinates(), "34.0500, -118.2500");
    }

    #[test]
    fn test_default_registry() {
        let registry = CityRegistry::with_defaults();
        assert_eq!(registry.len(), 6);
        assert!(registry.get("Los Angeles").is_some());
        assert!(registry.get("San Francisco").is_some());
        assert!(registry.get("Boston").is_none());
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let mut registry = CityRegistry::with_defaults();
        let duplicate = City::new("Chicago", 41.88, -87.63).unwrap();
        assert!(registry.add(duplicate).is_err());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_add_custom_city() {
        let mut registry = CityRegistry::with_defaults();
        let custom = City::new("Denver", 39.74, -104.99).unwrap();
        registry.add(custom).unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.get("Denver").unwrap().location.latitude, 39.74);
    }
}
