//! Normalized weather snapshot model

use serde::{Deserialize, Serialize};

/// Latest observed conditions at a weather station
///
/// Every field is independently nullable: the upstream observation payload may
/// omit or null out any of them, and a missing field never fails the snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius
    pub temperature_c: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed_ms: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction_deg: Option<f64>,
    /// Relative humidity in percent
    pub relative_humidity_pct: Option<f64>,
}

impl WeatherSnapshot {
    /// Whether no field carried a value at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none()
            && self.wind_speed_ms.is_none()
            && self.wind_direction_deg.is_none()
            && self.relative_humidity_pct.is_none()
    }

    /// Format temperature with unit, or a placeholder when absent
    #[must_use]
    pub fn format_temperature(&self) -> String {
        match self.temperature_c {
            Some(t) => format!("{t:.1}°C"),
            None => "n/a".to_string(),
        }
    }

    /// Format wind speed and direction
    #[must_use]
    pub fn format_wind(&self) -> String {
        match (self.wind_speed_ms, self.wind_direction_deg) {
            (Some(speed), Some(dir)) => format!("{speed:.1} m/s @ {dir:.0}°"),
            (Some(speed), None) => format!("{speed:.1} m/s"),
            _ => "n/a".to_string(),
        }
    }
}
