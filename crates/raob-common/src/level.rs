//! Vertical profile samples as delivered by the upstream sounding archive.

use serde::{Deserialize, Serialize};

/// One vertical-profile sample.
///
/// Every field is optional. The upstream archive reports missing values as
/// JSON `null` and sometimes omits the key entirely; both deserialize to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Pressure (hPa)
    #[serde(rename = "pres", default)]
    pub pressure: Option<f64>,

    /// Temperature (°C)
    #[serde(rename = "tmpc", default)]
    pub temperature: Option<f64>,

    /// Dewpoint (°C)
    #[serde(rename = "dwpc", default)]
    pub dewpoint: Option<f64>,

    /// Wind direction, degrees clockwise from north (direction the wind blows from)
    #[serde(rename = "drct", default)]
    pub direction: Option<f64>,

    /// Wind speed (knots)
    #[serde(rename = "sknt", default)]
    pub speed: Option<f64>,

    /// Geopotential height (m)
    #[serde(rename = "hght", default)]
    pub height: Option<f64>,
}

impl Level {
    /// A level carrying only thermodynamic fields.
    pub fn thermo(pressure: f64, temperature: f64, dewpoint: f64) -> Self {
        Self {
            pressure: Some(pressure),
            temperature: Some(temperature),
            dewpoint: Some(dewpoint),
            ..Self::default()
        }
    }

    /// A level carrying only kinematic fields.
    pub fn wind(direction: f64, speed: f64, height: f64) -> Self {
        Self {
            direction: Some(direction),
            speed: Some(speed),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Set the wind fields on an existing level.
    pub fn with_wind(mut self, direction: f64, speed: f64, height: f64) -> Self {
        self.direction = Some(direction);
        self.speed = Some(speed);
        self.height = Some(height);
        self
    }
}

/// An ordered sequence of levels, ground first (decreasing pressure).
pub type Profile = Vec<Level>;
