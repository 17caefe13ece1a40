//! Coordinate model for geographic positions

use crate::{Result, WeatherMapError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Equality is exact: two coordinates are the same place only when both
/// components compare equal bit for bit after parsing. Favorites rely on this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "lon")]
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = WeatherMapError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside [-90,90] x [-180,180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherMapError::validation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherMapError::validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse textual latitude/longitude as delivered by headers and geocoders
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| WeatherMapError::validation(format!("latitude '{latitude}' is not a number")))?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| WeatherMapError::validation(format!("longitude '{longitude}' is not a number")))?;
        Self::new(lat, lon)
    }

    /// Build a coordinate, forcing each component into range
    #[must_use]
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        let clamp = |value: f64, limit: f64| {
            if value.is_nan() { 0.0 } else { value.clamp(-limit, limit) }
        };
        Self {
            latitude: clamp(latitude, 90.0),
            longitude: clamp(longitude, 180.0),
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
