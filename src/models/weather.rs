//! Weather readout models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at a coordinate, in metric units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: u16,
    /// Visibility in metres
    pub visibility: u32,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Short human-readable description, e.g. "scattered clouds"
    pub description: String,
    /// Condition group, e.g. "Clouds"
    pub condition: String,
    /// Provider icon code, e.g. "03d"
    pub icon: String,
    /// Place name as reported by the weather provider
    pub place_name: String,
}

/// Icon resolutions offered by the icon host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// `@2x`, used by forecast cards
    Medium,
    /// `@4x`, used by the current conditions panel
    Large,
}

impl IconSize {
    fn suffix(self) -> &'static str {
        match self {
            IconSize::Medium => "2x",
            IconSize::Large => "4x",
        }
    }
}

/// Build the image URL for a provider icon code
#[must_use]
pub fn icon_url(icon_base_url: &str, icon: &str, size: IconSize) -> String {
    format!(
        "{}/img/wn/{}@{}.png",
        icon_base_url.trim_end_matches('/'),
        icon,
        size.suffix()
    )
}

/// 16-point compass name for a wind direction in degrees
#[must_use]
pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
    const DIRECTIONS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = (f64::from(degrees) / 22.5).round() as usize % DIRECTIONS.len();
    DIRECTIONS[index]
}

impl CurrentConditions {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature.round() as i64)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!(
            "{} m/s {}",
            self.wind_speed,
            wind_direction_to_cardinal(self.wind_direction)
        )
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{} hPa", self.pressure)
    }

    /// Visibility in kilometres
    #[must_use]
    pub fn visibility_km(&self) -> f64 {
        f64::from(self.visibility) / 1000.0
    }
}
