//! Data models for the WeatherMap application
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: validated latitude/longitude values
//! - Place: suggestions, favorites and the active place
//! - Weather: current conditions and the daily forecast

pub mod coordinate;
pub mod forecast;
pub mod place;
pub mod weather;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use forecast::{DailyForecast, pick_daily_noon};
pub use place::{ActivePlace, FavoriteLocation, PlaceSuggestion};
pub use weather::{CurrentConditions, IconSize, icon_url, wind_direction_to_cardinal};
