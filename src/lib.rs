//! `WeatherMap` - find a place, follow it on a map and read its weather
//!
//! This library provides the location resolver, debounced place search,
//! favorites persistence and the current/forecast weather readout behind
//! the map page, plus the JSON API that serves them.

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod geocoding;
pub mod i18n;
pub mod location_resolver;
pub mod models;
pub mod readout;
pub mod search;
pub mod session;
pub mod store;
pub mod weather;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export core types for public API
pub use config::WeatherMapConfig;
pub use error::WeatherMapError;
pub use favorites::{FavoritesStore, Notice};
pub use geocoding::{GeocodingClient, PlaceSearcher};
pub use i18n::{Language, TranslationKey};
pub use location_resolver::{LocationResolver, ResolvedLocation};
pub use models::{
    ActivePlace, Coordinate, CurrentConditions, DailyForecast, FavoriteLocation, PlaceSuggestion,
};
pub use readout::{PanelState, WeatherReadout};
pub use search::{PlaceSearch, SearchState};
pub use session::MapSession;
pub use store::{FjallStore, KeyValueStore, MemoryStore};
pub use weather::{WeatherClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherMapError>;
