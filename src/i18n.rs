//! Two-locale UI string table
//!
//! Every user-facing string is a [`TranslationKey`]. Lookups are exhaustive
//! matches, so adding a key without both translations does not compile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WeatherMapError;

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    /// The other language; the UI switch flips between the two
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::En,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = WeatherMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(WeatherMapError::validation(format!(
                "unsupported language '{other}'"
            ))),
        }
    }
}

/// Keys for every string the UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    PageTitle,
    SearchPlaceholder,
    SearchButton,
    Searching,
    AddToFavorites,
    FavoritesTitle,
    NoFavorites,
    AddedToFavorites,
    AlreadyInFavorites,
    RemovedFromFavorites,
    YourPlace,
    WeatherLoadFailed,
    ForecastLoadFailed,
    FiveDayForecast,
    High,
    Low,
    Humidity,
    Wind,
    Pressure,
    Visibility,
    Sunrise,
    Sunset,
}

impl TranslationKey {
    pub const ALL: [TranslationKey; 22] = [
        TranslationKey::PageTitle,
        TranslationKey::SearchPlaceholder,
        TranslationKey::SearchButton,
        TranslationKey::Searching,
        TranslationKey::AddToFavorites,
        TranslationKey::FavoritesTitle,
        TranslationKey::NoFavorites,
        TranslationKey::AddedToFavorites,
        TranslationKey::AlreadyInFavorites,
        TranslationKey::RemovedFromFavorites,
        TranslationKey::YourPlace,
        TranslationKey::WeatherLoadFailed,
        TranslationKey::ForecastLoadFailed,
        TranslationKey::FiveDayForecast,
        TranslationKey::High,
        TranslationKey::Low,
        TranslationKey::Humidity,
        TranslationKey::Wind,
        TranslationKey::Pressure,
        TranslationKey::Visibility,
        TranslationKey::Sunrise,
        TranslationKey::Sunset,
    ];

    /// Stable dotted identifier, used by the JSON translation endpoint
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            TranslationKey::PageTitle => "page.title",
            TranslationKey::SearchPlaceholder => "search.placeholder",
            TranslationKey::SearchButton => "search.button",
            TranslationKey::Searching => "search.searching",
            TranslationKey::AddToFavorites => "favorites.add",
            TranslationKey::FavoritesTitle => "favorites.title",
            TranslationKey::NoFavorites => "favorites.empty",
            TranslationKey::AddedToFavorites => "favorites.added",
            TranslationKey::AlreadyInFavorites => "favorites.duplicate",
            TranslationKey::RemovedFromFavorites => "favorites.removed",
            TranslationKey::YourPlace => "location.yourPlace",
            TranslationKey::WeatherLoadFailed => "weather.error",
            TranslationKey::ForecastLoadFailed => "forecast.error",
            TranslationKey::FiveDayForecast => "forecast.title",
            TranslationKey::High => "weather.high",
            TranslationKey::Low => "weather.low",
            TranslationKey::Humidity => "weather.humidity",
            TranslationKey::Wind => "weather.wind",
            TranslationKey::Pressure => "weather.pressure",
            TranslationKey::Visibility => "weather.visibility",
            TranslationKey::Sunrise => "weather.sunrise",
            TranslationKey::Sunset => "weather.sunset",
        }
    }
}

/// Look a key up in the table of `language`
#[must_use]
pub fn translate(language: Language, key: TranslationKey) -> &'static str {
    match language {
        Language::En => english(key),
        Language::Es => spanish(key),
    }
}

fn english(key: TranslationKey) -> &'static str {
    match key {
        TranslationKey::PageTitle => "Weather Location Search",
        TranslationKey::SearchPlaceholder => "Search location...",
        TranslationKey::SearchButton => "Search",
        TranslationKey::Searching => "Searching...",
        TranslationKey::AddToFavorites => "Add to favorites",
        TranslationKey::FavoritesTitle => "Favorite Locations",
        TranslationKey::NoFavorites => "No favorite locations yet",
        TranslationKey::AddedToFavorites => "Location added to favorites",
        TranslationKey::AlreadyInFavorites => "Location is already in favorites",
        TranslationKey::RemovedFromFavorites => "Location removed from favorites",
        TranslationKey::YourPlace => "Your Place",
        TranslationKey::WeatherLoadFailed => "Failed to load weather data",
        TranslationKey::ForecastLoadFailed => "Failed to load forecast data",
        TranslationKey::FiveDayForecast => "5-Day Forecast",
        TranslationKey::High => "High",
        TranslationKey::Low => "Low",
        TranslationKey::Humidity => "Humidity",
        TranslationKey::Wind => "Wind",
        TranslationKey::Pressure => "Pressure",
        TranslationKey::Visibility => "Visibility",
        TranslationKey::Sunrise => "Sunrise",
        TranslationKey::Sunset => "Sunset",
    }
}

fn spanish(key: TranslationKey) -> &'static str {
    match key {
        TranslationKey::PageTitle => "Búsqueda de ubicación meteorológica",
        TranslationKey::SearchPlaceholder => "Buscar ubicación...",
        TranslationKey::SearchButton => "Buscar",
        TranslationKey::Searching => "Buscando...",
        TranslationKey::AddToFavorites => "Agregar a favoritos",
        TranslationKey::FavoritesTitle => "Ubicaciones favoritas",
        TranslationKey::NoFavorites => "Aún no hay ubicaciones favoritas",
        TranslationKey::AddedToFavorites => "Ubicación agregada a favoritos",
        TranslationKey::AlreadyInFavorites => "La ubicación ya está en favoritos",
        TranslationKey::RemovedFromFavorites => "Ubicación eliminada de favoritos",
        TranslationKey::YourPlace => "Tu ubicación",
        TranslationKey::WeatherLoadFailed => "No se pudieron cargar los datos del clima",
        TranslationKey::ForecastLoadFailed => "No se pudo cargar el pronóstico",
        TranslationKey::FiveDayForecast => "Pronóstico de 5 días",
        TranslationKey::High => "Máxima",
        TranslationKey::Low => "Mínima",
        TranslationKey::Humidity => "Humedad",
        TranslationKey::Wind => "Viento",
        TranslationKey::Pressure => "Presión",
        TranslationKey::Visibility => "Visibilidad",
        TranslationKey::Sunrise => "Amanecer",
        TranslationKey::Sunset => "Atardecer",
    }
}

/// Whole table for one language, keyed by [`TranslationKey::id`]
#[must_use]
pub fn table(language: Language) -> Vec<(&'static str, &'static str)> {
    TranslationKey::ALL
        .iter()
        .map(|key| (key.id(), translate(language, *key)))
        .collect()
}
