//! Named places: search suggestions, favorites and the active place

use super::Coordinate;
use serde::{Deserialize, Serialize};

/// A geocoder hit offered while the user types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub display_name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// A place the user saved; stored as `{"display_name", "lat", "lon"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub display_name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// The place currently driving the map marker and the weather panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePlace {
    pub display_name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl ActivePlace {
    #[must_use]
    pub fn new(display_name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            display_name: display_name.into(),
            coordinate,
        }
    }
}

impl From<PlaceSuggestion> for ActivePlace {
    fn from(suggestion: PlaceSuggestion) -> Self {
        Self {
            display_name: suggestion.display_name,
            coordinate: suggestion.coordinate,
        }
    }
}

impl From<FavoriteLocation> for ActivePlace {
    fn from(favorite: FavoriteLocation) -> Self {
        Self {
            display_name: favorite.display_name,
            coordinate: favorite.coordinate,
        }
    }
}

impl From<ActivePlace> for FavoriteLocation {
    fn from(place: ActivePlace) -> Self {
        Self {
            display_name: place.display_name,
            coordinate: place.coordinate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn santiago() -> Coordinate {
        Coordinate::new(-33.4489, -70.6693).unwrap()
    }

    #[test]
    fn test_favorite_storage_shape() {
        let favorite = FavoriteLocation {
            display_name: "Santiago, Chile".to_string(),
            coordinate: santiago(),
        };
        let json = serde_json::to_value(&favorite).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"display_name": "Santiago, Chile", "lat": -33.4489, "lon": -70.6693})
        );
    }

    #[test]
    fn test_favorite_parses_stored_shape() {
        let favorite: FavoriteLocation = serde_json::from_str(
            r#"{"display_name":"Lima, Peru","lat":-12.0464,"lon":-77.0428}"#,
        )
        .unwrap();
        assert_eq!(favorite.display_name, "Lima, Peru");
        assert_eq!(favorite.coordinate.latitude(), -12.0464);
    }

    #[test]
    fn test_conversions_keep_name_and_coordinate() {
        let suggestion = PlaceSuggestion {
            display_name: "Santiago".to_string(),
            coordinate: santiago(),
        };
        let active = ActivePlace::from(suggestion.clone());
        let favorite = FavoriteLocation::from(active.clone());
        assert_eq!(favorite.display_name, suggestion.display_name);
        assert_eq!(favorite.coordinate, suggestion.coordinate);
        assert_eq!(ActivePlace::from(favorite), active);
    }
}
