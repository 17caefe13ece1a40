//! JSON API consumed by the map page

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::WeatherMapError;
use crate::favorites::FavoritesStore;
use crate::geocoding::PlaceSearcher;
use crate::i18n::{self, Language};
use crate::location_resolver::{LocationResolver, ResolvedLocation};
use crate::models::{
    Coordinate, CurrentConditions, DailyForecast, FavoriteLocation, IconSize, PlaceSuggestion,
    icon_url, wind_direction_to_cardinal,
};
use crate::weather::WeatherSource;

/// Services shared by every request
#[derive(Clone)]
pub struct AppState {
    pub searcher: Arc<dyn PlaceSearcher>,
    pub weather: Arc<dyn WeatherSource>,
    pub resolver: Arc<LocationResolver>,
    pub favorites: Arc<FavoritesStore>,
    pub icon_base_url: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

#[derive(Deserialize)]
pub struct CoordinateParams {
    lat: Option<String>,
    lon: Option<String>,
}

impl CoordinateParams {
    fn coordinate(&self) -> Result<Coordinate, ApiError> {
        let (Some(lat), Some(lon)) = (&self.lat, &self.lon) else {
            return Err(ApiError::BadRequest("lat and lon are required".to_string()));
        };
        Coordinate::parse(lat, lon).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Serialize)]
pub struct ApiFavorites {
    /// Translation id of the toast to show, absent for plain listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    pub favorites: Vec<FavoriteLocation>,
}

#[derive(Serialize)]
pub struct ApiCurrentWeather {
    #[serde(flatten)]
    pub conditions: CurrentConditions,
    pub wind_cardinal: &'static str,
    pub icon_url: String,
    pub temperature_text: String,
    pub wind_text: String,
    pub pressure_text: String,
    pub visibility_km: f64,
}

#[derive(Serialize)]
pub struct ApiForecastDay {
    #[serde(flatten)]
    pub day: DailyForecast,
    pub weekday: String,
    pub icon_url: String,
    pub temperature_text: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/location", get(get_location))
        .route("/search", get(get_search))
        .route("/weather", get(get_weather))
        .route("/forecast", get(get_forecast))
        .route(
            "/favorites",
            get(list_favorites).post(add_favorite).delete(remove_favorite),
        )
        .route("/translations/{lang}", get(get_translations))
        .with_state(state)
}

async fn get_location(State(state): State<AppState>, headers: HeaderMap) -> Json<ResolvedLocation> {
    Json(state.resolver.resolve(&headers).await)
}

async fn get_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PlaceSuggestion>>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let suggestions = state.searcher.search(&query).await?;
    Ok(Json(suggestions))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<ApiCurrentWeather>, ApiError> {
    let coordinate = params.coordinate()?;
    let conditions = state.weather.current(coordinate).await?;

    Ok(Json(ApiCurrentWeather {
        wind_cardinal: wind_direction_to_cardinal(conditions.wind_direction),
        icon_url: icon_url(&state.icon_base_url, &conditions.icon, IconSize::Large),
        temperature_text: conditions.format_temperature(),
        wind_text: conditions.format_wind(),
        pressure_text: conditions.format_pressure(),
        visibility_km: conditions.visibility_km(),
        conditions,
    }))
}

async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<Vec<ApiForecastDay>>, ApiError> {
    let coordinate = params.coordinate()?;
    let days = state.weather.forecast(coordinate).await?;

    let days = days
        .into_iter()
        .map(|day| ApiForecastDay {
            weekday: day.weekday_short(),
            icon_url: icon_url(&state.icon_base_url, &day.icon, IconSize::Medium),
            temperature_text: day.format_temperature(),
            day,
        })
        .collect();
    Ok(Json(days))
}

async fn list_favorites(State(state): State<AppState>) -> Json<ApiFavorites> {
    Json(ApiFavorites {
        notice: None,
        favorites: state.favorites.list().await,
    })
}

async fn add_favorite(
    State(state): State<AppState>,
    Json(favorite): Json<FavoriteLocation>,
) -> Result<Json<ApiFavorites>, ApiError> {
    let notice = state.favorites.add(favorite).await?;
    Ok(Json(ApiFavorites {
        notice: Some(notice.key().id()),
        favorites: state.favorites.list().await,
    }))
}

async fn remove_favorite(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<ApiFavorites>, ApiError> {
    let coordinate = params.coordinate()?;
    let notice = state.favorites.remove(coordinate).await?;
    Ok(Json(ApiFavorites {
        notice: Some(notice.key().id()),
        favorites: state.favorites.list().await,
    }))
}

async fn get_translations(
    Path(lang): Path<String>,
) -> Result<Json<BTreeMap<&'static str, &'static str>>, ApiError> {
    let language: Language = lang
        .parse()
        .map_err(|e: WeatherMapError| ApiError::NotFound(e.to_string()))?;
    Ok(Json(i18n::table(language).into_iter().collect()))
}

/// Error body: `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Internal(String),
}

impl From<WeatherMapError> for ApiError {
    fn from(err: WeatherMapError) -> Self {
        match err {
            WeatherMapError::Validation { .. } => ApiError::BadRequest(err.to_string()),
            WeatherMapError::Api { .. } | WeatherMapError::Http { .. } | WeatherMapError::Json { .. } => {
                warn!("Upstream request failed: {}", err);
                ApiError::Upstream(err.user_message())
            }
            _ => {
                error!("Request failed: {}", err);
                ApiError::Internal(err.user_message())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
