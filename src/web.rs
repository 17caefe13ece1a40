use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::WeatherMapConfig;
use crate::favorites::FavoritesStore;
use crate::geocoding::GeocodingClient;
use crate::location_resolver::LocationResolver;
use crate::store::FjallStore;
use crate::weather::WeatherClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire the HTTP clients and the on-disk favorites store from `config`
pub async fn build_state(config: &WeatherMapConfig) -> crate::Result<AppState> {
    let store = Arc::new(FjallStore::open(&config.storage.path)?);
    let favorites = Arc::new(FavoritesStore::new(store));
    favorites.load().await;

    Ok(AppState {
        searcher: Arc::new(GeocodingClient::new(&config.geocoding)?),
        weather: Arc::new(WeatherClient::new(&config.weather)?),
        resolver: Arc::new(LocationResolver::with_ip_lookup(config.location.clone())?),
        favorites,
        icon_base_url: config.weather.icon_base_url.clone(),
    })
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api::router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(cors),
        )
}

async fn health() -> &'static str {
    "ok"
}

pub async fn run(config: WeatherMapConfig) -> anyhow::Result<()> {
    let state = build_state(&config)
        .await
        .context("Failed to initialize services")?;

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Web server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocationConfig;
    use crate::store::MemoryStore;
    use crate::testing::{RecordingSearcher, RecordingWeather};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState {
            searcher: Arc::new(RecordingSearcher::new()),
            weather: Arc::new(RecordingWeather::new()),
            resolver: Arc::new(LocationResolver::new(LocationConfig::default())),
            favorites: Arc::new(FavoritesStore::new(Arc::new(MemoryStore::new()))),
            icon_base_url: "https://openweathermap.org".to_string(),
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_is_nested_and_cors_enabled() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/translations/en")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_build_state_opens_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WeatherMapConfig::default();
        config.storage.path = dir.path().join("storage").to_string_lossy().into_owned();

        let state = build_state(&config).await.unwrap();
        assert!(state.favorites.list().await.is_empty());
    }
}
