//! Place search against a Nominatim-compatible geocoding service
//!
//! `GET {base}/search?format=json&q=<query>&limit=<n>` returns an ordered
//! array of hits whose `lat`/`lon` are strings.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::{GeocodingConfig, MAX_SUGGESTIONS};
use crate::models::{Coordinate, PlaceSuggestion};
use crate::{Result, WeatherMapError};

/// Anything that can turn free text into ranked place suggestions
#[async_trait]
pub trait PlaceSearcher: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// HTTP client for the geocoding search endpoint
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    limit: usize,
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit.clamp(1, MAX_SUGGESTIONS) as usize,
        })
    }
}

#[async_trait]
impl PlaceSearcher for GeocodingClient {
    #[instrument(skip(self), fields(query = query))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let url = format!(
            "{}/search?format=json&q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            self.limit
        );
        debug!("Geocoding request URL: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherMapError::api(format!(
                "geocoding search returned status {status}"
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await?;

        let suggestions: Vec<PlaceSuggestion> = places
            .into_iter()
            .filter_map(|place| match Coordinate::parse(&place.lat, &place.lon) {
                Ok(coordinate) => Some(PlaceSuggestion {
                    display_name: place.display_name,
                    coordinate,
                }),
                Err(e) => {
                    warn!("Skipping geocoding hit '{}': {}", place.display_name, e);
                    None
                }
            })
            .take(self.limit)
            .collect();

        info!(
            "Found {} suggestions for '{}' in {:.3}s",
            suggestions.len(),
            query,
            start_time.elapsed().as_secs_f64()
        );

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeocodingClient {
        let config = GeocodingConfig {
            base_url: server.uri(),
            ..GeocodingConfig::default()
        };
        GeocodingClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_search_parses_and_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("format", "json"))
            .and(query_param("q", "Santiago de Chile"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Santiago, Región Metropolitana, Chile", "lat": "-33.4377756", "lon": "-70.6504502"},
                {"display_name": "Santiago de Compostela, Galicia, España", "lat": "42.8804475", "lon": "-8.5458608"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).search("Santiago de Chile").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].display_name, "Santiago, Región Metropolitana, Chile");
        assert_eq!(results[0].coordinate.latitude(), -33.4377756);
        assert_eq!(results[1].coordinate.longitude(), -8.5458608);
    }

    #[tokio::test]
    async fn test_search_caps_results_and_drops_bad_coordinates() {
        let server = MockServer::start().await;
        let mut body: Vec<serde_json::Value> = vec![serde_json::json!(
            {"display_name": "Broken", "lat": "north", "lon": "1.0"}
        )];
        for i in 0..7 {
            body.push(serde_json::json!({
                "display_name": format!("Place {i}"),
                "lat": format!("{}.5", i),
                "lon": "10.0"
            }));
        }
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let results = client_for(&server).search("place").await.unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].display_name, "Place 0");
    }

    #[tokio::test]
    async fn test_oversized_limit_is_clamped() {
        let server = MockServer::start().await;
        let body: Vec<serde_json::Value> = (0..10)
            .map(|i| {
                serde_json::json!({
                    "display_name": format!("Place {i}"),
                    "lat": format!("{i}.25"),
                    "lon": "20.0"
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let config = GeocodingConfig {
            base_url: server.uri(),
            limit: 10,
            ..GeocodingConfig::default()
        };
        let results = GeocodingClient::new(&config)
            .unwrap()
            .search("place")
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_search_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).search("Lima").await;
        assert!(matches!(result, Err(WeatherMapError::Api { .. })));
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let results = client_for(&server).search("   ").await.unwrap();
        assert!(results.is_empty());
    }
}
