//! In-process fakes for the HTTP-backed services

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::geocoding::PlaceSearcher;
use crate::models::{Coordinate, CurrentConditions, DailyForecast, PlaceSuggestion};
use crate::weather::WeatherSource;
use crate::{Result, WeatherMapError};

pub fn suggestion(name: &str, lat: f64, lon: f64) -> PlaceSuggestion {
    PlaceSuggestion {
        display_name: name.to_string(),
        coordinate: Coordinate::new(lat, lon).unwrap(),
    }
}

pub fn santiago_suggestions() -> Vec<PlaceSuggestion> {
    vec![
        suggestion("Santiago, Región Metropolitana, Chile", -33.4377756, -70.6504502),
        suggestion("Santiago de Compostela, Galicia, España", 42.8804475, -8.5458608),
    ]
}

/// Searcher answering from a fixed table and recording every query
#[derive(Default)]
pub struct RecordingSearcher {
    results: HashMap<String, Vec<PlaceSuggestion>>,
    delays: HashMap<String, Duration>,
    failing: bool,
    queries: Mutex<Vec<String>>,
}

impl RecordingSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, results: Vec<PlaceSuggestion>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearcher for RecordingSearcher {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing {
            return Err(WeatherMapError::api("geocoder unavailable"));
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

pub fn conditions_for(coordinate: Coordinate) -> CurrentConditions {
    CurrentConditions {
        temperature: coordinate.latitude() / 2.0,
        feels_like: 18.0,
        humidity: 40,
        pressure: 1012.0,
        temp_min: 15.0,
        temp_max: 25.0,
        wind_speed: 3.0,
        wind_direction: 90,
        visibility: 10_000,
        sunrise: Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        sunset: Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap(),
        description: "clear sky".to_string(),
        condition: "Clear".to_string(),
        icon: "01d".to_string(),
        place_name: coordinate.to_string(),
    }
}

pub fn forecast_for(coordinate: Coordinate) -> Vec<DailyForecast> {
    (0..5)
        .map(|day| DailyForecast {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4 + day, 15, 0, 0).unwrap(),
            utc_offset_seconds: -3 * 3600,
            temperature: coordinate.longitude() / 4.0,
            feels_like: 20.0,
            humidity: 50,
            wind_speed: 2.5,
            description: "few clouds".to_string(),
            icon: "02d".to_string(),
        })
        .collect()
}

/// Weather source returning data derived from the coordinate
#[derive(Default)]
pub struct RecordingWeather {
    delays: Vec<(Coordinate, Duration)>,
    failing: bool,
    current_calls: Mutex<Vec<Coordinate>>,
    forecast_calls: Mutex<Vec<Coordinate>>,
}

impl RecordingWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, coordinate: Coordinate, delay: Duration) -> Self {
        self.delays.push((coordinate, delay));
        self
    }

    pub fn current_calls(&self) -> Vec<Coordinate> {
        self.current_calls.lock().unwrap().clone()
    }

    pub fn forecast_calls(&self) -> Vec<Coordinate> {
        self.forecast_calls.lock().unwrap().clone()
    }

    async fn delay_for(&self, coordinate: Coordinate) {
        if let Some((_, delay)) = self.delays.iter().find(|(c, _)| *c == coordinate) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl WeatherSource for RecordingWeather {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentConditions> {
        self.current_calls.lock().unwrap().push(coordinate);
        self.delay_for(coordinate).await;
        if self.failing {
            return Err(WeatherMapError::api("weather API returned status 500"));
        }
        Ok(conditions_for(coordinate))
    }

    async fn forecast(&self, coordinate: Coordinate) -> Result<Vec<DailyForecast>> {
        self.forecast_calls.lock().unwrap().push(coordinate);
        self.delay_for(coordinate).await;
        if self.failing {
            return Err(WeatherMapError::api("weather API returned status 500"));
        }
        Ok(forecast_for(coordinate))
    }
}
