//! Weather API client for OpenWeatherMap integration
//!
//! Current conditions come from `/weather`, the extended forecast from the
//! 5 day / 3 hour `/forecast` endpoint, both in metric units.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{Coordinate, CurrentConditions, DailyForecast, pick_daily_noon};
use crate::{Result, WeatherMapError};

/// Number of days shown by the extended forecast
pub const FORECAST_DAYS: usize = 5;

/// Source of weather data for a coordinate
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentConditions>;
    async fn forecast(&self, coordinate: Coordinate) -> Result<Vec<DailyForecast>>;
}

/// Weather API client for OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WeatherMap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, name: &str, coordinate: Coordinate) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherMapError::config("Weather API key is not configured"))?;
        Ok(format!(
            "{}/{}?lat={}&lon={}&units=metric&appid={}",
            self.base_url,
            name,
            coordinate.latitude(),
            coordinate.longitude(),
            urlencoding::encode(api_key)
        ))
    }

    #[instrument(skip(self, url), fields(url = %url.split("appid=").next().unwrap_or(url)))]
    async fn make_request(&self, url: &str) -> Result<Response> {
        let start_time = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();

        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if status.is_success() {
            Ok(response)
        } else {
            error!("Weather API returned {}", status);
            Err(WeatherMapError::api(format!("weather API returned status {status}")))
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    /// Get current weather for a coordinate
    #[instrument(skip(self), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentConditions> {
        let start_time = Instant::now();
        let url = self.endpoint("weather", coordinate)?;
        let response = self.make_request(&url).await?;

        let body: openweather::CurrentResponse = response.json().await.map_err(|e| {
            error!("Failed to parse weather response: {}", e);
            WeatherMapError::api("Invalid weather data received from OpenWeatherMap")
        })?;
        let conditions = body.into_conditions()?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved current weather for {} in {:.3}s",
            coordinate,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(conditions)
    }

    /// Get the noon sample of the next five days for a coordinate
    #[instrument(skip(self), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    async fn forecast(&self, coordinate: Coordinate) -> Result<Vec<DailyForecast>> {
        let start_time = Instant::now();
        let url = self.endpoint("forecast", coordinate)?;
        let response = self.make_request(&url).await?;

        let body: openweather::ForecastResponse = response.json().await.map_err(|e| {
            error!("Failed to parse forecast response: {}", e);
            WeatherMapError::api("Invalid forecast data received from OpenWeatherMap")
        })?;

        let buckets = body.into_buckets()?;
        let bucket_count = buckets.len();
        let daily = pick_daily_noon(buckets, FORECAST_DAYS);

        info!(
            "Retrieved forecast: {} of {} buckets kept in {:.3}s",
            daily.len(),
            bucket_count,
            start_time.elapsed().as_secs_f64()
        );

        Ok(daily)
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| WeatherMapError::api(format!("timestamp {seconds} is out of range")))
}

/// OpenWeatherMap response structures and conversion utilities
mod openweather {
    use super::{CurrentConditions, DailyForecast, Result, WeatherMapError, timestamp};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: u8,
        #[serde(default)]
        pub pressure: f64,
        #[serde(default)]
        pub temp_min: f64,
        #[serde(default)]
        pub temp_max: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionBlock {
        pub main: String,
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindBlock {
        pub speed: f64,
        #[serde(default)]
        pub deg: u16,
    }

    #[derive(Debug, Deserialize)]
    pub struct SysBlock {
        pub sunrise: i64,
        pub sunset: i64,
    }

    /// `/weather` response
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: MainBlock,
        pub weather: Vec<ConditionBlock>,
        pub wind: WindBlock,
        #[serde(default)]
        pub visibility: u32,
        pub sys: SysBlock,
        #[serde(default)]
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastEntry {
        pub dt: i64,
        pub main: MainBlock,
        pub weather: Vec<ConditionBlock>,
        pub wind: WindBlock,
    }

    #[derive(Debug, Deserialize)]
    pub struct CityBlock {
        /// Shift in seconds from UTC
        #[serde(default)]
        pub timezone: i32,
    }

    /// `/forecast` response
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastEntry>,
        pub city: Option<CityBlock>,
    }

    fn first_condition(conditions: Vec<ConditionBlock>) -> Result<ConditionBlock> {
        conditions
            .into_iter()
            .next()
            .ok_or_else(|| WeatherMapError::api("weather entry has no condition"))
    }

    impl CurrentResponse {
        pub fn into_conditions(self) -> Result<CurrentConditions> {
            let condition = first_condition(self.weather)?;
            Ok(CurrentConditions {
                temperature: self.main.temp,
                feels_like: self.main.feels_like,
                humidity: self.main.humidity,
                pressure: self.main.pressure,
                temp_min: self.main.temp_min,
                temp_max: self.main.temp_max,
                wind_speed: self.wind.speed,
                wind_direction: self.wind.deg,
                visibility: self.visibility,
                sunrise: timestamp(self.sys.sunrise)?,
                sunset: timestamp(self.sys.sunset)?,
                description: condition.description,
                condition: condition.main,
                icon: condition.icon,
                place_name: self.name,
            })
        }
    }

    impl ForecastResponse {
        pub fn into_buckets(self) -> Result<Vec<DailyForecast>> {
            let offset = self.city.map(|c| c.timezone).unwrap_or_default();
            self.list
                .into_iter()
                .map(|entry| {
                    let condition = first_condition(entry.weather)?;
                    Ok(DailyForecast {
                        timestamp: timestamp(entry.dt)?,
                        utc_offset_seconds: offset,
                        temperature: entry.main.temp,
                        feels_like: entry.main.feels_like,
                        humidity: entry.main.humidity,
                        wind_speed: entry.wind.speed,
                        description: condition.description,
                        icon: condition.icon,
                    })
                })
                .collect()
        }
    }
}
