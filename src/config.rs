//! Configuration management for the `WeatherMap` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherMapError;
use crate::models::Coordinate;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on suggestions shown for one query
pub const MAX_SUGGESTIONS: u32 = 5;

/// Root configuration structure for the `WeatherMap` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherMapConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Place search (geocoding) configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Initial location detection
    #[serde(default)]
    pub location: LocationConfig,
    /// Local persistent storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Host serving the condition icons
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Place search configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible search service
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Maximum number of suggestions per query
    #[serde(default = "default_suggestion_limit")]
    pub limit: u32,
    /// Quiet period before a typed query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent upstream (Nominatim rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Initial location detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Latitude used when no location hint is available
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,
    /// Longitude used when no location hint is available
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
    /// Place name paired with the fallback coordinate
    #[serde(default = "default_place_name")]
    pub fallback_name: String,
    /// Name used when headers carry coordinates but no city
    #[serde(default = "default_place_name")]
    pub placeholder_name: String,
    /// Look the client IP up when location headers are missing
    #[serde(default)]
    pub ip_lookup_enabled: bool,
    /// Base URL of the ip-api compatible lookup service
    #[serde(default = "default_ip_lookup_base_url")]
    pub ip_lookup_base_url: String,
}

/// Persistent storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value store
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_ip_lookup_base_url() -> String {
    "http://ip-api.com".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_suggestion_limit() -> u32 {
    MAX_SUGGESTIONS
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_user_agent() -> String {
    format!("WeatherMap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_fallback_latitude() -> f64 {
    -33.45694
}

fn default_fallback_longitude() -> f64 {
    -70.64827
}

fn default_place_name() -> String {
    "Your Place".to_string()
}

fn default_storage_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("weathermap").join("storage"))
        .unwrap_or_else(|| PathBuf::from(".weathermap"))
        .to_string_lossy()
        .into_owned()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            icon_base_url: default_icon_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            limit: default_suggestion_limit(),
            debounce_ms: default_debounce_ms(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
            fallback_name: default_place_name(),
            placeholder_name: default_place_name(),
            ip_lookup_enabled: false,
            ip_lookup_base_url: default_ip_lookup_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WeatherMapConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            geocoding: GeocodingConfig::default(),
            location: LocationConfig::default(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LocationConfig {
    /// The coordinate used whenever detection fails.
    ///
    /// Out-of-range values are rejected by `validate`, so the clamp only
    /// matters for configs that skipped validation.
    #[must_use]
    pub fn fallback_coordinate(&self) -> Coordinate {
        Coordinate::clamped(self.fallback_latitude, self.fallback_longitude)
    }
}

impl GeocodingConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl WeatherMapConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERMAP_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathermap").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.icon_base_url.is_empty() {
            self.weather.icon_base_url = default_icon_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.limit == 0 {
            self.geocoding.limit = default_suggestion_limit();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.location.fallback_name.is_empty() {
            self.location.fallback_name = default_place_name();
        }
        if self.location.placeholder_name.is_empty() {
            self.location.placeholder_name = default_place_name();
        }
        if self.storage.path.is_empty() {
            self.storage.path = default_storage_path();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // Missing key is allowed: the weather panels then show their error text
        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(WeatherMapError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(WeatherMapError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(WeatherMapError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 || self.geocoding.timeout_seconds > 300 {
            return Err(WeatherMapError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.geocoding.limit > MAX_SUGGESTIONS {
            return Err(WeatherMapError::config(format!(
                "Suggestion limit cannot exceed {MAX_SUGGESTIONS}"
            ))
            .into());
        }

        if self.geocoding.debounce_ms > 10_000 {
            return Err(WeatherMapError::config("Search debounce cannot exceed 10000 ms").into());
        }

        Coordinate::new(self.location.fallback_latitude, self.location.fallback_longitude)
            .map_err(|e| WeatherMapError::config(format!("Invalid fallback location: {e}")))?;

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Weather API base URL", &self.weather.base_url),
            ("Weather icon base URL", &self.weather.icon_base_url),
            ("Geocoding base URL", &self.geocoding.base_url),
            ("IP lookup base URL", &self.location.ip_lookup_base_url),
        ];
        for (label, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherMapError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WeatherMapConfig::default();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoding.limit, 5);
        assert_eq!(config.geocoding.debounce(), Duration::from_millis(300));
        assert_eq!(config.location.fallback_latitude, -33.45694);
        assert_eq!(config.location.fallback_longitude, -70.64827);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = WeatherMapConfig::default();
        config.weather.api_key = Some("abc".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherMapConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_rejects_large_suggestion_limit() {
        let mut config = WeatherMapConfig::default();
        config.geocoding.limit = 10;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Suggestion limit"));

        config.geocoding.limit = MAX_SUGGESTIONS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_fallback_out_of_range() {
        let mut config = WeatherMapConfig::default();
        config.location.fallback_latitude = 123.0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("fallback location"));
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = WeatherMapConfig::default();
        config.geocoding.base_url = "ftp://example.org".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Geocoding base URL"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = WeatherMapConfig::default();
        config.weather.base_url.clear();
        config.geocoding.limit = 0;
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.geocoding.limit, 5);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[weather]\napi_key = \"0123456789abcdef\"\n\n[geocoding]\ndebounce_ms = 150\n\n[server]\nport = 8088\n"
        )
        .unwrap();

        let config = WeatherMapConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("0123456789abcdef"));
        assert_eq!(config.geocoding.debounce_ms, 150);
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.geocoding.limit, 5);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeatherMapConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weathermap"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
