//! Error types and handling for the `WeatherMap` application

use thiserror::Error;

/// Main error type for the `WeatherMap` application
#[derive(Error, Debug)]
pub enum WeatherMapError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream API answered with something we cannot use
    #[error("API error: {message}")]
    Api { message: String },

    /// Transport-level HTTP failures
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Persistent storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding or decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherMapError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherMapError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WeatherMapError::Api { .. } | WeatherMapError::Http { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            WeatherMapError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherMapError::Storage { .. } => {
                "Saving local data failed. Your favorites may not be persisted.".to_string()
            }
            WeatherMapError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeatherMapError::Json { .. } => {
                "Received data in an unexpected format.".to_string()
            }
            WeatherMapError::General { message } => message.clone(),
        }
    }
}

impl From<fjall::Error> for WeatherMapError {
    fn from(err: fjall::Error) -> Self {
        WeatherMapError::storage(err.to_string())
    }
}

impl From<tokio::task::JoinError> for WeatherMapError {
    fn from(err: tokio::task::JoinError) -> Self {
        WeatherMapError::general(format!("background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WeatherMapError::config("missing API key");
        assert!(matches!(config_err, WeatherMapError::Config { .. }));

        let api_err = WeatherMapError::api("status 500");
        assert!(matches!(api_err, WeatherMapError::Api { .. }));

        let validation_err = WeatherMapError::validation("latitude out of range");
        assert!(matches!(validation_err, WeatherMapError::Validation { .. }));

        let storage_err = WeatherMapError::storage("disk full");
        assert!(matches!(storage_err, WeatherMapError::Storage { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = WeatherMapError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = WeatherMapError::api("test");
        assert!(api_err.user_message().contains("Unable to connect"));

        let validation_err = WeatherMapError::validation("lat 91");
        assert!(validation_err.user_message().contains("lat 91"));

        let general = WeatherMapError::general("plain text");
        assert_eq!(general.user_message(), "plain text");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WeatherMapError = io_err.into();
        assert!(matches!(err, WeatherMapError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: WeatherMapError = json_err.into();
        assert!(matches!(err, WeatherMapError::Json { .. }));
    }
}
