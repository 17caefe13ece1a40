//! Location Resolution Module
//!
//! This module picks the initial place shown to a visitor from what the
//! edge proxy tells us about the request, and never fails: anything missing
//! or malformed resolves to the configured fallback location.

use axum::http::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LocationConfig;
use crate::models::Coordinate;
use crate::{Result, WeatherMapError};

pub const LATITUDE_HEADER: &str = "x-vercel-ip-latitude";
pub const LONGITUDE_HEADER: &str = "x-vercel-ip-longitude";
pub const CITY_HEADER: &str = "x-vercel-ip-city";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const REAL_IP_HEADER: &str = "x-real-ip";

const IP_LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Best-effort initial location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub city: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

/// Service for resolving the visitor's starting location
#[derive(Debug, Clone)]
pub struct LocationResolver {
    config: LocationConfig,
    client: Option<Client>,
}

impl LocationResolver {
    /// Header-only resolver; no network access
    #[must_use]
    pub fn new(config: LocationConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Resolver that falls back to an IP lookup when enabled in `config`
    pub fn with_ip_lookup(config: LocationConfig) -> Result<Self> {
        let client = if config.ip_lookup_enabled {
            Some(
                Client::builder()
                    .timeout(Duration::from_secs(IP_LOOKUP_TIMEOUT_SECS))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { config, client })
    }

    /// The location used whenever nothing better is known
    #[must_use]
    pub fn fallback(&self) -> ResolvedLocation {
        ResolvedLocation {
            coordinate: self.config.fallback_coordinate(),
            city: self.config.fallback_name.clone(),
        }
    }

    /// Resolve from geolocation headers only
    #[must_use]
    pub fn resolve_from_headers(&self, headers: &HeaderMap) -> ResolvedLocation {
        match self.location_from_headers(headers) {
            Ok(location) => {
                debug!(
                    "Resolved location from headers: {} at ({})",
                    location.city, location.coordinate
                );
                location
            }
            Err(e) => {
                debug!("No usable location headers ({}), using fallback", e);
                self.fallback()
            }
        }
    }

    /// Resolve from headers, then by client IP when enabled, then fallback
    pub async fn resolve(&self, headers: &HeaderMap) -> ResolvedLocation {
        if let Ok(location) = self.location_from_headers(headers) {
            return location;
        }

        let Some(client) = &self.client else {
            return self.fallback();
        };

        let Some(ip) = client_ip(headers) else {
            debug!("No client IP in request, using fallback location");
            return self.fallback();
        };

        match self.lookup_ip(client, &ip).await {
            Ok(location) => {
                debug!("Resolved {} by IP to {} at ({})", ip, location.city, location.coordinate);
                location
            }
            Err(e) => {
                warn!("IP lookup for {} failed: {}", ip, e);
                self.fallback()
            }
        }
    }

    fn location_from_headers(&self, headers: &HeaderMap) -> Result<ResolvedLocation> {
        let latitude = header_str(headers, LATITUDE_HEADER)
            .ok_or_else(|| WeatherMapError::validation("latitude header missing"))?;
        let longitude = header_str(headers, LONGITUDE_HEADER)
            .ok_or_else(|| WeatherMapError::validation("longitude header missing"))?;
        let coordinate = Coordinate::parse(latitude, longitude)?;

        let city = header_str(headers, CITY_HEADER)
            .filter(|city| !city.trim().is_empty())
            .map(decode_city)
            .unwrap_or_else(|| self.config.placeholder_name.clone());

        Ok(ResolvedLocation { coordinate, city })
    }

    async fn lookup_ip(&self, client: &Client, ip: &str) -> Result<ResolvedLocation> {
        let url = format!(
            "{}/json/{}",
            self.config.ip_lookup_base_url.trim_end_matches('/'),
            urlencoding::encode(ip)
        );
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(WeatherMapError::api(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body: IpLookupResponse = response.json().await?;
        if body.status != "success" {
            return Err(WeatherMapError::api(format!("IP lookup status '{}'", body.status)));
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(WeatherMapError::api("IP lookup returned no coordinates"));
        };

        Ok(ResolvedLocation {
            coordinate: Coordinate::new(lat, lon)?,
            city: body
                .city
                .filter(|city| !city.is_empty())
                .unwrap_or_else(|| self.config.placeholder_name.clone()),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// The edge proxy percent-encodes city names ("S%C3%A3o%20Paulo")
fn decode_city(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|city| city.into_owned())
        .unwrap_or_else(|_| raw.replace("%20", " "))
}

/// First address of `x-forwarded-for`, else `x-real-ip`
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, FORWARDED_FOR_HEADER)
        .and_then(|value| value.split(',').next())
        .or_else(|| header_str(headers, REAL_IP_HEADER))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}
