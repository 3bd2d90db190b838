use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use rally_application::GeocodingGateway;
use rally_core::{AppError, AppResult};
use rally_domain::Coordinates;

/// Configuration for the Nominatim-compatible geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of the geocoding service.
    pub base_url: String,
    /// User-Agent header value; Nominatim's usage policy requires one.
    pub user_agent: String,
    /// Upper bound for one resolution call. A timeout is a geocoding
    /// failure, never a hang.
    pub timeout: Duration,
}

/// Geocoding gateway backed by a Nominatim-compatible HTTP search API.
pub struct NominatimGeocodingGateway {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocodingGateway {
    /// Creates a gateway with a dedicated HTTP client bounded by the
    /// configured timeout.
    pub fn new(config: GeocoderConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build geocoding HTTP client: {error}"))
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl GeocodingGateway for NominatimGeocodingGateway {
    async fn resolve(&self, address: &str) -> AppResult<Coordinates> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http_client
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|error| {
                tracing::debug!(%error, address, "geocoding request failed");
                AppError::Geocoding(address.to_owned())
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), address, "geocoding request rejected");
            return Err(AppError::Geocoding(address.to_owned()));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|error| {
            tracing::debug!(%error, address, "geocoding response was not valid JSON");
            AppError::Geocoding(address.to_owned())
        })?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Geocoding(address.to_owned()))?;

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| AppError::Geocoding(address.to_owned()))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| AppError::Geocoding(address.to_owned()))?;

        Coordinates::new(latitude, longitude)
            .map_err(|_| AppError::Geocoding(address.to_owned()))
    }
}
