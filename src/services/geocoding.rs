// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forward geocoding client (positionstack-compatible API).
//!
//! Each lookup is a single `GET {base}/forward?access_key=..&query=..`.
//! There is no caching or retry; a failed lookup is reported to the caller.

use crate::config::Config;
use crate::models::Coordinates;
use serde::Deserialize;
use std::time::Duration;

/// Geocoding failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeocodeError {
    #[error("City not found: {0}")]
    NotFound(String),

    #[error("Geocoding request failed: {0}")]
    Transport(String),
}

/// Geocoding API client.
#[derive(Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl GeocodingClient {
    pub fn new(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            access_key: access_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GeocodeError> {
        Self::new(
            config.geocoder_base_url.clone(),
            config.geocoder_access_key.clone(),
            config.geocoder_timeout,
        )
    }

    /// Resolve a place name to the provider's best match.
    pub async fn geocode(&self, place: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/forward", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("access_key", self.access_key.as_str()), ("query", place)])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, place, "Geocoding provider returned an error");
            return Err(GeocodeError::Transport(format!("HTTP {}: {}", status, body)));
        }

        let body: ForwardResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Transport(format!("Invalid response body: {}", e)))?;

        let coords = body.first_match().ok_or_else(|| {
            tracing::debug!(place, "No geocoding results");
            GeocodeError::NotFound(place.to_string())
        })?;

        tracing::debug!(
            place,
            lat = coords.latitude(),
            lng = coords.longitude(),
            "Geocoded place"
        );
        Ok(coords)
    }

    /// Resolve both trip endpoints concurrently.
    ///
    /// Fails as soon as either lookup fails.
    pub async fn geocode_pair(
        &self,
        start: &str,
        end: &str,
    ) -> Result<(Coordinates, Coordinates), GeocodeError> {
        tokio::try_join!(self.geocode(start), self.geocode(end))
    }
}

/// `/forward` response. Only the first result is used.
///
/// The provider may return an empty list, a list holding an empty array,
/// or omit or null out `data` when nothing matches, so entries stay untyped.
#[derive(Debug, Deserialize)]
struct ForwardResponse {
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ForwardResult {
    latitude: f64,
    longitude: f64,
}

impl ForwardResponse {
    fn first_match(self) -> Option<Coordinates> {
        let first = self.data?.into_iter().next()?;
        let result: ForwardResult = serde_json::from_value(first).ok()?;
        Some(Coordinates::new(result.latitude, result.longitude))
    }
}
