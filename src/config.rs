// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. Secrets (session key,
//! geocoder access key) are never compiled in.

use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::time::Duration;

/// Default positionstack-compatible geocoding endpoint.
pub const DEFAULT_GEOCODER_BASE_URL: &str = "http://api.positionstack.com/v1";

/// Where user accounts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map; data is lost on restart.
    Memory,
    /// Google Cloud Firestore (or the emulator).
    Firestore,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Server port
    pub port: u16,
    /// Externally visible base URL (decides the `Secure` cookie attribute)
    pub public_url: String,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// Account storage backend
    pub storage_backend: StorageBackend,
    /// Geocoding provider base URL
    pub geocoder_base_url: String,
    /// Per-request timeout for geocoding calls
    pub geocoder_timeout: Duration,
    /// UTC offset used to decide calendar days for streaks
    pub calendar_offset: FixedOffset,

    // --- Secrets ---
    /// Geocoding provider access key
    pub geocoder_access_key: String,
    /// JWT signing key for session cookies (raw bytes)
    pub session_signing_key: Vec<u8>,
}

impl Config {
    /// Config for tests: in-memory storage and a localhost geocoder.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            public_url: "http://localhost:8080".to_string(),
            gcp_project_id: "test-project".to_string(),
            storage_backend: StorageBackend::Memory,
            geocoder_base_url: "http://127.0.0.1:9/v1".to_string(),
            geocoder_timeout: Duration::from_secs(5),
            calendar_offset: Utc.fix(),
            geocoder_access_key: "test_access_key".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let offset_minutes: i32 = parse_or("CALENDAR_UTC_OFFSET_MINUTES", 0)?;
        let calendar_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid("CALENDAR_UTC_OFFSET_MINUTES", offset_minutes.to_string())
        })?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "memory".to_string())
                .parse()?,
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GEOCODER_BASE_URL.to_string()),
            geocoder_timeout: Duration::from_secs(parse_or("GEOCODER_TIMEOUT_SECS", 10)?),
            calendar_offset,

            geocoder_access_key: env::var("GEOCODER_ACCESS_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GEOCODER_ACCESS_KEY"))?,
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
