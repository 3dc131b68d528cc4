// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EcoTransit Rewards server
//!
//! Serves the signup, login, travel and rewards pages, and records trips
//! against user accounts.

use anyhow::Context;
use ecotransit_rewards::{
    config::Config,
    db::Database,
    services::{GeocodingClient, TemplateEngine, TravelService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        backend = ?config.storage_backend,
        "Starting EcoTransit Rewards"
    );

    let db = Database::connect(&config)
        .await
        .context("Failed to connect to account storage")?;

    let geocoder =
        GeocodingClient::from_config(&config).context("Failed to build geocoding client")?;
    tracing::info!(base_url = %config.geocoder_base_url, "Geocoding client initialized");

    let templates = TemplateEngine::new().context("Failed to compile templates")?;

    let travel_service = TravelService::new(geocoder, db.clone(), config.calendar_offset);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        travel_service,
        templates,
    });

    // Build router
    let app = ecotransit_rewards::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecotransit_rewards=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
