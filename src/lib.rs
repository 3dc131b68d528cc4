// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EcoTransit Rewards: points for greener travel
//!
//! This crate provides the web application that records user trips,
//! geocodes their endpoints, and awards points, CO2 savings, streaks
//! and badges.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{TemplateEngine, TravelService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub travel_service: TravelService,
    pub templates: TemplateEngine,
}
