// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes for authenticated users.

use crate::models::UserAccount;
use crate::time_utils::format_utc_rfc3339;
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::AppState;

/// API routes (require a session cookie).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Current account response.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccountResponse {
    pub username: String,
    pub name: String,
    pub city: String,
    pub points: f64,
    pub co2_saved: f64,
    pub streak: u32,
    pub daily_trips: u32,
    pub weekly_distance_km: f64,
    pub badges: Vec<String>,
    pub is_new_user: bool,
    pub last_travel_at: Option<String>,
    pub created_at: String,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            badges: account
                .badges
                .iter()
                .map(|b| b.label().to_string())
                .collect(),
            last_travel_at: account.last_travel_at.map(format_utc_rfc3339),
            username: account.username,
            name: account.name,
            city: account.city,
            points: account.points,
            co2_saved: account.co2_saved,
            streak: account.streak,
            daily_trips: account.daily_trips,
            weekly_distance_km: account.weekly_distance_km,
            is_new_user: account.is_new_user,
            created_at: account.created_at,
        }
    }
}

/// Get the current account. The middleware already loaded it.
async fn get_me(Extension(account): Extension<UserAccount>) -> Json<AccountResponse> {
    Json(AccountResponse::from(account))
}
