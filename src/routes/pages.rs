// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML pages: home, dashboard, rewards and profile.

use crate::error::Result;
use crate::middleware::auth::session_username;
use crate::models::reward::offers_for;
use crate::models::{RewardOffer, UserAccount};
use crate::routes::views::{render, NoBody, Page};
use crate::AppState;
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

/// Home page, reachable with or without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}

/// Pages behind the auth middleware (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/rewards", get(rewards))
        .route("/profile", get(profile))
}

async fn home(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Html<String>> {
    // The session is optional here; a stale cookie just shows the anonymous page.
    let account = match session_username(&jar, &state.config.session_signing_key) {
        Some(username) => state.db.get_account(&username).await?,
        None => None,
    };

    render(&state, "home.html", &Page::new(account.as_ref(), NoBody {}))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<UserAccount>,
) -> Result<Html<String>> {
    render(&state, "dashboard.html", &Page::new(Some(&account), NoBody {}))
}

#[derive(Serialize)]
struct RewardsBody {
    rewards: Vec<RewardOffer>,
}

async fn rewards(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<UserAccount>,
) -> Result<Html<String>> {
    let body = RewardsBody {
        rewards: offers_for(account.points),
    };
    render(&state, "rewards.html", &Page::new(Some(&account), body))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<UserAccount>,
) -> Result<Html<String>> {
    render(&state, "profile.html", &Page::new(Some(&account), NoBody {}))
}
