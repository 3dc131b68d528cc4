// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View contexts shared by the HTML page handlers.

use crate::error::Result;
use crate::models::{TravelMode, UserAccount};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

/// Account fields exposed to templates. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub username: String,
    pub name: String,
    pub city: String,
    pub points: f64,
    pub co2_saved: f64,
    pub streak: u32,
    pub trips: u32,
    pub distance_km: f64,
    pub badges: Vec<&'static str>,
    pub is_new_user: bool,
    pub last_travel_at: Option<String>,
    pub created_at: String,
}

impl From<&UserAccount> for UserView {
    fn from(account: &UserAccount) -> Self {
        Self {
            username: account.username.clone(),
            name: account.name.clone(),
            city: account.city.clone(),
            points: account.points,
            co2_saved: account.co2_saved,
            streak: account.streak,
            trips: account.daily_trips,
            distance_km: account.weekly_distance_km,
            badges: account.badges.iter().map(|b| b.label()).collect(),
            is_new_user: account.is_new_user,
            last_travel_at: account.last_travel_at.map(format_utc_rfc3339),
            created_at: account.created_at.clone(),
        }
    }
}

/// Travel mode option for the travel form.
#[derive(Debug, Serialize)]
pub struct ModeOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn mode_options() -> Vec<ModeOption> {
    TravelMode::ALL
        .iter()
        .map(|mode| ModeOption {
            value: mode.as_str(),
            label: mode.label(),
        })
        .collect()
}

/// Page without page-specific fields.
#[derive(Debug, Default, Serialize)]
pub struct NoBody {}

/// Template context: the layout fields plus a page-specific body.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub user: Option<UserView>,
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(user: Option<&UserAccount>, body: T) -> Self {
        Self {
            user: user.map(UserView::from),
            error: None,
            body,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Render a page with status 200.
pub fn render<T: Serialize>(state: &AppState, template: &str, page: &Page<T>) -> Result<Html<String>> {
    Ok(state.templates.render(template, page)?)
}

/// Render a page with an explicit status (form errors).
pub fn render_with_status<T: Serialize>(
    state: &AppState,
    status: StatusCode,
    template: &str,
    page: &Page<T>,
) -> Result<Response> {
    Ok((status, render(state, template, page)?).into_response())
}
