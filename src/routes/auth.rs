// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and logout routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_token, removal_cookie, session_cookie};
use crate::models::{UserAccount, CITIES};
use crate::routes::views::{render, render_with_status, NoBody, Page};
use crate::services::password::{hash_password_blocking, verify_password_blocking};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

const MISSING_CREDENTIALS: &str = "Username and password are required.";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ─── Signup ──────────────────────────────────────────────────

#[derive(Serialize)]
struct SignupBody {
    cities: &'static [&'static str],
}

fn signup_body() -> SignupBody {
    SignupBody { cities: &CITIES }
}

/// Signup form fields. Missing fields deserialize as empty strings so that
/// validation, not extraction, reports them.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 128, message = "Password must be at most 128 characters."))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "validate_city"))]
    pub city: String,
}

impl SignupForm {
    fn has_missing_fields(&self) -> bool {
        [&self.name, &self.username, &self.password, &self.city]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

fn validate_username(username: &str) -> std::result::Result<(), ValidationError> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if (3..=32).contains(&username.len()) && valid_chars {
        Ok(())
    } else {
        Err(ValidationError::new("username").with_message(
            "Username must be 3-32 characters: letters, digits, '.', '_' or '-'.".into(),
        ))
    }
}

fn validate_city(city: &str) -> std::result::Result<(), ValidationError> {
    if CITIES.contains(&city) {
        Ok(())
    } else {
        Err(ValidationError::new("city").with_message("Please choose a city from the list.".into()))
    }
}

/// First human-readable validation message, for display above the form.
fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid signup details.".to_string())
}

async fn signup_page(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    render(&state, "signup.html", &Page::new(None, signup_body()))
}

/// Create an account, then send the user to log in.
async fn signup(State(state): State<Arc<AppState>>, Form(form): Form<SignupForm>) -> Result<Response> {
    let rejected = |status: StatusCode, message: String| {
        render_with_status(
            &state,
            status,
            "signup.html",
            &Page::new(None, signup_body()).with_error(message),
        )
    };

    if form.has_missing_fields() {
        return rejected(StatusCode::BAD_REQUEST, "All fields are required.".to_string());
    }
    if let Err(errors) = form.validate() {
        return rejected(StatusCode::BAD_REQUEST, first_message(&errors));
    }

    let password_hash = hash_password_blocking(form.password).await?;
    let account = UserAccount::new(
        form.username.trim(),
        form.name.trim(),
        password_hash,
        form.city,
        format_utc_rfc3339(chrono::Utc::now()),
    );

    match state.db.create_account(&account).await {
        Ok(()) => {
            tracing::info!(username = %account.username, city = %account.city, "Account created");
            Ok(Redirect::to("/login").into_response())
        }
        Err(AppError::Conflict(_)) => rejected(
            StatusCode::CONFLICT,
            "That username is already taken.".to_string(),
        ),
        Err(e) => Err(e),
    }
}

// ─── Login / Logout ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

async fn login_page(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    render(&state, "login.html", &Page::new(None, NoBody {}))
}

/// Verify credentials and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let rejected = |status: StatusCode, message: &str| {
        render_with_status(
            &state,
            status,
            "login.html",
            &Page::new(None, NoBody {}).with_error(message),
        )
    };

    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return rejected(StatusCode::BAD_REQUEST, MISSING_CREDENTIALS);
    }

    let Some(account) = state.db.get_account(username).await? else {
        tracing::info!(username, "Login for unknown user");
        return rejected(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    };

    if !verify_password_blocking(form.password, account.password_hash.clone()).await? {
        tracing::info!(username, "Login with wrong password");
        return rejected(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    }

    let token = create_session_token(&account.username, &state.config.session_signing_key)?;
    let jar = jar.add(session_cookie(token, state.config.secure_cookies()));

    tracing::info!(username, "User logged in");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(removal_cookie(state.config.secure_cookies()));
    (jar, Redirect::to("/"))
}
