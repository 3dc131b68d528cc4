// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie (JWT) authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "eco_session";

/// Session lifetime.
const SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60; // 30 days

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Middleware that requires a valid session for an existing account.
///
/// Inserts [`AuthUser`] and a snapshot of the account as request
/// extensions. Page requests without a session are redirected to `/login`;
/// `/api/*` requests get a 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let is_api = request.uri().path().starts_with("/api/");

    let Some(username) = session_username(&jar, &state.config.session_signing_key) else {
        return reject(is_api, None);
    };

    let account = match state.db.get_account(&username).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            tracing::warn!(username, "Session refers to a missing account");
            return reject(is_api, Some(state.config.secure_cookies()));
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(AuthUser { username });
    request.extensions_mut().insert(account);
    next.run(request).await
}

/// Reject an unauthenticated request, optionally clearing a stale cookie.
fn reject(is_api: bool, clear_cookie: Option<bool>) -> Response {
    let jar = match clear_cookie {
        Some(secure) => CookieJar::new().add(removal_cookie(secure)),
        None => CookieJar::new(),
    };

    if is_api {
        (jar, AppError::Unauthorized).into_response()
    } else {
        (jar, Redirect::to("/login")).into_response()
    }
}

/// Username from a valid session cookie, if any.
pub fn session_username(jar: &CookieJar, signing_key: &[u8]) -> Option<String> {
    let token = jar.get(SESSION_COOKIE)?.value();
    verify_session_token(token, signing_key)
}

/// Verify a session token and return its subject.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
        .filter(|sub| !sub.is_empty())
}

/// Create a JWT for a user session.
pub fn create_session_token(username: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: username.to_string(),
        iat: usize::try_from(now)?,
        exp: usize::try_from(now + SESSION_TTL_SECS)?,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time_duration(SESSION_TTL_SECS))
        .build()
}

/// Cookie that clears the session. Attributes match [`session_cookie`].
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time_duration(0))
        .build()
}

fn time_duration(secs: i64) -> time::Duration {
    time::Duration::seconds(secs)
}
