// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use ecotransit_rewards::config::Config;
use ecotransit_rewards::db::{Database, FirestoreDb, MemoryDb};
use ecotransit_rewards::middleware::auth::{create_session_token, SESSION_COOKIE};
use ecotransit_rewards::models::UserAccount;
use ecotransit_rewards::routes::create_router;
use ecotransit_rewards::services::password::hash_password;
use ecotransit_rewards::services::{GeocodingClient, TemplateEngine, TravelService};
use ecotransit_rewards::AppState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Password used for every seeded account.
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by in-memory storage.
///
/// `geocoder_base_url` is usually a wiremock server; pass an unroutable URL
/// when the test never reaches the geocoder.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(geocoder_base_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.geocoder_base_url = geocoder_base_url.to_string();

    let db = Database::Memory(MemoryDb::new());
    let geocoder = GeocodingClient::new(
        &config.geocoder_base_url,
        "test-access-key",
        Duration::from_secs(2),
    )
    .expect("Failed to build geocoding client");
    let travel_service = TravelService::new(geocoder, db.clone(), config.calendar_offset);
    let templates = TemplateEngine::new().expect("Failed to compile templates");

    let state = Arc::new(AppState {
        config,
        db,
        travel_service,
        templates,
    });

    (create_router(state.clone()), state)
}

/// Test app whose geocoder is never contacted.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_test_app("http://127.0.0.1:9/v1")
}

/// Store an account with [`TEST_PASSWORD`].
#[allow(dead_code)]
pub async fn seed_account(state: &AppState, username: &str) -> UserAccount {
    let account = UserAccount::new(
        username,
        "Test User",
        hash_password(TEST_PASSWORD).unwrap(),
        "Ahmedabad",
        "2026-01-01T00:00:00Z",
    );
    state.db.create_account(&account).await.unwrap();
    account
}

/// `Cookie` header value carrying a valid session for `username`.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, username: &str) -> String {
    let token = create_session_token(username, &state.config.session_signing_key).unwrap();
    format!("{}={}", SESSION_COOKIE, token)
}

/// Answer `/forward?query=<place>` with a single match.
#[allow(dead_code)]
pub async fn mock_place(server: &MockServer, place: &str, latitude: f64, longitude: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/forward"))
        .and(query_param("query", place))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "latitude": latitude, "longitude": longitude, "label": place }]
        })))
        .mount(server)
        .await;
}

/// Answer `/forward?query=<place>` with no results.
#[allow(dead_code)]
pub async fn mock_unknown_place(server: &MockServer, place: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/forward"))
        .and(query_param("query", place))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(server)
        .await;
}

/// Geocoder base URL for a wiremock server.
#[allow(dead_code)]
pub fn geocoder_url(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

/// Build a multipart travel form body. Returns (content type, body).
#[allow(dead_code)]
pub fn travel_form(
    start: &str,
    end: &str,
    mode: &str,
    time: &str,
    proof: Option<(&str, &[u8])>,
) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "ecotransit-test-boundary";

    let mut body = Vec::new();
    for (name, value) in [
        ("start", start),
        ("end", end),
        ("travelType", mode),
        ("travelTime", time),
    ] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((content_type, data)) = proof {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ticketProof\"; filename=\"ticket\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Collect a response body as UTF-8 text.
#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
