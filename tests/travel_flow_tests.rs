// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end travel submission tests.
//!
//! The geocoding provider is a wiremock server; accounts live in the
//! in-memory store so every test starts from a clean state.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use ecotransit_rewards::models::{Coordinates, TimeBucket, TravelMode};
use ecotransit_rewards::services::distance::haversine_km;
use ecotransit_rewards::services::rewards::{calculate_trip_reward, DAILY_TRIPS_BONUS};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{
    body_text, create_test_app, geocoder_url, mock_place, mock_unknown_place, seed_account,
    session_cookie, travel_form,
};

const AHMEDABAD: (f64, f64) = (23.0225, 72.5714);
const GANDHINAGAR: (f64, f64) = (23.2156, 72.6369);

fn ahmedabad_to_gandhinagar_km() -> f64 {
    haversine_km(
        Coordinates::new(AHMEDABAD.0, AHMEDABAD.1),
        Coordinates::new(GANDHINAGAR.0, GANDHINAGAR.1),
    )
}

fn travel_post(cookie: &str, content_type: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/travel")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

async fn geocoder_with_cities() -> MockServer {
    let server = MockServer::start().await;
    mock_place(&server, "Ahmedabad", AHMEDABAD.0, AHMEDABAD.1).await;
    mock_place(&server, "Gandhinagar", GANDHINAGAR.0, GANDHINAGAR.1).await;
    server
}

#[tokio::test]
async fn test_travel_form_renders() {
    let server = MockServer::start().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/travel")
                .header(header::COOKIE, session_cookie(&state, "meera"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"travelType\""));
    assert!(html.contains("value=\"evBus\""));
    assert!(html.contains("Gandhinagar"));
}

#[tokio::test]
async fn test_metro_trip_awards_points() {
    let server = geocoder_with_cities().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let (content_type, body) = travel_form("Ahmedabad", "Gandhinagar", "metro", "peak", None);
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Trip logged"));
    assert!(html.contains("by Metro"));

    let distance = ahmedabad_to_gandhinagar_km();
    let expected = calculate_trip_reward(distance, TravelMode::Metro, TimeBucket::Peak);

    let account = state.db.get_account("meera").await.unwrap().unwrap();
    assert_eq!(account.points, expected.points);
    assert!((account.co2_saved - expected.co2_saved).abs() < 1e-9);
    assert!((account.weekly_distance_km - distance).abs() < 1e-9);
    assert_eq!(account.daily_trips, 1);
    assert_eq!(account.streak, 1);
    assert!(!account.is_new_user);
    assert!(account.last_travel_at.is_some());
}

#[tokio::test]
async fn test_off_peak_walking_trip_with_proof() {
    let server = geocoder_with_cities().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let (content_type, body) = travel_form(
        "Ahmedabad",
        "Gandhinagar",
        "walking",
        "offPeak",
        Some(("image/png", b"\x89PNG fake image bytes")),
    );
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Off-peak bonus applied"));

    let expected = calculate_trip_reward(
        ahmedabad_to_gandhinagar_km(),
        TravelMode::Walking,
        TimeBucket::OffPeak,
    );
    let account = state.db.get_account("meera").await.unwrap().unwrap();
    assert_eq!(account.points, expected.points);
}

#[tokio::test]
async fn test_third_trip_earns_daily_bonus() {
    let server = geocoder_with_cities().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    for _ in 0..3 {
        let (content_type, body) = travel_form("Ahmedabad", "Gandhinagar", "car", "peak", None);
        let response = app
            .clone()
            .oneshot(travel_post(&cookie, &content_type, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let per_trip = calculate_trip_reward(
        ahmedabad_to_gandhinagar_km(),
        TravelMode::Car,
        TimeBucket::Peak,
    );
    let account = state.db.get_account("meera").await.unwrap().unwrap();
    assert_eq!(account.daily_trips, 3);
    assert!((account.points - (per_trip.points * 3.0 + DAILY_TRIPS_BONUS)).abs() < 1e-9);
    assert_eq!(account.streak, 1, "Same-day trips keep the streak");
}

#[tokio::test]
async fn test_unknown_city_leaves_account_unchanged() {
    let server = MockServer::start().await;
    mock_place(&server, "Ahmedabad", AHMEDABAD.0, AHMEDABAD.1).await;
    mock_unknown_place(&server, "Atlantis").await;

    let (app, state) = create_test_app(&geocoder_url(&server));
    let before = seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let (content_type, body) = travel_form("Ahmedabad", "Atlantis", "bus", "peak", None);
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response)
        .await
        .contains("Error fetching coordinates: City not found: Atlantis"));

    let after = state.db.get_account("meera").await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_provider_failure_leaves_account_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forward"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let (app, state) = create_test_app(&geocoder_url(&server));
    let before = seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let (content_type, body) = travel_form("Ahmedabad", "Gandhinagar", "cycling", "peak", None);
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response)
        .await
        .contains("Error fetching coordinates:"));

    let after = state.db.get_account("meera").await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_non_image_proof_rejected_before_geocoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, state) = create_test_app(&geocoder_url(&server));
    let before = seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let (content_type, body) = travel_form(
        "Ahmedabad",
        "Gandhinagar",
        "metro",
        "peak",
        Some(("application/pdf", b"%PDF-1.7")),
    );
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("Ticket proof must be an image."));
    assert_eq!(state.db.get_account("meera").await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn test_oversized_proof_rejected() {
    let server = MockServer::start().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let big = vec![0u8; 5 * 1024 * 1024 + 1];
    let (content_type, body) = travel_form(
        "Ahmedabad",
        "Gandhinagar",
        "metro",
        "peak",
        Some(("image/jpeg", &big)),
    );
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("Ticket proof must be at most 5 MB."));
}

#[tokio::test]
async fn test_proof_over_body_limit_reports_size() {
    let server = MockServer::start().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    // Large enough to trip the request body limit, not just the proof check.
    let huge = vec![0u8; 7 * 1024 * 1024];
    let (content_type, body) = travel_form(
        "Ahmedabad",
        "Gandhinagar",
        "metro",
        "peak",
        Some(("image/jpeg", &huge)),
    );
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.contains("Ticket proof must be at most 5 MB."));
    assert!(!text.contains("Could not read the submitted form."));

    let stored = state.db.get_account("meera").await.unwrap().unwrap();
    assert_eq!(stored.daily_trips, 0);
}

#[tokio::test]
async fn test_missing_city_rejected() {
    let server = MockServer::start().await;
    let (app, state) = create_test_app(&geocoder_url(&server));
    seed_account(&state, "meera").await;
    let cookie = session_cookie(&state, "meera");

    let (content_type, body) = travel_form("", "Gandhinagar", "metro", "peak", None);
    let response = app
        .oneshot(travel_post(&cookie, &content_type, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("Start and end cities are required."));
}
