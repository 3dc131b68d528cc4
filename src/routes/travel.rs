// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travel form and submission.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{TimeBucket, TravelMode, TravelSubmission, UserAccount, CITIES};
use crate::routes::views::{mode_options, render, render_with_status, ModeOption, Page};
use crate::services::geocoding::GeocodeError;
use crate::services::rewards::TripOutcome;
use crate::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartError},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Largest accepted proof image.
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the travel form: the proof plus form overhead.
const BODY_LIMIT_BYTES: usize = MAX_PROOF_BYTES + 1024 * 1024;

/// Travel routes (auth middleware applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/travel", get(travel_form).post(submit_travel))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

#[derive(Serialize)]
struct TravelFormBody {
    cities: &'static [&'static str],
    modes: Vec<ModeOption>,
}

fn form_body() -> TravelFormBody {
    TravelFormBody {
        cities: &CITIES,
        modes: mode_options(),
    }
}

/// Trip summary shown on the confirmation page.
#[derive(Debug, Serialize)]
struct TripView {
    distance_km: f64,
    mode: &'static str,
    mode_label: &'static str,
    points: f64,
    co2_saved: f64,
    is_off_peak: bool,
    bonus_points: f64,
    badge_granted: Option<&'static str>,
}

impl From<&TripOutcome> for TripView {
    fn from(outcome: &TripOutcome) -> Self {
        Self {
            distance_km: outcome.distance_km,
            mode: outcome.mode.as_str(),
            mode_label: outcome.mode.label(),
            points: outcome.reward.points,
            co2_saved: outcome.reward.co2_saved,
            is_off_peak: outcome.time.is_off_peak(),
            bonus_points: outcome.bonus_points,
            badge_granted: outcome.badge_granted.map(|b| b.label()),
        }
    }
}

#[derive(Serialize)]
struct ConfirmationBody {
    trip: TripView,
}

async fn travel_form(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<UserAccount>,
) -> Result<Html<String>> {
    render(&state, "travel.html", &Page::new(Some(&account), form_body()))
}

/// Raw multipart fields before validation.
#[derive(Debug, Default)]
struct TravelFields {
    start: String,
    end: String,
    travel_type: String,
    travel_time: String,
}

/// Why a submitted form was rejected before geocoding.
#[derive(Debug, thiserror::Error)]
enum FormError {
    #[error("Start and end cities are required.")]
    MissingCity,
    #[error("Ticket proof must be an image.")]
    ProofNotImage,
    #[error("Ticket proof must be at most 5 MB.")]
    ProofTooLarge,
    #[error("Could not read the submitted form.")]
    Malformed,
}

/// Read the travel form. The proof, if any, is checked then dropped.
async fn read_fields(mut multipart: Multipart) -> std::result::Result<TravelFields, FormError> {
    let mut fields = TravelFields::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "ticketProof" {
            let content_type = field.content_type().map(str::to_string);
            let has_filename = field.file_name().is_some_and(|f| !f.is_empty());
            let len = proof_len(field).await?;

            // Browsers send an empty part when no file was chosen.
            if len == 0 && !has_filename {
                continue;
            }
            check_proof(content_type.as_deref(), len)?;
            tracing::debug!(bytes = len, "Ticket proof accepted");
            continue;
        }

        let value = field.text().await.map_err(form_error)?;
        match name.as_str() {
            "start" => fields.start = value,
            "end" => fields.end = value,
            "travelType" => fields.travel_type = value,
            "travelTime" => fields.travel_time = value,
            _ => {}
        }
    }

    Ok(fields)
}

/// Stream the proof without buffering it. Stops as soon as it is known to
/// be over the size limit.
async fn proof_len(mut field: Field<'_>) -> std::result::Result<usize, FormError> {
    let mut len = 0;
    while let Some(chunk) = field.chunk().await.map_err(form_error)? {
        len += chunk.len();
        if len > MAX_PROOF_BYTES {
            break;
        }
    }
    Ok(len)
}

/// Hitting the body limit can only mean an oversized proof; the other
/// fields are a few bytes each.
fn form_error(e: MultipartError) -> FormError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FormError::ProofTooLarge
    } else {
        tracing::debug!(error = %e, "Malformed multipart body");
        FormError::Malformed
    }
}

fn check_proof(content_type: Option<&str>, len: usize) -> std::result::Result<(), FormError> {
    if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
        return Err(FormError::ProofNotImage);
    }
    if len > MAX_PROOF_BYTES {
        return Err(FormError::ProofTooLarge);
    }
    Ok(())
}

impl TravelFields {
    fn into_submission(self) -> std::result::Result<TravelSubmission, FormError> {
        let start = self.start.trim().to_string();
        let end = self.end.trim().to_string();
        if start.is_empty() || end.is_empty() {
            return Err(FormError::MissingCity);
        }

        Ok(TravelSubmission {
            start,
            end,
            mode: TravelMode::from_form_value(&self.travel_type),
            time: TimeBucket::from_form_value(&self.travel_time),
        })
    }
}

/// Record a trip and show the confirmation page.
///
/// Form and geocoding problems re-render the travel form with an error and
/// leave the account untouched.
async fn submit_travel(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Extension(account): Extension<UserAccount>,
    multipart: Multipart,
) -> Result<Response> {
    let rejected = |status: StatusCode, message: String| {
        render_with_status(
            &state,
            status,
            "travel.html",
            &Page::new(Some(&account), form_body()).with_error(message),
        )
    };

    let submission = match read_fields(multipart)
        .await
        .and_then(TravelFields::into_submission)
    {
        Ok(submission) => submission,
        Err(e) => {
            tracing::info!(username = %user.username, error = %e, "Travel form rejected");
            return rejected(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state
        .travel_service
        .record_trip(&user.username, &submission)
        .await
    {
        Ok((outcome, updated)) => {
            let body = ConfirmationBody {
                trip: TripView::from(&outcome),
            };
            Ok(render(
                &state,
                "travel_confirmation.html",
                &Page::new(Some(&updated), body),
            )?
            .into_response())
        }
        Err(AppError::Geocoding(e)) => {
            let status = match e {
                GeocodeError::NotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
                GeocodeError::Transport(_) => StatusCode::BAD_GATEWAY,
            };
            rejected(status, format!("Error fetching coordinates: {e}"))
        }
        Err(e) => Err(e),
    }
}
