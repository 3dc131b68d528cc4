// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travel submission processing.
//!
//! Handles the core workflow:
//! 1. Geocode the start and end cities (concurrently)
//! 2. Compute the great-circle distance
//! 3. Fold the trip reward into the account in one atomic update
//!
//! Geocoding happens before the account is touched, so a failed lookup
//! leaves every accumulator unchanged.

use crate::db::Database;
use crate::error::Result;
use crate::models::{TravelSubmission, UserAccount};
use crate::services::distance::haversine_km;
use crate::services::geocoding::GeocodingClient;
use crate::services::rewards::{apply_trip, TripOutcome};
use chrono::{DateTime, FixedOffset, Utc};

/// Records travel submissions against user accounts.
#[derive(Clone)]
pub struct TravelService {
    geocoder: GeocodingClient,
    db: Database,
    calendar_offset: FixedOffset,
}

impl TravelService {
    pub fn new(geocoder: GeocodingClient, db: Database, calendar_offset: FixedOffset) -> Self {
        Self {
            geocoder,
            db,
            calendar_offset,
        }
    }

    /// Record a trip made now.
    pub async fn record_trip(
        &self,
        username: &str,
        submission: &TravelSubmission,
    ) -> Result<(TripOutcome, UserAccount)> {
        self.record_trip_at(username, submission, Utc::now()).await
    }

    /// Record a trip made at `now`.
    ///
    /// Returns the trip outcome and the account as committed.
    pub async fn record_trip_at(
        &self,
        username: &str,
        submission: &TravelSubmission,
        now: DateTime<Utc>,
    ) -> Result<(TripOutcome, UserAccount)> {
        tracing::info!(
            username,
            start = %submission.start,
            end = %submission.end,
            mode = %submission.mode,
            "Processing travel submission"
        );

        let (from, to) = self
            .geocoder
            .geocode_pair(&submission.start, &submission.end)
            .await
            .inspect_err(|e| tracing::warn!(username, error = %e, "Geocoding failed"))?;

        let distance_km = haversine_km(from, to);
        let offset = self.calendar_offset;
        let mode = submission.mode;
        let time = submission.time;

        let (outcome, account) = self
            .db
            .update_account(username, move |account| {
                let outcome = apply_trip(account, distance_km, mode, time, now, &offset);
                (outcome, account.clone())
            })
            .await?;

        tracing::info!(
            username,
            distance_km,
            points = outcome.reward.points,
            bonus_points = outcome.bonus_points,
            streak = outcome.streak,
            "Trip recorded"
        );

        Ok((outcome, account))
    }
}
