//! User account model for storage and views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Milestone badge. Stored by kind, so each can be held at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Badge {
    /// 28-day streak
    #[serde(rename = "Monthly Master")]
    MonthlyMaster,
    /// 84-day streak
    #[serde(rename = "Quarterly Queen/King")]
    QuarterlyChampion,
}

impl Badge {
    /// Display label, identical to the stored name.
    pub fn label(self) -> &'static str {
        match self {
            Badge::MonthlyMaster => "Monthly Master",
            Badge::QuarterlyChampion => "Quarterly Queen/King",
        }
    }
}

/// User account stored in the `users` collection (document ID = username).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Login name (unique)
    pub username: String,
    /// Display name
    pub name: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Home city chosen at signup
    pub city: String,
    /// Cumulative reward points
    #[serde(default)]
    pub points: f64,
    /// Cumulative CO2 saved (kg)
    #[serde(default)]
    pub co2_saved: f64,
    /// Consecutive travel days
    #[serde(default)]
    pub streak: u32,
    /// Instant of the most recent travel submission
    #[serde(default)]
    pub last_travel_at: Option<DateTime<Utc>>,
    /// Lifetime submission counter (never reset)
    #[serde(default)]
    pub daily_trips: u32,
    /// Accumulated trip distance in km (never reset)
    #[serde(default)]
    pub weekly_distance_km: f64,
    #[serde(default)]
    pub badges: BTreeSet<Badge>,
    /// True until the first travel submission
    #[serde(default)]
    pub is_new_user: bool,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

impl UserAccount {
    /// Fresh account with every accumulator zeroed.
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
        city: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            city: city.into(),
            points: 0.0,
            co2_saved: 0.0,
            streak: 0,
            last_travel_at: None,
            daily_trips: 0,
            weekly_distance_km: 0.0,
            badges: BTreeSet::new(),
            is_new_user: true,
            created_at: created_at.into(),
        }
    }
}
