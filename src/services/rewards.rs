// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward engine: trip points, CO2 savings, streaks and bonuses.
//!
//! Everything here is pure; callers run [`apply_trip`] inside an account
//! update transaction so the whole fold is applied atomically.

use crate::models::{Badge, TimeBucket, TravelMode, UserAccount};
use crate::time_utils::calendar_date;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;

pub const POINTS_PER_KM: f64 = 5.0;
pub const CO2_KG_PER_KM: f64 = 0.2;
pub const OFF_PEAK_MULTIPLIER: f64 = 1.2;

pub const WEEKLY_STREAK_BONUS: f64 = 100.0;
pub const MONTHLY_STREAK_BONUS: f64 = 400.0;
pub const QUARTERLY_STREAK_BONUS: f64 = 1500.0;
pub const MONTHLY_STREAK_DAYS: u32 = 28;
pub const QUARTERLY_STREAK_DAYS: u32 = 84;

/// Bonus for the third submission. The counter is never reset, so this
/// fires once per account.
pub const DAILY_TRIPS_BONUS: f64 = 50.0;
pub const DAILY_TRIPS_TARGET: u32 = 3;

/// Points and CO2 savings for a single trip, before any bonus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripReward {
    pub points: f64,
    pub co2_saved: f64,
}

/// Multiplier applied to both points and CO2 for a travel mode.
pub fn mode_multiplier(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Metro | TravelMode::EvBus => 1.5,
        TravelMode::Walking | TravelMode::Cycling => 2.0,
        TravelMode::Car | TravelMode::Bus | TravelMode::Other => 1.0,
    }
}

/// Compute the reward for a trip of `distance_km`.
///
/// Only the base value is truncated; the mode and off-peak multipliers are
/// applied afterwards and may leave a fractional result.
pub fn calculate_trip_reward(distance_km: f64, mode: TravelMode, time: TimeBucket) -> TripReward {
    let multiplier = mode_multiplier(mode);

    let mut points = (distance_km * POINTS_PER_KM).floor() * multiplier;
    let co2_saved = distance_km * CO2_KG_PER_KM * multiplier;

    if time.is_off_peak() {
        points *= OFF_PEAK_MULTIPLIER;
    }

    TripReward { points, co2_saved }
}

/// What a streak update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First trip, or more than 24 hours since the last one
    Reset,
    /// Within 24 hours and on a new calendar day
    Extended,
    /// Same calendar day
    Unchanged,
}

/// Advance the streak for a trip made at `now`.
///
/// A gap of more than 24 hours resets the streak even when the trips fall on
/// consecutive calendar days; within 24 hours, only a change of calendar day
/// (in `offset`) extends it.
pub fn update_streak(
    account: &mut UserAccount,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> StreakChange {
    let change = match account.last_travel_at {
        None => StreakChange::Reset,
        Some(last) if now - last > Duration::hours(24) => StreakChange::Reset,
        Some(last) if calendar_date(now, offset) != calendar_date(last, offset) => {
            StreakChange::Extended
        }
        Some(_) => StreakChange::Unchanged,
    };

    match change {
        StreakChange::Reset => account.streak = 1,
        StreakChange::Extended => account.streak += 1,
        StreakChange::Unchanged => {}
    }
    account.last_travel_at = Some(now);

    change
}

/// Bonus earned for reaching a streak length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreakBonus {
    pub points: f64,
    pub badge: Option<Badge>,
}

/// Milestone bonus for a streak of `streak` days.
pub fn streak_bonus(streak: u32) -> StreakBonus {
    let mut bonus = StreakBonus::default();
    if streak == 0 || streak % 7 != 0 {
        return bonus;
    }

    bonus.points += WEEKLY_STREAK_BONUS;
    if streak == MONTHLY_STREAK_DAYS {
        bonus.points += MONTHLY_STREAK_BONUS;
        bonus.badge = Some(Badge::MonthlyMaster);
    }
    if streak == QUARTERLY_STREAK_DAYS {
        bonus.points += QUARTERLY_STREAK_BONUS;
        bonus.badge = Some(Badge::QuarterlyChampion);
    }
    bonus
}

/// Result of folding one trip into an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripOutcome {
    pub distance_km: f64,
    pub mode: TravelMode,
    pub time: TimeBucket,
    /// Trip reward, excluding bonuses
    pub reward: TripReward,
    /// Streak and daily bonuses awarded on top of the trip reward
    pub bonus_points: f64,
    /// Badge newly granted by this trip, if any
    pub badge_granted: Option<Badge>,
    pub streak: u32,
    pub streak_change: StreakChange,
}

/// Fold a trip into the account's accumulators.
pub fn apply_trip(
    account: &mut UserAccount,
    distance_km: f64,
    mode: TravelMode,
    time: TimeBucket,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> TripOutcome {
    let reward = calculate_trip_reward(distance_km, mode, time);

    account.points += reward.points;
    account.co2_saved += reward.co2_saved;
    account.daily_trips += 1;
    account.weekly_distance_km += distance_km;
    account.is_new_user = false;

    let streak_change = update_streak(account, now, offset);

    let mut bonus_points = 0.0;
    let mut badge_granted = None;

    let streak = streak_bonus(account.streak);
    bonus_points += streak.points;
    if let Some(badge) = streak.badge {
        if account.badges.insert(badge) {
            badge_granted = Some(badge);
        }
    }

    if account.daily_trips == DAILY_TRIPS_TARGET {
        bonus_points += DAILY_TRIPS_BONUS;
    }

    account.points += bonus_points;

    TripOutcome {
        distance_km,
        mode,
        time,
        reward,
        bonus_points,
        badge_granted,
        streak: account.streak,
        streak_change,
    }
}
