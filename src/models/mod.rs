// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod reward;
pub mod travel;
pub mod user;

pub use reward::{Reward, RewardOffer};
pub use travel::{Coordinates, CITIES, TimeBucket, TravelMode, TravelSubmission};
pub use user::{Badge, UserAccount};
