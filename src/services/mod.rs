// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod distance;
pub mod geocoding;
pub mod password;
pub mod rewards;
pub mod templates;
pub mod travel;

pub use geocoding::{GeocodeError, GeocodingClient};
pub use templates::TemplateEngine;
pub use travel::TravelService;
