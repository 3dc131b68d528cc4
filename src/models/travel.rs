// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Travel submission types.

use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cities offered by the signup and travel forms.
pub const CITIES: [&str; 10] = [
    "Ahmedabad",
    "Surat",
    "Vadodara",
    "Rajkot",
    "Bhavnagar",
    "Jamnagar",
    "Junagadh",
    "Gandhinagar",
    "Anand",
    "Navsari",
];

/// A latitude/longitude pair in degrees.
///
/// Wraps a `geo::Point` (x = longitude, y = latitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates(pub Point<f64>);

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }
}

/// How the trip was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TravelMode {
    Car,
    Bus,
    Metro,
    EvBus,
    Walking,
    Cycling,
    #[serde(other)]
    Other,
}

impl TravelMode {
    /// All modes, in the order the travel form lists them.
    pub const ALL: [TravelMode; 7] = [
        TravelMode::Car,
        TravelMode::Bus,
        TravelMode::Metro,
        TravelMode::EvBus,
        TravelMode::Walking,
        TravelMode::Cycling,
        TravelMode::Other,
    ];

    /// Parse a form value. Unknown values fall back to `Other`.
    pub fn from_form_value(value: &str) -> Self {
        match value.trim() {
            "car" => TravelMode::Car,
            "bus" => TravelMode::Bus,
            "metro" => TravelMode::Metro,
            "evBus" => TravelMode::EvBus,
            "walking" => TravelMode::Walking,
            "cycling" => TravelMode::Cycling,
            _ => TravelMode::Other,
        }
    }

    /// Form/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Car => "car",
            TravelMode::Bus => "bus",
            TravelMode::Metro => "metro",
            TravelMode::EvBus => "evBus",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            TravelMode::Other => "other",
        }
    }

    /// Human-readable label for views.
    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Car => "Car",
            TravelMode::Bus => "Bus",
            TravelMode::Metro => "Metro",
            TravelMode::EvBus => "Electric bus",
            TravelMode::Walking => "Walking",
            TravelMode::Cycling => "Cycling",
            TravelMode::Other => "Other",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBucket {
    Peak,
    OffPeak,
}

impl TimeBucket {
    /// Parse a form value. Anything other than `offPeak` counts as peak.
    pub fn from_form_value(value: &str) -> Self {
        if value.trim() == "offPeak" {
            TimeBucket::OffPeak
        } else {
            TimeBucket::Peak
        }
    }

    pub fn is_off_peak(self) -> bool {
        self == TimeBucket::OffPeak
    }
}

/// A validated travel submission, ready for geocoding.
#[derive(Debug, Clone)]
pub struct TravelSubmission {
    pub start: String,
    pub end: String,
    pub mode: TravelMode,
    pub time: TimeBucket,
}
