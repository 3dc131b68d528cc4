// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance between two coordinates.

use crate::models::Coordinates;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lat = (to.latitude() - from.latitude()).to_radians();
    let d_lon = (to.longitude() - from.longitude()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn ahmedabad() -> Coordinates {
        Coordinates::new(23.0225, 72.5714)
    }

    fn surat() -> Coordinates {
        Coordinates::new(21.1702, 72.8311)
    }

    #[test]
    fn test_identical_points() {
        assert_eq!(haversine_km(ahmedabad(), ahmedabad()), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let there = haversine_km(ahmedabad(), surat());
        let back = haversine_km(surat(), ahmedabad());
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_at_equator() {
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_known_city_pair() {
        // Ahmedabad to Surat is roughly 207 km as the crow flies
        let d = haversine_km(ahmedabad(), surat());
        assert!((200.0..215.0).contains(&d), "got {d}");
    }
}
