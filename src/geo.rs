//! Great-circle distance on a spherical Earth (haversine).
//!
//! Accuracy: ~0.5% against the ellipsoid, plenty for "which store is closer".
//! Inputs are degrees and are not range-checked.

use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEG;
    let phi2 = lat2 * DEG;
    let d_phi = (lat2 - lat1) * DEG;
    let d_lambda = (lon2 - lon1) * DEG;

    // Rounding can push `a` just past 1 for antipodal points.
    let a = ((d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const AUGSBURG_CITY: (f64, f64) = (48.36686, 10.89804);
    const MUNICH_MARIENPLATZ: (f64, f64) = (48.13736, 11.57549);

    #[test]
    fn test_identical_points_are_zero() {
        let (lat, lon) = AUGSBURG_CITY;
        assert_eq!(distance_km(lat, lon, lat, lon), 0.0);
        assert_eq!(distance_km(-33.8688, 151.2093, -33.8688, 151.2093), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (AUGSBURG_CITY, MUNICH_MARIENPLATZ),
            ((53.55265, 10.0069), (50.9413, 6.9583)),
            ((0.0, 179.5), (0.0, -179.5)),
            ((89.9, 0.0), (-89.9, 180.0)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let there = distance_km(lat1, lon1, lat2, lon2);
            let back = distance_km(lat2, lon2, lat1, lon1);
            assert_abs_diff_eq!(there, back, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_augsburg_to_munich() {
        let (lat1, lon1) = AUGSBURG_CITY;
        let (lat2, lon2) = MUNICH_MARIENPLATZ;
        let d = distance_km(lat1, lon1, lat2, lon2);
        // Spherical great-circle value; the road distance is longer.
        assert_abs_diff_eq!(d, 56.28, epsilon = 1.0);
    }

    #[test]
    fn test_antimeridian_short_way() {
        // One degree of longitude on the equator, across the date line.
        let d = distance_km(0.0, 179.5, 0.0, -179.5);
        assert_abs_diff_eq!(d, 111.19, epsilon = 0.1);
    }

    #[test]
    fn test_half_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert_abs_diff_eq!(d, PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_antipodal_pairs_stay_finite() {
        for lon in [0.0, 45.0, 90.0, -120.0] {
            for step in -899..=900 {
                let lat = step as f64 * 0.1;
                let d = distance_km(lat, lon, -lat, lon + 180.0);
                assert!(d.is_finite() && d >= 0.0, "lat {} lon {}: {}", lat, lon, d);
                assert_abs_diff_eq!(d, PI * EARTH_RADIUS_KM, epsilon = 1.0);
            }
        }
    }

    #[test]
    fn test_out_of_range_accepted() {
        let d = distance_km(95.0, 200.0, 10.0, 10.0);
        assert!(d.is_finite());
        assert!(d >= 0.0);
    }
}
