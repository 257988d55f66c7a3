//! Spatial query utilities for distance calculations.
//!
//! Uses the haversine formula on a spherical Earth of radius 6371 km.

use crate::models::types::Coordinate;

/// Mean Earth radius used by every distance in the workspace
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers (unrounded)
pub fn great_circle_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude().to_radians().cos()
            * b.latitude().to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates in meters
pub fn great_circle_m(a: Coordinate, b: Coordinate) -> f64 {
    great_circle_km(a, b) * 1000.0
}

/// Convert meters to degrees of latitude (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / 111_320.0
}

/// Half-widths in degrees (lat, lng) of a box that contains a circle of
/// `radius_m` around `center`.
pub fn degree_box(center: Coordinate, radius_m: f64) -> (f64, f64) {
    let d_lat = meters_to_degrees_approx(radius_m);
    // Clamp the cosine so boxes near the poles stay finite.
    let d_lng = d_lat / center.latitude().to_radians().cos().max(0.01);
    (d_lat, d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_great_circle_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Coordinate::new_unchecked(40.7128, -74.0060);
        let la = Coordinate::new_unchecked(34.0522, -118.2437);

        let dist = great_circle_km(nyc, la);
        assert!((dist - 3_936.0).abs() < 50.0); // Within 50km
    }

    #[test]
    fn test_great_circle_symmetric_and_zero() {
        let a = Coordinate::new_unchecked(-27.0233, -50.9185);
        let b = Coordinate::new_unchecked(-27.0140, -50.8950);

        assert_eq!(great_circle_km(a, b), great_circle_km(b, a));
        assert_eq!(great_circle_km(a, a), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinate::new_unchecked(0.0, 0.0);
        let b = Coordinate::new_unchecked(1.0, 0.0);

        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert_relative_eq!(great_circle_km(a, b), expected, epsilon = 1e-9);
        assert_relative_eq!(great_circle_m(a, b), expected * 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degree_box_widens_longitude() {
        let (d_lat, d_lng) = degree_box(Coordinate::new_unchecked(60.0, 10.0), 1000.0);
        assert_relative_eq!(d_lng, d_lat * 2.0, max_relative = 1e-9);
    }
}
