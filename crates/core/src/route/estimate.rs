use terezinha_transit::{Coordinate, great_circle_km};

/// Great-circle distance and a walking-time estimate derived from it.
///
/// The ETA is `distance * walking_factor` minutes, a flat approximation
/// rather than a pace model. It is kept as is; it also says nothing about
/// driving time.
#[derive(Clone, Copy, Debug)]
pub struct DistanceEstimator {
    walking_factor: f64,
}

impl DistanceEstimator {
    pub const DEFAULT_WALKING_FACTOR: f64 = 1.5;

    pub fn new(walking_factor: f64) -> Self {
        Self { walking_factor }
    }

    /// Haversine distance in kilometers, rounded to one decimal place.
    pub fn distance_km(&self, a: Coordinate, b: Coordinate) -> f64 {
        (great_circle_km(a, b) * 10.0).round() / 10.0
    }

    pub fn eta_minutes(&self, distance_km: f64) -> u32 {
        let minutes = (distance_km * self.walking_factor).round();
        if minutes.is_finite() && minutes > 0.0 {
            minutes as u32
        } else {
            0
        }
    }
}

impl Default for DistanceEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WALKING_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        let estimator = DistanceEstimator::default();
        let pairs = [
            (c(-27.0233, -50.9185), c(-27.0220, -50.9200)),
            (c(-27.0233, -50.9185), c(-27.0140, -50.8950)),
            (c(40.7128, -74.0060), c(34.0522, -118.2437)),
            (c(89.9, 179.9), c(-89.9, -179.9)),
        ];

        for (a, b) in pairs {
            assert_eq!(estimator.distance_km(a, b), estimator.distance_km(b, a));
            assert_eq!(estimator.distance_km(a, a), 0.0);
        }
    }

    #[test]
    fn test_distance_rounded_to_one_decimal() {
        let estimator = DistanceEstimator::default();
        let d = estimator.distance_km(c(-27.0233, -50.9185), c(-27.0140, -50.8950));
        assert_relative_eq!(d * 10.0, (d * 10.0).round(), epsilon = 1e-9);
    }

    #[test]
    fn test_nearby_stop_scenario() {
        let estimator = DistanceEstimator::default();
        let origin = c(-27.0233, -50.9185);
        let stop = c(-27.0220, -50.9200);

        let distance = estimator.distance_km(origin, stop);
        let expected = (great_circle_km(origin, stop) * 10.0).round() / 10.0;
        assert_eq!(distance, expected);
        assert_relative_eq!(distance, 0.2);

        assert_eq!(estimator.eta_minutes(distance), (distance * 1.5).round() as u32);
    }

    #[test]
    fn test_eta_monotonic() {
        let estimator = DistanceEstimator::default();
        let mut previous = 0;
        for tenths in 0..500 {
            let eta = estimator.eta_minutes(tenths as f64 / 10.0);
            assert!(eta >= previous, "eta dropped at {tenths}");
            previous = eta;
        }
        assert_eq!(estimator.eta_minutes(10.0), 15);
    }

    #[test]
    fn test_eta_degenerate_inputs() {
        let estimator = DistanceEstimator::default();
        assert_eq!(estimator.eta_minutes(0.0), 0);
        assert_eq!(estimator.eta_minutes(f64::NAN), 0);
        assert_eq!(DistanceEstimator::new(0.0).eta_minutes(12.0), 0);
    }
}
