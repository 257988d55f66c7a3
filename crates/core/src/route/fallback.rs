use rand::Rng;
use terezinha_transit::Coordinate;

/// Synthesizes a plausible-looking path when no routing data is available.
///
/// Points are evenly interpolated between the endpoints; each intermediate
/// point gets independent uniform jitter of at most `jitter_degrees` on both
/// axes so the line does not look ruler-straight. Endpoints are exact.
#[derive(Clone, Copy, Debug)]
pub struct RouteFallbackGenerator {
    segments: usize,
    jitter_degrees: f64,
}

impl RouteFallbackGenerator {
    pub const DEFAULT_SEGMENTS: usize = 5;
    pub const DEFAULT_JITTER_DEGREES: f64 = 0.0005;

    /// `segments` below 1 is raised to 1 so a path always has two points.
    pub fn new(segments: usize, jitter_degrees: f64) -> Self {
        Self {
            segments: segments.max(1),
            jitter_degrees: if jitter_degrees.is_finite() {
                jitter_degrees.abs()
            } else {
                0.0
            },
        }
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Path with the configured number of segments.
    pub fn approximate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Vec<Coordinate> {
        self.approximate_with(rng, origin, destination, self.segments)
    }

    /// Path of exactly `segments + 1` points (`segments` raised to 1 if 0).
    pub fn approximate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        origin: Coordinate,
        destination: Coordinate,
        segments: usize,
    ) -> Vec<Coordinate> {
        let segments = segments.max(1);
        let d_lat = destination.latitude() - origin.latitude();
        let d_lng = destination.longitude() - origin.longitude();

        let mut path = Vec::with_capacity(segments + 1);
        path.push(origin);
        for i in 1..segments {
            let t = i as f64 / segments as f64;
            let lat = origin.latitude() + d_lat * t + self.jitter(rng);
            let lng = origin.longitude() + d_lng * t + self.jitter(rng);
            // Jitter can push a point past a pole or the antimeridian.
            path.push(Coordinate::new_unchecked(
                lat.clamp(-90.0, 90.0),
                lng.clamp(-180.0, 180.0),
            ));
        }
        path.push(destination);

        path
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter_degrees == 0.0 {
            return 0.0;
        }
        rng.random_range(-self.jitter_degrees..=self.jitter_degrees)
    }
}

impl Default for RouteFallbackGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEGMENTS, Self::DEFAULT_JITTER_DEGREES)
    }
}
