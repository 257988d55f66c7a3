//! Core value types and errors for catalog data.

use std::fmt;

use chrono::NaiveTime;

use crate::identifiers::*;

// ============================================================================
// Coordinate
// ============================================================================

/// A WGS84 position in decimal degrees.
///
/// Immutable once built; `new` rejects anything outside
/// latitude [-90, 90] / longitude [-180, 180] and non-finite values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if Self::in_range(latitude, longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(TransitError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Build a coordinate from values already known to be in range
    /// (compiled-in data, or the output of interpolating two valid points).
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn in_range(latitude: f64, longitude: f64) -> bool {
        latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for geo::Point {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = TransitError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

// ============================================================================
// Schedule and fare
// ============================================================================

/// When the next vehicle is due at a stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NextArrival {
    At(NaiveTime),
    /// Reference points that are always open (city hall, hospital).
    AllDay,
}

impl NextArrival {
    pub fn at(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self::At)
    }
}

impl fmt::Display for NextArrival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextArrival::At(time) => write!(f, "{}", time.format("%H:%M")),
            NextArrival::AllDay => write!(f, "24h"),
        }
    }
}

/// Ticket price, kept in integer cents of BRL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Fare {
    Free,
    Cents(u32),
}

impl Fare {
    pub fn is_free(&self) -> bool {
        matches!(self, Fare::Free | Fare::Cents(0))
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fare::Cents(cents) if *cents > 0 => {
                write!(f, "R$ {},{:02}", cents / 100, cents % 100)
            }
            _ => write!(f, "free"),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Duplicate stop id: {0}")]
    DuplicateStop(StopIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_range() {
        assert!(Coordinate::new(-27.0233, -50.9185).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());

        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(TransitError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinate_to_point() {
        let point: geo::Point = Coordinate::new_unchecked(-27.0, -50.9).into();
        assert_eq!(point.x(), -50.9);
        assert_eq!(point.y(), -27.0);
    }

    #[test]
    fn test_fare_display() {
        assert_eq!(Fare::Cents(350).to_string(), "R$ 3,50");
        assert_eq!(Fare::Cents(1205).to_string(), "R$ 12,05");
        assert_eq!(Fare::Free.to_string(), "free");
        assert!(Fare::Cents(0).is_free());
    }

    #[test]
    fn test_next_arrival_display() {
        assert_eq!(NextArrival::at(6, 50).unwrap().to_string(), "06:50");
        assert_eq!(NextArrival::AllDay.to_string(), "24h");
        assert_eq!(NextArrival::at(25, 0), None);
    }
}
