//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use queries::{great_circle_km, great_circle_m, EARTH_RADIUS_KM};
