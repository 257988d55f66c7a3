//! Catalog data models, types, and traits.

pub mod stop;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use stop::Stop;
pub use traits::StopProvider;
pub use types::{Coordinate, Fare, NextArrival, Result, TransitError};
