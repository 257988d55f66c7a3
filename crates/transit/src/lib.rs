//! # terezinha-transit
//!
//! Stop catalog and geographic primitives for the stop map.
//!
//! ## Features
//!
//! - **Validated coordinates**: out-of-range positions are rejected at construction
//! - **Fixed catalog**: stops load once and are shared behind `Arc`s
//! - **Spatial queries**: R-tree backed radius and nearest-stop lookups
//! - **Pluggable source**: everything downstream talks to [`StopProvider`]
//!
//! ## Example
//!
//! ```
//! use terezinha_transit::prelude::*;
//!
//! let catalog = StopCatalog::builtin().unwrap();
//!
//! // Exact-match lookup; absence is a normal outcome
//! let gruta = catalog.find_by_name("Gruta").unwrap();
//! assert!(catalog.find_by_name("gruta").is_none());
//!
//! // Stops within 1 km of the central terminal
//! let center = Coordinate::new(-27.0233, -50.9185).unwrap();
//! let nearby = catalog.stops_near(center, 1000.0);
//! assert!(nearby.iter().any(|s| s.id.as_str() == "terminal-central"));
//! assert!(great_circle_km(center, gruta.coordinate) < 1.5);
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{stop::Stop, traits::*, types::*};
    pub use crate::provider::StopCatalog;
    pub use crate::spatial::{great_circle_km, great_circle_m, EARTH_RADIUS_KM};
}

pub use prelude::*;
