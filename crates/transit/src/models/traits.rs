//! Core trait for stop data.
//!
//! The map and routing layers only see this interface, so the compiled-in
//! catalog can be swapped for a live feed without touching them.

use std::sync::Arc;

use crate::identifiers::StopIdentifier;
use crate::models::stop::Stop;
use crate::models::types::Coordinate;

// ============================================================================
// Provider Trait
// ============================================================================

/// Provider of the known destination points
pub trait StopProvider: Send + Sync {
    // ---- Collections ----

    /// Every stop, in catalog order
    fn list(&self) -> &[Arc<Stop>];

    // ---- Lookups ----

    /// Exact-match lookup by display name. Absence is a normal outcome.
    fn find_by_name(&self, name: &str) -> Option<Arc<Stop>>;
    fn find_by_id(&self, id: &StopIdentifier) -> Option<Arc<Stop>>;

    // ---- Spatial queries ----

    /// Stops within radius (meters), nearest first
    fn stops_near(&self, center: Coordinate, radius_m: f64) -> Vec<Arc<Stop>>;

    /// The N nearest stops to a point
    fn nearest_stops(&self, center: Coordinate, n: usize) -> Vec<Arc<Stop>>;
}
