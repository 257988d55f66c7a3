//! R-tree nodes for spatial indexing.
//!
//! Wraps stops with their position for radius and nearest-neighbour queries.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries use two stages:
//! 1. **R-tree filter**: a degree-space envelope around the query circle
//! 2. **Great-circle filter**: exact haversine distance on what survives
//!
//! The envelope is cheap but distorted away from the equator; the second
//! stage makes the final answer exact.

use std::sync::Arc;

use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::stop::Stop;

// ============================================================================
// Stop Spatial Node
// ============================================================================

#[derive(Clone)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<Stop>) -> Self {
        let point = [stop.coordinate.longitude(), stop.coordinate.latitude()];
        Self { stop, point }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
