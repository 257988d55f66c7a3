//! In-memory stop catalog.
//!
//! Loaded once at construction and never mutated, with lookup maps and an
//! R-tree for the proximity queries.

use std::collections::HashMap;
use std::sync::Arc;

use rstar::{RTree, AABB};

use crate::identifiers::*;
use crate::models::{stop::Stop, traits::*, types::*};
use crate::spatial::index::StopNode;
use crate::spatial::queries::{degree_box, great_circle_m};

// ============================================================================
// Static Catalog
// ============================================================================

/// Fixed, ordered set of known stops with spatial indexing
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct StopCatalog {
    // Core data, in load order
    stops: Vec<Arc<Stop>>,

    // Lookup maps
    by_id: HashMap<StopIdentifier, Arc<Stop>>,
    by_name: HashMap<Arc<str>, Arc<Stop>>,

    // Spatial index
    stop_tree: RTree<StopNode>,
}

impl StopCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            stops: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            stop_tree: RTree::new(),
        }
    }

    /// Build a catalog from raw stops, keeping their order.
    ///
    /// Fails on duplicate ids or out-of-range coordinates. When two stops
    /// share a display name, name lookup resolves to the first one.
    pub fn from_stops(stops: Vec<Stop>) -> Result<Self> {
        let stops: Vec<Arc<Stop>> = stops.into_iter().map(Arc::new).collect();

        let mut by_id = HashMap::with_capacity(stops.len());
        let mut by_name = HashMap::with_capacity(stops.len());
        for stop in &stops {
            let c = stop.coordinate;
            if !Coordinate::in_range(c.latitude(), c.longitude()) {
                return Err(TransitError::InvalidCoordinate {
                    latitude: c.latitude(),
                    longitude: c.longitude(),
                });
            }
            if by_id.insert(stop.id.clone(), stop.clone()).is_some() {
                return Err(TransitError::DuplicateStop(stop.id.clone()));
            }
            by_name.entry(stop.name.clone()).or_insert_with(|| stop.clone());
        }

        // Build spatial index
        let stop_tree = RTree::bulk_load(stops.iter().cloned().map(StopNode::new).collect());

        Ok(Self {
            stops,
            by_id,
            by_name,
            stop_tree,
        })
    }

    /// Parse a JSON array of stops (an exported or live feed)
    #[cfg(feature = "serde")]
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let stops: Vec<Stop> = serde_json::from_slice(bytes)
            .map_err(|e| TransitError::Serialization(e.to_string()))?;
        Self::from_stops(stops)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Like `find_by_id`, but absence is an error for callers that need one
    pub fn get(&self, id: &StopIdentifier) -> Result<Arc<Stop>> {
        self.find_by_id(id)
            .ok_or_else(|| TransitError::StopNotFound(id.clone()))
    }
}

impl Default for StopCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StopProvider for StopCatalog {
    fn list(&self) -> &[Arc<Stop>] {
        &self.stops
    }

    fn find_by_name(&self, name: &str) -> Option<Arc<Stop>> {
        self.by_name.get(name).cloned()
    }

    fn find_by_id(&self, id: &StopIdentifier) -> Option<Arc<Stop>> {
        self.by_id.get(id).cloned()
    }

    fn stops_near(&self, center: Coordinate, radius_m: f64) -> Vec<Arc<Stop>> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let (d_lat, d_lng) = degree_box(center, radius_m);
        let envelope = AABB::from_corners(
            [center.longitude() - d_lng, center.latitude() - d_lat],
            [center.longitude() + d_lng, center.latitude() + d_lat],
        );

        let mut hits: Vec<(f64, Arc<Stop>)> = self
            .stop_tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|node| (great_circle_m(center, node.stop.coordinate), node.stop.clone()))
            .filter(|(distance, _)| *distance <= radius_m)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        hits.into_iter().map(|(_, stop)| stop).collect()
    }

    fn nearest_stops(&self, center: Coordinate, n: usize) -> Vec<Arc<Stop>> {
        if n == 0 {
            return Vec::new();
        }

        // Degree-space order from the R-tree drifts from ground order away
        // from the equator, so rank every stop by great-circle distance.
        let mut ranked: Vec<(f64, Arc<Stop>)> = self
            .stops
            .iter()
            .map(|stop| (great_circle_m(center, stop.coordinate), stop.clone()))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(n);

        ranked.into_iter().map(|(_, stop)| stop).collect()
    }
}
