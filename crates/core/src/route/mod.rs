//! Route computation: a real path from the routing service when it answers,
//! a jittered approximation when it does not.

pub mod client;
pub mod estimate;
pub mod fallback;
pub mod session;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use terezinha_transit::{Coordinate, Stop, StopIdentifier};

pub use client::{OpenRouteServiceClient, RoutingClient, RoutingError};
pub use estimate::DistanceEstimator;
pub use fallback::RouteFallbackGenerator;
pub use session::{RouteSession, RouteState};

/// Where a route's geometry came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RouteSource {
    /// Geometry returned by the routing service
    Real,
    /// Synthesized by [`RouteFallbackGenerator`]
    Approximated,
}

/// One computed route.
///
/// `path` always has at least two points, starts at the origin the route was
/// requested from and ends at the stop's coordinate. The distance and ETA are
/// the direct great-circle estimate whatever the source.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResult {
    pub path: Vec<Coordinate>,
    pub distance_km: f64,
    pub eta_minutes: u32,
    pub source: RouteSource,
}

/// Sequence number of a route request, issued when the request is made.
///
/// Later requests get larger tickets; a result whose ticket is not newer
/// than what is already on screen is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteTicket(u64);

impl RouteTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets, starting at 1.
#[derive(Debug, Default)]
pub struct RouteTicketIssuer(AtomicU64);

impl RouteTicketIssuer {
    pub fn issue(&self) -> RouteTicket {
        RouteTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued ticket, if any
    pub fn latest(&self) -> Option<RouteTicket> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RouteTicket(n)),
        }
    }
}

/// A finished computation, tagged with the request it answers.
#[derive(Clone, Debug)]
pub struct RoutePlan {
    pub ticket: RouteTicket,
    pub origin: Coordinate,
    pub stop: Arc<Stop>,
    pub result: RouteResult,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RouteError {
    #[error("current location is not known yet")]
    NoOriginYet,

    #[error("stop not found: {0}")]
    StopNotFound(String),
}

impl RouteError {
    pub fn stop_not_found(id: &StopIdentifier) -> Self {
        RouteError::StopNotFound(id.to_string())
    }
}
