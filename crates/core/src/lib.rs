//! Route computation for the stop map: where the user is, how to get to a
//! stop, and what to draw when the routing service is down.

pub mod config;
pub mod location;
pub mod route;

// Re-export the catalog crate
pub use terezinha_transit as transit;

pub use config::{AppConfig, ConfigError, MapProvider};
pub use location::{FixedGeolocator, Geolocator, LocationProvider, OriginSource, PositionError};
pub use route::{
    DistanceEstimator, RouteError, RouteFallbackGenerator, RoutePlan, RouteResult, RouteSession,
    RouteSource, RouteState, RouteTicket, RouteTicketIssuer, RoutingClient, RoutingError,
};
