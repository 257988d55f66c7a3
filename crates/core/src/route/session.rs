use std::future::Future;
use std::sync::{Arc, Mutex};

use rand::{SeedableRng, rngs::StdRng};
use terezinha_transit::{Coordinate, Stop};
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::route::{
    DistanceEstimator, OpenRouteServiceClient, RouteError, RouteFallbackGenerator, RoutePlan,
    RouteResult, RouteSource, RouteTicket, RouteTicketIssuer, RoutingClient,
};

/// Observable progress of the latest route request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteState {
    Idle,
    Requesting(RouteTicket),
    RenderedReal(RouteTicket),
    RenderedApproximate(RouteTicket),
}

impl RouteState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RouteState::Requesting(_))
    }
}

/// Orchestrates route computations: real geometry first, approximation on
/// any routing failure.
pub struct RouteSession {
    client: Arc<dyn RoutingClient>,
    fallback: RouteFallbackGenerator,
    estimator: DistanceEstimator,
    rng: Mutex<StdRng>,

    tickets: RouteTicketIssuer,
    state: watch::Sender<RouteState>,
}

impl RouteSession {
    pub fn new(
        client: Arc<dyn RoutingClient>,
        fallback: RouteFallbackGenerator,
        estimator: DistanceEstimator,
        rng: StdRng,
    ) -> Self {
        let (state, _) = watch::channel(RouteState::Idle);
        Self {
            client,
            fallback,
            estimator,
            rng: Mutex::new(rng),
            tickets: RouteTicketIssuer::default(),
            state,
        }
    }

    /// Session talking to openrouteservice, tuned from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let rng = match config.fallback.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::new(
            Arc::new(OpenRouteServiceClient::new(&config.routing)),
            RouteFallbackGenerator::new(config.fallback.segments, config.fallback.jitter_degrees),
            DistanceEstimator::new(config.estimate.walking_factor),
            rng,
        )
    }

    pub fn estimator(&self) -> &DistanceEstimator {
        &self.estimator
    }

    /// Subscribe to state changes (drives the loading indicator).
    pub fn subscribe(&self) -> watch::Receiver<RouteState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RouteState {
        *self.state.borrow()
    }

    /// Ticket of the most recent request, if any was made.
    pub fn latest_ticket(&self) -> Option<RouteTicket> {
        self.tickets.latest()
    }

    /// Back to `Idle`, e.g. after the user cleared the route.
    pub fn reset(&self) {
        self.state.send_replace(RouteState::Idle);
    }

    /// Compute a route from `origin` to `stop`.
    ///
    /// The ticket is issued when this is called, not when the returned future
    /// is first polled, so call order defines which result is newest.
    /// Fails only with [`RouteError::NoOriginYet`], in which case the routing
    /// service is never contacted.
    pub fn compute_route(
        &self,
        origin: Option<Coordinate>,
        stop: Arc<Stop>,
    ) -> impl Future<Output = Result<RoutePlan, RouteError>> + Send + '_ {
        let issued = origin.map(|origin| {
            let ticket = self.tickets.issue();
            self.publish_if_latest(ticket, RouteState::Requesting(ticket));
            (origin, ticket)
        });

        async move {
            let Some((origin, ticket)) = issued else {
                tracing::warn!("route to {} refused: no origin yet", stop.id);
                return Err(RouteError::NoOriginYet);
            };

            tracing::info!("route #{} to {} requested", ticket.sequence(), stop.id);

            let destination = stop.coordinate;
            let (path, source) = match self.client.request_path(origin, destination).await {
                Ok(path) => (anchor(path, origin, destination), RouteSource::Real),
                Err(error) => {
                    tracing::warn!(
                        "routing service failed for #{} ({error}); approximating",
                        ticket.sequence()
                    );
                    (self.approximate(origin, destination), RouteSource::Approximated)
                }
            };

            let distance_km = self.estimator.distance_km(origin, destination);
            let result = RouteResult {
                path,
                distance_km,
                eta_minutes: self.estimator.eta_minutes(distance_km),
                source,
            };

            self.finish(ticket, source);

            Ok(RoutePlan {
                ticket,
                origin,
                stop,
                result,
            })
        }
    }

    fn approximate(&self, origin: Coordinate, destination: Coordinate) -> Vec<Coordinate> {
        // rng state stays valid across a poisoning panic
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.fallback.approximate(&mut *rng, origin, destination)
    }

    /// Publish completion unless a newer request has been issued meanwhile.
    fn finish(&self, ticket: RouteTicket, source: RouteSource) {
        let next = match source {
            RouteSource::Real => RouteState::RenderedReal(ticket),
            RouteSource::Approximated => RouteState::RenderedApproximate(ticket),
        };
        if !self.publish_if_latest(ticket, next) {
            tracing::debug!("route #{} finished after a newer request", ticket.sequence());
        }
    }

    /// Only the latest ticket may move the observable state.
    fn publish_if_latest(&self, ticket: RouteTicket, next: RouteState) -> bool {
        self.state.send_if_modified(|state| {
            if self.latest_ticket() == Some(ticket) {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}

/// Pin a service path to the exact endpoints: routing services snap to the
/// road network, so their first and last points rarely coincide with the
/// requested ones.
fn anchor(mut path: Vec<Coordinate>, origin: Coordinate, destination: Coordinate) -> Vec<Coordinate> {
    if path.first() != Some(&origin) {
        path.insert(0, origin);
    }
    if path.last() != Some(&destination) || path.len() < 2 {
        path.push(destination);
    }
    path
}
