//! The session object handed to UI event handlers.

use std::sync::Arc;

use terezinha_core::{
    AppConfig, Geolocator, LocationProvider, RouteError, RoutePlan, RouteSession,
};
use terezinha_transit::{Coordinate, Stop, StopIdentifier, StopProvider};

use crate::layer_server::LayerSnapshot;
use crate::layers::MapLayerManager;
use crate::render::MapSurface;
use crate::render::geojson::feature_collection;
use crate::render::style::Theme;
use crate::state::panel::{ShareMessage, directions_url, share_message};
use crate::state::view::Viewport;

pub mod panel;
pub mod view;

/// Wires the catalog, positioning, route computation and rendering together.
pub struct MapController<S> {
    catalog: Arc<dyn StopProvider>,
    location: LocationProvider,
    session: Arc<RouteSession>,
    layers: MapLayerManager<S>,
    proximity_radius_m: f64,

    origin: Option<Coordinate>,
    snapshot: Option<LayerSnapshot>,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(
        catalog: Arc<dyn StopProvider>,
        location: LocationProvider,
        session: Arc<RouteSession>,
        layers: MapLayerManager<S>,
        proximity_radius_m: f64,
    ) -> Self {
        Self {
            catalog,
            location,
            session,
            layers,
            proximity_radius_m,
            origin: None,
            snapshot: None,
        }
    }

    /// Controller drawing on `surface` with the configured provider's theme.
    pub fn from_config(
        config: &AppConfig,
        catalog: Arc<dyn StopProvider>,
        geolocator: Option<Arc<dyn Geolocator>>,
        mut surface: S,
    ) -> Self {
        surface.set_view(Viewport::Centered {
            center: config.map.center,
            zoom: config.map.zoom,
        });

        Self::new(
            catalog,
            LocationProvider::new(geolocator, config.map.center),
            Arc::new(RouteSession::from_config(config)),
            MapLayerManager::new(
                surface,
                Theme::for_provider(config.map.provider),
                config.map.origin_zoom,
            ),
            config.proximity_radius_m,
        )
    }

    /// Publish the layers to `snapshot` after every change.
    pub fn with_snapshot(mut self, snapshot: LayerSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn catalog(&self) -> &Arc<dyn StopProvider> {
        &self.catalog
    }

    pub fn session(&self) -> &Arc<RouteSession> {
        &self.session
    }

    pub fn layers(&self) -> &MapLayerManager<S> {
        &self.layers
    }

    /// Acquire the origin and draw it with the stops and proximity circle.
    pub async fn locate(&mut self) -> Coordinate {
        let origin = self.location.acquire().await;
        self.origin = Some(origin);

        self.layers.set_origin(origin);
        self.layers.render_stops(self.catalog.list());
        self.layers.set_proximity_circle(origin, self.proximity_radius_m);

        let nearby = self.catalog.stops_near(origin, self.proximity_radius_m);
        tracing::info!(
            "origin {origin}: {} stops within {} m",
            nearby.len(),
            self.proximity_radius_m
        );

        self.publish().await;
        origin
    }

    pub async fn route_to(&mut self, id: &StopIdentifier) -> Result<RoutePlan, RouteError> {
        let stop = self.stop(id)?;
        self.route(stop).await
    }

    /// Exact-match name lookup; an unknown name is logged and reported.
    pub async fn route_to_named(&mut self, name: &str) -> Result<RoutePlan, RouteError> {
        let Some(stop) = self.catalog.find_by_name(name) else {
            tracing::warn!("no stop named {name:?}");
            return Err(RouteError::StopNotFound(name.to_owned()));
        };
        self.route(stop).await
    }

    async fn route(&mut self, stop: Arc<Stop>) -> Result<RoutePlan, RouteError> {
        let pending = self.session.compute_route(self.origin, stop.clone());
        if self.origin.is_some() {
            self.layers.show_loading(&stop);
            self.publish().await;
        }

        let plan = pending.await?;
        self.apply(&plan).await;
        Ok(plan)
    }

    /// Render a plan computed elsewhere through [`Self::session`]. Returns
    /// whether it was newer than what is on screen.
    pub async fn apply(&mut self, plan: &RoutePlan) -> bool {
        let rendered = self.layers.apply_route(plan);
        if rendered {
            self.publish().await;
        }
        rendered
    }

    /// Remove the route; results of requests already made are ignored.
    pub async fn clear_route(&mut self) {
        if let Some(latest) = self.session.latest_ticket() {
            self.layers.discard_through(latest);
        }
        self.layers.clear_route();
        self.session.reset();
        self.publish().await;
    }

    pub fn directions_url(&self, id: &StopIdentifier) -> Result<String, RouteError> {
        let stop = self.stop(id)?;
        let origin = self.origin.ok_or(RouteError::NoOriginYet)?;
        Ok(directions_url(origin, &stop))
    }

    pub fn share_message(&self, id: &StopIdentifier) -> Result<ShareMessage, RouteError> {
        let stop = self.stop(id)?;
        Ok(share_message(&stop))
    }

    fn stop(&self, id: &StopIdentifier) -> Result<Arc<Stop>, RouteError> {
        self.catalog.find_by_id(id).ok_or_else(|| {
            tracing::warn!("no stop with id {id}");
            RouteError::stop_not_found(id)
        })
    }

    async fn publish(&self) {
        if let Some(snapshot) = &self.snapshot {
            let surface = self.layers.surface();
            snapshot
                .publish(feature_collection(surface.container_id(), surface.store()))
                .await;
        }
    }
}
