//! Ownership of everything drawn on the map.

use std::collections::BTreeMap;
use std::sync::Arc;

use terezinha_core::{RoutePlan, RouteResult, RouteSource, RouteTicket};
use terezinha_transit::{Coordinate, Stop, StopIdentifier};

use crate::render::style::Theme;
use crate::render::{Geometry, Layer, LayerHandle, LayerKind, MapSurface};
use crate::state::panel::{RoutePanel, RouteSummary};
use crate::state::view::Viewport;

/// Handles of the layers currently on the surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedLayerSet {
    pub origin_marker: Option<LayerHandle>,
    pub stop_markers: BTreeMap<StopIdentifier, LayerHandle>,
    /// Route polyline plus any start/end highlight markers
    pub route_layers: Vec<LayerHandle>,
    pub proximity_circle: Option<LayerHandle>,
}

impl RenderedLayerSet {
    pub fn len(&self) -> usize {
        usize::from(self.origin_marker.is_some())
            + self.stop_markers.len()
            + self.route_layers.len()
            + usize::from(self.proximity_circle.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sole owner of the rendered layers and the route panel.
///
/// Every replacement removes the old layers from the surface before adding
/// new ones, so at most one route is ever visible. Not meant to be driven
/// from several tasks at once; wrap it in a lock if it has to be shared.
pub struct MapLayerManager<S> {
    surface: S,
    theme: Theme,
    origin_zoom: u8,

    layers: RenderedLayerSet,
    panel: RoutePanel,

    last_rendered: Option<RouteTicket>,
    superseded_through: Option<RouteTicket>,
}

impl<S: MapSurface> MapLayerManager<S> {
    pub fn new(surface: S, theme: Theme, origin_zoom: u8) -> Self {
        Self {
            surface,
            theme,
            origin_zoom,
            layers: RenderedLayerSet::default(),
            panel: RoutePanel::Empty,
            last_rendered: None,
            superseded_through: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layers(&self) -> &RenderedLayerSet {
        &self.layers
    }

    pub fn panel(&self) -> &RoutePanel {
        &self.panel
    }

    /// Ticket of the route currently on screen
    pub fn rendered_ticket(&self) -> Option<RouteTicket> {
        self.last_rendered
    }

    // ---- Origin, stops and proximity ----

    /// Move the "you are here" marker and recenter on it.
    pub fn set_origin(&mut self, origin: Coordinate) {
        if let Some(old) = self.layers.origin_marker.take() {
            self.surface.remove(old);
        }

        let marker = Layer::marker(LayerKind::Origin, origin, self.theme.origin)
            .with_title("You are here");
        self.layers.origin_marker = Some(self.surface.add(marker));
        self.surface.set_view(Viewport::Centered {
            center: origin,
            zoom: self.origin_zoom,
        });
    }

    /// Replace every stop marker with one per given stop.
    pub fn render_stops(&mut self, stops: &[Arc<Stop>]) {
        for (_, handle) in std::mem::take(&mut self.layers.stop_markers) {
            self.surface.remove(handle);
        }

        for stop in stops {
            let style = self.theme.stop_marker(stop);
            let marker = Layer::marker(LayerKind::Stop, stop.coordinate, style)
                .with_title(format!("{} - next: {}", stop.line_label, stop.next_arrival));
            let handle = self.surface.add(marker);
            if let Some(previous) = self.layers.stop_markers.insert(stop.id.clone(), handle) {
                // duplicate id in the input, keep the last marker only
                self.surface.remove(previous);
            }
        }
        tracing::debug!("rendered {} stop markers", self.layers.stop_markers.len());
    }

    pub fn set_proximity_circle(&mut self, center: Coordinate, radius_m: f64) {
        if let Some(old) = self.layers.proximity_circle.take() {
            self.surface.remove(old);
        }

        let circle = Layer {
            kind: LayerKind::Proximity,
            geometry: Geometry::Circle { center, radius_m },
            style: self.theme.proximity,
            title: None,
        };
        self.layers.proximity_circle = Some(self.surface.add(circle));
    }

    // ---- Route ----

    pub fn show_loading(&mut self, stop: &Stop) {
        self.panel = RoutePanel::Loading {
            stop_name: stop.name.clone(),
        };
    }

    /// Draw `result` as the only route on the map and fill the panel.
    ///
    /// Real routes also get start and end markers; they belong to the route
    /// and go away with it.
    pub fn render_route(&mut self, stop: &Stop, result: &RouteResult) {
        self.remove_route_layers();

        let line = Layer {
            kind: LayerKind::Route,
            geometry: Geometry::Line(result.path.clone()),
            style: self.theme.route,
            title: Some(format!("{:.1} km, {} min", result.distance_km, result.eta_minutes)),
        };
        self.layers.route_layers.push(self.surface.add(line));

        if result.source == RouteSource::Real {
            if let (Some(start), Some(end)) = (result.path.first(), result.path.last()) {
                let start = Layer::marker(LayerKind::RouteStart, *start, self.theme.route_start);
                let end = Layer::marker(LayerKind::RouteEnd, *end, self.theme.route_end)
                    .with_title(stop.name.to_string());
                self.layers.route_layers.push(self.surface.add(start));
                self.layers.route_layers.push(self.surface.add(end));
            }
        }

        if let Some(view) = Viewport::fit_path(&result.path) {
            self.surface.set_view(view);
        }
        self.panel = RoutePanel::Summary(RouteSummary::new(stop, result));
    }

    /// Render a finished computation unless something newer is already on
    /// screen or it was cleared away. Returns whether it was rendered.
    pub fn apply_route(&mut self, plan: &RoutePlan) -> bool {
        let stale = self.last_rendered.is_some_and(|shown| plan.ticket <= shown)
            || self.superseded_through.is_some_and(|cut| plan.ticket <= cut);
        if stale {
            tracing::debug!(
                "discarding stale route #{} to {}",
                plan.ticket.sequence(),
                plan.stop.id
            );
            return false;
        }

        self.render_route(&plan.stop, &plan.result);
        self.last_rendered = Some(plan.ticket);
        tracing::info!(
            "route #{} to {} rendered ({}, {:.1} km)",
            plan.ticket.sequence(),
            plan.stop.id,
            plan.result.source,
            plan.result.distance_km
        );
        true
    }

    /// Treat every route up to `ticket` as stale from now on.
    pub fn discard_through(&mut self, ticket: RouteTicket) {
        self.superseded_through = self.superseded_through.max(Some(ticket));
    }

    /// Remove the route and empty the panel.
    pub fn clear_route(&mut self) {
        self.remove_route_layers();
        self.panel = RoutePanel::Empty;
    }

    fn remove_route_layers(&mut self) {
        for handle in self.layers.route_layers.drain(..) {
            if !self.surface.remove(handle) {
                tracing::warn!("route layer {} was already gone", handle.id());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::geojson::GeoJsonSurface;
    use terezinha_core::{DistanceEstimator, RouteTicketIssuer};
    use terezinha_transit::{StopCatalog, StopProvider};

    const ORIGIN: Coordinate = Coordinate::new_unchecked(-27.0233, -50.9185);

    fn manager() -> MapLayerManager<GeoJsonSurface> {
        MapLayerManager::new(GeoJsonSurface::new("mapaContainer"), Theme::open_data(), 14)
    }

    fn catalog() -> StopCatalog {
        StopCatalog::builtin().unwrap()
    }

    fn result(stop: &Stop, source: RouteSource) -> RouteResult {
        let estimator = DistanceEstimator::default();
        let distance_km = estimator.distance_km(ORIGIN, stop.coordinate);
        RouteResult {
            path: vec![ORIGIN, stop.coordinate],
            distance_km,
            eta_minutes: estimator.eta_minutes(distance_km),
            source,
        }
    }

    fn plan(ticket: RouteTicket, stop: Arc<Stop>) -> RoutePlan {
        let result = result(&stop, RouteSource::Real);
        RoutePlan {
            ticket,
            origin: ORIGIN,
            stop,
            result,
        }
    }

    #[test]
    fn test_repeated_render_route_keeps_layer_count() {
        let catalog = catalog();
        let mut manager = manager();
        manager.set_origin(ORIGIN);
        manager.render_stops(catalog.list());
        manager.set_proximity_circle(ORIGIN, 1000.0);
        let base = manager.surface().live_layers();
        assert_eq!(base, 1 + 13 + 1);

        for (i, stop) in catalog.list().iter().cycle().take(40).enumerate() {
            let source = if i % 2 == 0 { RouteSource::Real } else { RouteSource::Approximated };
            manager.render_route(stop, &result(stop, source));

            let route_layers = if source == RouteSource::Real { 3 } else { 1 };
            assert_eq!(manager.layers().route_layers.len(), route_layers);
            assert_eq!(manager.surface().live_layers(), base + route_layers);
            assert_eq!(manager.layers().len(), manager.surface().live_layers());
        }
    }

    #[test]
    fn test_second_render_leaves_only_its_layers() {
        let catalog = catalog();
        let gruta = catalog.find_by_name("Gruta").unwrap();
        let macieira = catalog.find_by_name("Macieira").unwrap();
        let mut manager = manager();

        manager.render_route(&gruta, &result(&gruta, RouteSource::Real));
        let first = manager.layers().route_layers.clone();
        manager.render_route(&macieira, &result(&macieira, RouteSource::Real));

        let store = manager.surface().store();
        assert!(first.iter().all(|handle| store.get(*handle).is_none()));
        let Some(Geometry::Line(path)) = store
            .get(manager.layers().route_layers[0])
            .map(|layer| layer.geometry.clone())
        else {
            panic!("route polyline missing");
        };
        assert_eq!(path.last(), Some(&macieira.coordinate));
    }

    #[test]
    fn test_real_route_gets_highlight_markers() {
        let catalog = catalog();
        let gruta = catalog.find_by_name("Gruta").unwrap();
        let mut manager = manager();

        manager.render_route(&gruta, &result(&gruta, RouteSource::Real));
        let kinds: Vec<_> = manager
            .layers()
            .route_layers
            .iter()
            .filter_map(|h| manager.surface().store().get(*h))
            .map(|layer| layer.kind)
            .collect();
        assert_eq!(kinds, [LayerKind::Route, LayerKind::RouteStart, LayerKind::RouteEnd]);

        manager.render_route(&gruta, &result(&gruta, RouteSource::Approximated));
        assert_eq!(manager.layers().route_layers.len(), 1);
    }

    #[test]
    fn test_render_stops_is_idempotent() {
        let catalog = catalog();
        let mut manager = manager();

        manager.render_stops(catalog.list());
        manager.render_stops(catalog.list());
        assert_eq!(manager.surface().live_layers(), 13);

        manager.render_stops(&catalog.list()[..2]);
        assert_eq!(manager.surface().live_layers(), 2);
    }

    #[test]
    fn test_origin_and_circle_are_replaced() {
        let mut manager = manager();
        let elsewhere = Coordinate::new(-27.0, -50.9).unwrap();

        manager.set_origin(ORIGIN);
        manager.set_proximity_circle(ORIGIN, 1000.0);
        manager.set_origin(elsewhere);
        manager.set_proximity_circle(elsewhere, 500.0);

        assert_eq!(manager.surface().live_layers(), 2);
        assert_eq!(
            manager.surface().store().view(),
            Some(Viewport::Centered { center: elsewhere, zoom: 14 })
        );
    }

    #[test]
    fn test_route_fits_view_and_fills_panel() {
        let catalog = catalog();
        let gruta = catalog.find_by_name("Gruta").unwrap();
        let mut manager = manager();

        manager.show_loading(&gruta);
        assert!(manager.panel().is_loading());

        manager.render_route(&gruta, &result(&gruta, RouteSource::Approximated));
        assert!(matches!(
            manager.surface().store().view(),
            Some(Viewport::Fitted { padding_px: 20, .. })
        ));
        let RoutePanel::Summary(summary) = manager.panel() else {
            panic!("expected a summary panel");
        };
        assert_eq!(summary.stop_id, gruta.id);
        assert_eq!(summary.source, RouteSource::Approximated);

        manager.clear_route();
        assert_eq!(manager.panel(), &RoutePanel::Empty);
        assert!(manager.layers().route_layers.is_empty());
        assert_eq!(manager.surface().live_layers(), 0);
    }

    #[test]
    fn test_older_plan_arriving_late_is_discarded() {
        let catalog = catalog();
        let issuer = RouteTicketIssuer::default();
        let older = plan(issuer.issue(), catalog.find_by_name("Gruta").unwrap());
        let newer = plan(issuer.issue(), catalog.find_by_name("Macieira").unwrap());
        let mut manager = manager();

        assert!(manager.apply_route(&newer));
        assert!(!manager.apply_route(&older));

        assert_eq!(manager.rendered_ticket(), Some(newer.ticket));
        let RoutePanel::Summary(summary) = manager.panel() else {
            panic!("expected a summary panel");
        };
        assert_eq!(summary.stop_name.as_ref(), "Macieira");
        assert_eq!(manager.layers().route_layers.len(), 3);
    }

    #[test]
    fn test_in_order_plans_both_render() {
        let catalog = catalog();
        let issuer = RouteTicketIssuer::default();
        let older = plan(issuer.issue(), catalog.find_by_name("Gruta").unwrap());
        let newer = plan(issuer.issue(), catalog.find_by_name("Macieira").unwrap());
        let mut manager = manager();

        assert!(manager.apply_route(&older));
        assert!(manager.apply_route(&newer));
        assert!(!manager.apply_route(&newer));
        assert_eq!(manager.rendered_ticket(), Some(newer.ticket));
    }

    #[test]
    fn test_cleared_plans_stay_discarded() {
        let catalog = catalog();
        let issuer = RouteTicketIssuer::default();
        let pending = plan(issuer.issue(), catalog.find_by_name("Gruta").unwrap());
        let mut manager = manager();

        manager.clear_route();
        manager.discard_through(pending.ticket);
        assert!(!manager.apply_route(&pending));
        assert_eq!(manager.surface().live_layers(), 0);

        let next = plan(issuer.issue(), catalog.find_by_name("Gruta").unwrap());
        assert!(manager.apply_route(&next));
    }
}
