//! Drawable layers and the surfaces that hold them.

use std::collections::BTreeMap;

use terezinha_transit::Coordinate;

use crate::render::style::Style;
use crate::state::view::Viewport;

pub mod geojson;
pub mod static_map;
pub mod style;

/// Opaque id of a layer on a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerHandle(u64);

impl LayerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Role of a layer on the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Origin,
    Stop,
    Route,
    RouteStart,
    RouteEnd,
    Proximity,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Origin => "origin",
            LayerKind::Stop => "stop",
            LayerKind::Route => "route",
            LayerKind::RouteStart => "route-start",
            LayerKind::RouteEnd => "route-end",
            LayerKind::Proximity => "proximity",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    Line(Vec<Coordinate>),
    Circle { center: Coordinate, radius_m: f64 },
}

/// One visual element: a marker, a line or a circle.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub geometry: Geometry,
    pub style: Style,
    /// Hover/popup text
    pub title: Option<String>,
}

impl Layer {
    pub fn marker(kind: LayerKind, position: Coordinate, style: Style) -> Self {
        Self {
            kind,
            geometry: Geometry::Point(position),
            style,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Live layers of a surface in insertion order, plus the last view set.
#[derive(Debug, Default)]
pub struct LayerStore {
    layers: BTreeMap<LayerHandle, Layer>,
    next_id: u64,
    view: Option<Viewport>,
}

impl LayerStore {
    pub fn insert(&mut self, layer: Layer) -> LayerHandle {
        self.next_id += 1;
        let handle = LayerHandle(self.next_id);
        self.layers.insert(handle, layer);
        handle
    }

    pub fn remove(&mut self, handle: LayerHandle) -> Option<Layer> {
        self.layers.remove(&handle)
    }

    pub fn get(&self, handle: LayerHandle) -> Option<&Layer> {
        self.layers.get(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerHandle, &Layer)> {
        self.layers.iter().map(|(handle, layer)| (*handle, layer))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn view(&self) -> Option<Viewport> {
        self.view
    }

    pub fn set_view(&mut self, view: Viewport) {
        self.view = Some(view);
    }
}

/// A rendering surface identified by its container id.
///
/// Surfaces keep their layers in a [`LayerStore`]; how those layers reach a
/// screen is up to the implementation.
pub trait MapSurface: Send {
    fn container_id(&self) -> &str;

    fn store(&self) -> &LayerStore;
    fn store_mut(&mut self) -> &mut LayerStore;

    fn add(&mut self, layer: Layer) -> LayerHandle {
        tracing::debug!("{}: adding {} layer", self.container_id(), layer.kind.as_str());
        self.store_mut().insert(layer)
    }

    /// Returns whether the handle was live.
    fn remove(&mut self, handle: LayerHandle) -> bool {
        self.store_mut().remove(handle).is_some()
    }

    fn set_view(&mut self, view: Viewport) {
        self.store_mut().set_view(view);
    }

    fn live_layers(&self) -> usize {
        self.store().len()
    }
}
