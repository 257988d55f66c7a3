//! Open-data provider surface: layers become a GeoJSON feature collection
//! that a Leaflet or MapLibre client draws on OpenStreetMap tiles.

use ::geojson::{Feature, FeatureCollection, JsonObject, Value, feature::Id};
use serde_json::json;
use terezinha_transit::Coordinate;

use crate::render::{Geometry, Layer, LayerHandle, LayerStore, MapSurface};
use crate::state::view::Viewport;

pub struct GeoJsonSurface {
    container_id: String,
    store: LayerStore,
}

impl GeoJsonSurface {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            store: LayerStore::default(),
        }
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        feature_collection(&self.container_id, &self.store)
    }
}

impl MapSurface for GeoJsonSurface {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn store(&self) -> &LayerStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut LayerStore {
        &mut self.store
    }
}

/// Snapshot of any layer store, with the container id and current view as
/// foreign members.
pub fn feature_collection(container_id: &str, store: &LayerStore) -> FeatureCollection {
    let mut members = JsonObject::new();
    members.insert("container".to_owned(), json!(container_id));
    if let Some(view) = store.view() {
        members.insert("view".to_owned(), view_json(view));
    }

    FeatureCollection {
        bbox: None,
        features: store.iter().map(|(handle, layer)| feature(handle, layer)).collect(),
        foreign_members: Some(members),
    }
}

fn position(c: Coordinate) -> Vec<f64> {
    vec![c.longitude(), c.latitude()]
}

fn feature(handle: LayerHandle, layer: &Layer) -> Feature {
    let style = &layer.style;
    let mut properties = JsonObject::new();
    properties.insert("kind".to_owned(), json!(layer.kind.as_str()));
    if let Some(title) = &layer.title {
        properties.insert("title".to_owned(), json!(title));
    }
    properties.insert("stroke".to_owned(), json!(style.stroke_hex()));
    properties.insert("stroke-width".to_owned(), json!(style.weight));
    properties.insert("stroke-opacity".to_owned(), json!(style.stroke.alpha));
    if let Some(fill) = style.fill {
        properties.insert("fill".to_owned(), json!(super::style::hex(fill)));
        properties.insert("fill-opacity".to_owned(), json!(fill.alpha));
    }

    let value = match &layer.geometry {
        Geometry::Point(point) => Value::Point(position(*point)),
        Geometry::Line(path) => Value::LineString(path.iter().copied().map(position).collect()),
        Geometry::Circle { center, radius_m } => {
            properties.insert("radius_m".to_owned(), json!(radius_m));
            Value::Point(position(*center))
        }
    };

    Feature {
        bbox: None,
        geometry: Some(::geojson::Geometry::new(value)),
        id: Some(Id::Number(handle.id().into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn view_json(view: Viewport) -> serde_json::Value {
    match view {
        Viewport::Centered { center, zoom } => json!({
            "center": position(center),
            "zoom": zoom,
        }),
        Viewport::Fitted { bounds, padding_px } => json!({
            "bounds": [position(bounds.south_west), position(bounds.north_east)],
            "padding": padding_px,
        }),
    }
}
