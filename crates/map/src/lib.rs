//! Map side of the stop map: what is drawn, where the view points, and the
//! panel shown next to it.
//!
//! Everything renderer specific sits behind [`render::MapSurface`], so the
//! route logic runs the same against the open-data GeoJSON front-end, the
//! primary provider's static map, or a test surface.

pub mod layer_server;
pub mod layers;
pub mod logging;
pub mod render;
pub mod state;

pub use layer_server::{LayerServer, LayerSnapshot};
pub use layers::{MapLayerManager, RenderedLayerSet};
pub use render::{
    Geometry, Layer, LayerHandle, LayerKind, LayerStore, MapSurface,
    geojson::GeoJsonSurface,
    static_map::StaticMapSurface,
    style::{Style, Theme},
};
pub use state::{
    MapController,
    panel::{RoutePanel, RouteSummary, ShareMessage, directions_url, share_message},
    view::{Bounds, Viewport},
};
