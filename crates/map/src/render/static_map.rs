//! Primary provider surface: layers become a static map image URL.

use palette::Srgba;
use terezinha_transit::{Coordinate, EARTH_RADIUS_KM};

use crate::render::{Geometry, LayerKind, LayerStore, MapSurface};
use crate::state::view::Viewport;

pub const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Vertices used to draw a circle as a closed path
pub const CIRCLE_VERTICES: usize = 36;

pub struct StaticMapSurface {
    container_id: String,
    width: u32,
    height: u32,
    api_key: Option<String>,
    store: LayerStore,
}

impl StaticMapSurface {
    pub fn new(container_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            container_id: container_id.into(),
            width,
            height,
            api_key: None,
            store: LayerStore::default(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Image URL showing every live layer under the current view.
    pub fn image_url(&self) -> String {
        let mut params = vec![format!("size={}x{}", self.width, self.height)];

        match self.store.view() {
            Some(Viewport::Centered { center, zoom }) => {
                params.push(format!("center={}", point(center)));
                params.push(format!("zoom={zoom}"));
            }
            Some(Viewport::Fitted { bounds, .. }) => {
                params.push(format!("center={}", point(bounds.center())));
                params.push(format!(
                    "visible={}%7C{}",
                    point(bounds.south_west),
                    point(bounds.north_east)
                ));
            }
            None => {}
        }

        for (_, layer) in self.store.iter() {
            let style = &layer.style;
            match &layer.geometry {
                Geometry::Point(position) => {
                    let color = style.fill.unwrap_or(style.stroke);
                    let size = if layer.kind == LayerKind::Stop { "small" } else { "mid" };
                    params.push(format!(
                        "markers=color:{}%7Csize:{size}%7C{}",
                        color_param(color),
                        point(*position)
                    ));
                }
                Geometry::Line(path) => {
                    params.push(format!(
                        "path=color:{}%7Cweight:{}{}",
                        color_param(style.stroke),
                        style.weight.round(),
                        points(path.iter().copied())
                    ));
                }
                Geometry::Circle { center, radius_m } => {
                    let fill = style
                        .fill
                        .map(|fill| format!("%7Cfillcolor:{}", color_param(fill)))
                        .unwrap_or_default();
                    params.push(format!(
                        "path=color:{}%7Cweight:{}{fill}{}",
                        color_param(style.stroke),
                        style.weight.round(),
                        points(circle_polygon(*center, *radius_m).into_iter())
                    ));
                }
            }
        }

        if let Some(key) = &self.api_key {
            params.push(format!("key={key}"));
        }

        format!("{STATIC_MAP_ENDPOINT}?{}", params.join("&"))
    }
}

impl MapSurface for StaticMapSurface {
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

fn point(c: Coordinate) -> String {
    format!("{:.6},{:.6}", c.latitude(), c.longitude())
}

fn points(path: impl Iterator<Item = Coordinate>) -> String {
    path.map(|c| format!("%7C{}", point(c))).collect()
}

/// `0xRRGGBBAA`
fn color_param(color: Srgba<f32>) -> String {
    let rgba: Srgba<u8> = color.into_format();
    format!(
        "0x{:02x}{:02x}{:02x}{:02x}",
        rgba.red, rgba.green, rgba.blue, rgba.alpha
    )
}

/// Closed ring of [`CIRCLE_VERTICES`] points around `center` (first point
/// repeated at the end).
pub fn circle_polygon(center: Coordinate, radius_m: f64) -> Vec<Coordinate> {
    let angular = radius_m / (EARTH_RADIUS_KM * 1000.0);
    let (lat1, lng1) = (center.latitude().to_radians(), center.longitude().to_radians());

    let mut ring: Vec<Coordinate> = (0..CIRCLE_VERTICES)
        .map(|i| {
            let bearing = (i as f64 * 360.0 / CIRCLE_VERTICES as f64).to_radians();
            let lat2 = (lat1.sin() * angular.cos()
                + lat1.cos() * angular.sin() * bearing.cos())
            .asin();
            let lng2 = lng1
                + (bearing.sin() * angular.sin() * lat1.cos())
                    .atan2(angular.cos() - lat1.sin() * lat2.sin());
            let lng2 = (lng2.to_degrees() + 540.0) % 360.0 - 180.0;
            Coordinate::new_unchecked(lat2.to_degrees().clamp(-90.0, 90.0), lng2)
        })
        .collect();
    ring.push(ring[0]);
    ring
}
