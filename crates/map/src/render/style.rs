use std::str::FromStr;

use palette::{Srgb, Srgba, WithAlpha};
use terezinha_core::MapProvider;
use terezinha_transit::Stop;

/// Stroke and fill of one drawn layer.
///
/// The stroke alpha is the line opacity; `fill` is `None` for bare lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub stroke: Srgba<f32>,
    /// Stroke width in screen pixels
    pub weight: f32,
    pub fill: Option<Srgba<f32>>,
}

impl Style {
    pub fn transparent() -> Self {
        Self {
            stroke: Srgba::new(0.0, 0.0, 0.0, 0.0),
            weight: 0.0,
            fill: None,
        }
    }

    pub fn solid_color(fill_color: Srgba<f32>) -> Self {
        Self {
            fill: Some(fill_color),
            ..Self::transparent()
        }
    }

    pub fn line(color: Srgba<f32>, weight: f32) -> Self {
        Self {
            stroke: color,
            weight,
            fill: None,
        }
    }

    pub fn with_border(mut self, weight: f32, color: Srgba<f32>) -> Self {
        self.stroke = color;
        self.weight = weight;
        self
    }

    pub fn stroke_hex(&self) -> String {
        hex(self.stroke)
    }

    pub fn fill_hex(&self) -> Option<String> {
        self.fill.map(hex)
    }
}

/// `#rrggbb`, alpha dropped.
pub fn hex(color: Srgba<f32>) -> String {
    let rgb: Srgb<u8> = color.color.into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Parse a `#rrggbb` tag into an opaque colour.
pub fn parse_hex(tag: &str) -> Option<Srgba<f32>> {
    let rgb = Srgb::<u8>::from_str(tag.trim()).ok()?;
    Some(rgb.into_format::<f32>().with_alpha(1.0))
}

fn rgb(tag: u32, alpha: f32) -> Srgba<f32> {
    let [_, r, g, b] = tag.to_be_bytes();
    Srgb::new(r, g, b).into_format::<f32>().with_alpha(alpha)
}

/// Colours and weights for one backing map provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub route: Style,
    pub proximity: Style,
    pub origin: Style,
    pub route_start: Style,
    pub route_end: Style,
    /// Used when a stop's colour tag does not parse
    pub stop_fallback: Srgba<f32>,
}

impl Theme {
    pub fn for_provider(provider: MapProvider) -> Self {
        match provider {
            MapProvider::Primary => Self::primary(),
            MapProvider::OpenData => Self::open_data(),
        }
    }

    pub fn open_data() -> Self {
        let white = rgb(0xffffff, 1.0);
        let circle = rgb(0x8b2323, 1.0);

        Self {
            route: Style::line(rgb(0x3b82f6, 0.8), 5.0),
            proximity: Style::solid_color(circle.color.with_alpha(0.1)).with_border(3.0, circle),
            origin: Style::solid_color(rgb(0x3b82f6, 1.0)).with_border(3.0, white),
            route_start: Style::solid_color(rgb(0x10b981, 1.0)).with_border(3.0, white),
            route_end: Style::solid_color(rgb(0xef4444, 1.0)).with_border(3.0, white),
            stop_fallback: rgb(0x6b7280, 1.0),
        }
    }

    pub fn primary() -> Self {
        let brand = rgb(0x8b2323, 0.8);

        Self {
            route: Style::line(brand, 4.0),
            proximity: Style::solid_color(brand.color.with_alpha(0.1)).with_border(2.0, brand),
            ..Self::open_data()
        }
    }

    pub fn stop_marker(&self, stop: &Stop) -> Style {
        let color = parse_hex(&stop.color_tag).unwrap_or(self.stop_fallback);
        Style::solid_color(color).with_border(2.0, rgb(0xffffff, 1.0))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::open_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terezinha_transit::{StopCatalog, StopProvider};

    #[test]
    fn test_hex_round_trip() {
        for tag in ["#3b82f6", "#8b2323", "#10b981", "#000000", "#ffffff"] {
            assert_eq!(hex(parse_hex(tag).unwrap()), tag);
        }
        assert!(parse_hex("blue").is_none());
    }

    #[test]
    fn test_provider_route_styles() {
        let open = Theme::open_data();
        assert_eq!(open.route.stroke_hex(), "#3b82f6");
        assert_relative_eq!(open.route.weight, 5.0);
        assert_relative_eq!(open.route.stroke.alpha, 0.8);

        let primary = Theme::for_provider(MapProvider::Primary);
        assert_eq!(primary.route.stroke_hex(), "#8b2323");
        assert_relative_eq!(primary.route.weight, 4.0);
        assert_eq!(primary.route_start, open.route_start);
    }

    #[test]
    fn test_proximity_fill_opacity() {
        let theme = Theme::open_data();
        let fill = theme.proximity.fill.unwrap();
        assert_eq!(hex(fill), "#8b2323");
        assert_relative_eq!(fill.alpha, 0.1);
    }

    #[test]
    fn test_stop_marker_uses_color_tag() {
        let theme = Theme::open_data();
        let catalog = StopCatalog::builtin().unwrap();

        let gruta = catalog.find_by_name("Gruta").unwrap();
        assert_eq!(theme.stop_marker(&gruta).fill_hex().as_deref(), Some("#3b82f6"));

        let mut odd = gruta.as_ref().clone();
        odd.color_tag = "teal".into();
        assert_eq!(theme.stop_marker(&odd).fill_hex().as_deref(), Some("#6b7280"));
    }
}
