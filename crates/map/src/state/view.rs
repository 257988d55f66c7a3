use geo::{BoundingRect, LineString};
use terezinha_transit::Coordinate;

/// Padding kept around a fitted route, in screen pixels.
pub const ROUTE_PADDING_PX: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every point, `None` for an empty path.
    pub fn of_path(path: &[Coordinate]) -> Option<Self> {
        let line: LineString<f64> = path
            .iter()
            .map(|c| (c.longitude(), c.latitude()))
            .collect::<Vec<_>>()
            .into();
        let rect = line.bounding_rect()?;

        Some(Self {
            south_west: Coordinate::new_unchecked(rect.min().y, rect.min().x),
            north_east: Coordinate::new_unchecked(rect.max().y, rect.max().x),
        })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new_unchecked(
            (self.south_west.latitude() + self.north_east.latitude()) / 2.0,
            (self.south_west.longitude() + self.north_east.longitude()) / 2.0,
        )
    }
}

/// What the map view should show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Viewport {
    Centered { center: Coordinate, zoom: u8 },
    Fitted { bounds: Bounds, padding_px: u32 },
}

impl Viewport {
    /// Fit a route path with the standard padding.
    pub fn fit_path(path: &[Coordinate]) -> Option<Self> {
        Bounds::of_path(path).map(|bounds| Viewport::Fitted {
            bounds,
            padding_px: ROUTE_PADDING_PX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_bounds_of_path() {
        let path = [c(-27.0233, -50.9185), c(-27.0190, -50.9400), c(-27.0250, -50.9200)];
        let bounds = Bounds::of_path(&path).unwrap();

        assert_eq!(bounds.south_west, c(-27.0250, -50.9400));
        assert_eq!(bounds.north_east, c(-27.0190, -50.9185));
        let center = bounds.center();
        assert_relative_eq!(center.latitude(), -27.0220, epsilon = 1e-9);
        assert_relative_eq!(center.longitude(), -50.92925, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_empty_path() {
        assert_eq!(Viewport::fit_path(&[]), None);
    }

    #[test]
    fn test_fit_uses_route_padding() {
        let Some(Viewport::Fitted { padding_px, bounds }) =
            Viewport::fit_path(&[c(1.0, 1.0), c(3.0, 5.0)])
        else {
            panic!("expected a fitted view");
        };
        assert_eq!(padding_px, 20);
        assert_eq!(bounds.center(), c(2.0, 3.0));
    }
}
