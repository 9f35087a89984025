use crate::render::svg::Point;
use crate::shared::geo::Coordinate;

/// Extents below this are treated as degenerate and contribute no zoom
/// candidate.
const COORDINATE_EPSILON: f64 = 1e-6;

/// A deterministic affine map from lat/lon to the render plane.
///
/// The zoom factor is fixed at construction from the bounding box of the
/// input points and the canvas dimensions, so identical inputs project
/// identically to the last bit — the property the snapshot round-trip
/// relies on.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProjector {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
}

impl ScreenProjector {
    pub fn new(points: &[Coordinate], width: f64, height: f64, padding: f64) -> Self {
        let mut projector = Self {
            padding,
            min_lon: 0.0,
            max_lat: 0.0,
            zoom: 0.0,
        };
        if points.is_empty() {
            return projector;
        }

        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        for point in points {
            min_lon = min_lon.min(point.longitude);
            max_lon = max_lon.max(point.longitude);
            min_lat = min_lat.min(point.latitude);
            max_lat = max_lat.max(point.latitude);
        }
        projector.min_lon = min_lon;
        projector.max_lat = max_lat;

        let width_zoom = if (max_lon - min_lon).abs() >= COORDINATE_EPSILON {
            Some((width - 2.0 * padding) / (max_lon - min_lon))
        } else {
            None
        };
        let height_zoom = if (max_lat - min_lat).abs() >= COORDINATE_EPSILON {
            Some((height - 2.0 * padding) / (max_lat - min_lat))
        } else {
            None
        };

        projector.zoom = match (width_zoom, height_zoom) {
            (Some(width_zoom), Some(height_zoom)) => width_zoom.min(height_zoom),
            (Some(width_zoom), None) => width_zoom,
            (None, Some(height_zoom)) => height_zoom,
            (None, None) => 0.0,
        };
        projector
    }

    pub fn project(&self, coordinate: Coordinate) -> Point {
        Point::new(
            (coordinate.longitude - self.min_lon) * self.zoom + self.padding,
            (self.max_lat - coordinate.latitude) * self.zoom + self.padding,
        )
    }
}
