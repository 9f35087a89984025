use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Mean Earth radius in meters.
const EARTH_RADIUS: f64 = 6_371_000.0;

/// A WGS-84 point on the globe.
///
/// Latitude and longitude are kept as `f64` so that the projected map is
/// reproducible to the last bit across the two phases.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Self {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl Coordinate {
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine great-circle distance in meters.
    pub fn great_circle_distance(&self, other: &Self) -> f64 {
        let dist_lat = (other.latitude - self.latitude).to_radians();
        let dist_lon = (other.longitude - self.longitude).to_radians();
        let a = (dist_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (dist_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS * c
    }
}

#[test]
fn paris_to_london() {
    let coord_a = Coordinate {
        latitude: 48.858_01,
        longitude: 2.351_435,
    };
    let coord_b = Coordinate {
        latitude: 51.505_238,
        longitude: -0.124_954,
    };
    let d = coord_a.great_circle_distance(&coord_b);
    assert!((d - 343_000.0).abs() < 2_000.0);
}

#[test]
fn zero_distance() {
    let coord = Coordinate {
        latitude: 55.6,
        longitude: 37.6,
    };
    assert_eq!(coord.great_circle_distance(&coord), 0.0);
}

#[test]
fn coordinate_domains() {
    assert!(Coordinate::from((90.0, -180.0)).is_valid());
    assert!(!Coordinate::from((90.5, 0.0)).is_valid());
    assert!(!Coordinate::from((0.0, 181.0)).is_valid());
}
