pub mod clubs;
pub mod course;
pub mod data;
pub mod geo;
pub mod graph;
pub mod grid;
pub mod planner;
pub mod spatial;

use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
///
/// Equality is exact on both coordinates; two points are the same graph node
/// only when they compare equal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Point { lat, lon }
    }

    /// Great-circle distance in meters.
    pub fn distance(&self, other: &Point) -> f64 {
        geo::metric::distance(*self, *other)
    }

    /// Hashable identity that agrees with `==` (signed zeros collapse).
    pub fn key(&self) -> (u64, u64) {
        (normalize_zero(self.lat).to_bits(), normalize_zero(self.lon).to_bits())
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lon): (f64, f64)) -> Self {
        Point { lat, lon }
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn signed_zero_shares_identity() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(-0.0, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn distinct_points_have_distinct_keys() {
        assert_ne!(Point::new(1.0, 2.0).key(), Point::new(2.0, 1.0).key());
    }
}
