pub mod metric;
pub mod tiles;

use serde::{Deserialize, Serialize};

use crate::Point;

/// Axis-aligned latitude/longitude rectangle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        BoundingBox {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Corners in counter-clockwise order starting at the south-west corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.lat_min, self.lon_min),
            Point::new(self.lat_min, self.lon_max),
            Point::new(self.lat_max, self.lon_max),
            Point::new(self.lat_max, self.lon_min),
        ]
    }

    pub fn contains(&self, p: Point) -> bool {
        p.lat >= self.lat_min && p.lat <= self.lat_max && p.lon >= self.lon_min && p.lon <= self.lon_max
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Maps a point to pixel coordinates of an image spanning this box.
    ///
    /// North is up, so the y axis runs from `lat_max` (row 0) down to `lat_min`.
    pub fn to_pixel(&self, p: Point, width: u32, height: u32) -> (i64, i64) {
        let fy = (p.lat - self.lat_min) / (self.lat_max - self.lat_min);
        let fx = (p.lon - self.lon_min) / (self.lon_max - self.lon_min);
        let x = fx * width as f64;
        let y = (1.0 - fy) * height as f64;
        (x as i64, y as i64)
    }
}
