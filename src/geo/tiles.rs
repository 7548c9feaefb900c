//! Web-Mercator tile arithmetic for the satellite imagery that backs a course.
//!
//! Only the geographic footprint of a stitched tile mosaic is computed here; the
//! tiles themselves are fetched elsewhere.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geo::BoundingBox;
use crate::Point;

/// Edge length of a single tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Tiles per side of the mosaic stitched around a course center.
pub const DEFAULT_MOSAIC_TILES: u32 = 8;

/// Deepest zoom level satellite imagery is served at.
pub const MAX_ZOOM: u8 = 23;

/// Tile column and row containing `(lat, lon)` at `zoom`.
pub fn tile_xy(lat: f64, lon: f64, zoom: u8) -> (i64, i64) {
    let tile_size = TILE_SIZE as f64;
    let num_tiles = 2f64.powi(i32::from(zoom));

    let point_x = (tile_size / 2.0 + lon * tile_size / 360.0) * num_tiles;
    let sin_y = lat.to_radians().sin();
    let point_y = (tile_size / 2.0
        + 0.5 * ((1.0 + sin_y) / (1.0 - sin_y)).ln() * -(tile_size / (2.0 * PI)))
        * num_tiles;

    (
        (point_x / tile_size).floor() as i64,
        (point_y / tile_size).floor() as i64,
    )
}

/// Latitude/longitude of the north-west corner of tile `(x, y)`.
pub fn tile_to_lat_lon(x: i64, y: i64, zoom: u8) -> Point {
    let n = 2f64.powi(i32::from(zoom));
    let lon = x as f64 / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees();
    Point::new(lat, lon)
}

/// Geographic corners of a stitched image.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl ImageCorners {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.bottom_left.lat,
            self.top_right.lat,
            self.bottom_left.lon,
            self.top_right.lon,
        )
    }
}

/// Corners of a `tiles_wide` x `tiles_high` mosaic centered on the tile holding `center`.
pub fn image_corners(center: Point, zoom: u8, tiles_wide: u32, tiles_high: u32) -> ImageCorners {
    let (x, y) = tile_xy(center.lat, center.lon, zoom);
    let half_w = (tiles_wide / 2) as i64;
    let half_h = (tiles_high / 2) as i64;
    ImageCorners {
        top_left: tile_to_lat_lon(x - half_w, y - half_h, zoom),
        top_right: tile_to_lat_lon(x + half_w, y - half_h, zoom),
        bottom_left: tile_to_lat_lon(x - half_w, y + half_h, zoom),
        bottom_right: tile_to_lat_lon(x + half_w, y + half_h, zoom),
    }
}

/// Pixel dimensions of a mosaic.
pub fn image_size(tiles_wide: u32, tiles_high: u32) -> (u32, u32) {
    (TILE_SIZE * tiles_wide, TILE_SIZE * tiles_high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn zoom_zero_has_a_single_tile() {
        assert_eq!(tile_xy(0.0, 0.0, 0), (0, 0));
        let nw = tile_to_lat_lon(0, 0, 0);
        assert_approx_eq!(nw.lon, -180.0, 1e-9);
        assert_approx_eq!(nw.lat, 85.0511287798, 1e-6);
    }

    #[test]
    fn deep_zoom_stays_finite() {
        let (x, y) = tile_xy(48.9, 1.99, u8::MAX);
        assert!(x > 0 && y > 0);
        let (x, _) = tile_xy(48.9, 1.99, MAX_ZOOM);
        assert_eq!(x, 4_240_674);
    }

    #[test]
    fn tile_round_trip_contains_point() {
        let p = Point::new(48.9078, 1.9928);
        let (x, y) = tile_xy(p.lat, p.lon, 19);
        let nw = tile_to_lat_lon(x, y, 19);
        let se = tile_to_lat_lon(x + 1, y + 1, 19);
        assert!(p.lat <= nw.lat && p.lat >= se.lat);
        assert!(p.lon >= nw.lon && p.lon <= se.lon);
    }

    #[test]
    fn mosaic_bounds_surround_center() {
        let center = Point::new(43.4604, -1.5738);
        let corners = image_corners(center, 19, DEFAULT_MOSAIC_TILES, DEFAULT_MOSAIC_TILES);
        let bounds = corners.bounds();
        assert!(bounds.lat_min < bounds.lat_max);
        assert!(bounds.lon_min < bounds.lon_max);
        assert!(bounds.contains(center));
        assert_eq!(corners.top_left.lat, corners.top_right.lat);
        assert_eq!(corners.bottom_left.lon, corners.top_left.lon);
        assert_eq!(image_size(8, 8), (2048, 2048));
    }
}
