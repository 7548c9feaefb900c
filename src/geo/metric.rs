use crate::Point;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points, using the haversine formula.
pub fn distance(a: Point, b: Point) -> f64 {
    if a == b {
        return 0.0;
    }
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1].
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Lower bound on `distance` from the latitude difference alone.
///
/// `distance(a, b) >= R * |dphi|` always holds because the haversine term is at
/// least `sin^2(dphi / 2)`.
pub fn latitude_lower_bound(lat_a: f64, lat_b: f64) -> f64 {
    EARTH_RADIUS_M * (lat_b - lat_a).to_radians().abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((d - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn symmetric_and_zero_on_identity() {
        let tee = Point::new(48.90891343931512, 1.9938896367494228);
        let hole = Point::new(48.90665014147519, 1.991794617313395);
        assert_eq!(distance(tee, hole), distance(hole, tee));
        assert_eq!(distance(tee, tee), 0.0);
        assert!(distance(tee, hole) > 0.0);
    }

    #[test]
    fn bethemont_tee_to_hole() {
        let tee = Point::new(48.90891343931512, 1.9938896367494228);
        let hole = Point::new(48.90665014147519, 1.991794617313395);
        // Roughly a par-4 hole.
        assert_approx_eq!(distance(tee, hole), 294.59, 0.05);
    }

    #[test]
    fn latitude_bound_never_exceeds_distance() {
        let pairs = [
            (Point::new(10.0, 20.0), Point::new(10.5, 21.0)),
            (Point::new(-33.0, 151.0), Point::new(-33.001, 150.0)),
            (Point::new(89.0, 0.0), Point::new(88.0, 180.0)),
        ];
        for (a, b) in pairs {
            assert!(latitude_lower_bound(a.lat, b.lat) <= distance(a, b) + 1e-6);
        }
    }
}
