//! Planar polygon predicates.
//!
//! Coordinates are used as-is, with latitude as the first axis and longitude as
//! the second. At course scale the distortion this introduces is far below the
//! accuracy of the traced obstacle outlines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::BoundingBox;
use crate::Point;

/// Absolute tolerance, in coordinate units, for "lies on the boundary".
const TOLERANCE: f64 = 1e-12;

/// Relative tolerance (sine of the angle) below which two directions are parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// Slack on segment parameters when collecting split points. Extra split points
/// only add pieces, they never change a classification.
const PARAM_SLACK: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// Closed ring of vertices. The closing edge from the last vertex back to the
/// first is implicit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(mut vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if let Some(idx) = vertices
            .iter()
            .position(|p| !p.lat.is_finite() || !p.lon.is_finite())
        {
            return Err(GeometryError::NonFiniteVertex(idx));
        }
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        Ok(Polygon { vertices })
    }

    pub fn rectangle(bounds: &BoundingBox) -> Self {
        Polygon {
            vertices: bounds.corners().to_vec(),
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeometryError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, Self::Error> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Where a point sits relative to a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// Polygon/segment predicates needed to decide whether a shot is legal.
pub trait Geometry: Send + Sync {
    fn locate(&self, p: Point, polygon: &Polygon) -> Location;

    /// True when `p` is inside the polygon or on its boundary.
    fn point_in_polygon(&self, p: Point, polygon: &Polygon) -> bool {
        self.locate(p, polygon) != Location::Outside
    }

    /// True when some stretch of the segment lies in the polygon's interior.
    /// Running along an edge or through a vertex does not count.
    fn segment_intersects_polygon(&self, a: Point, b: Point, polygon: &Polygon) -> bool;

    /// True when no stretch of the segment lies outside the polygon. The
    /// boundary counts as inside.
    fn polygon_contains_segment(&self, polygon: &Polygon, a: Point, b: Point) -> bool;
}

/// Exact-arithmetic-with-tolerance implementation on raw coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarGeometry;

impl Geometry for PlanarGeometry {
    fn locate(&self, p: Point, polygon: &Polygon) -> Location {
        if polygon.edges().any(|(a, b)| on_segment(p, a, b)) {
            return Location::Boundary;
        }

        // Ray casting along the latitude axis.
        let mut inside = false;
        for (a, b) in polygon.edges() {
            if (a.lon > p.lon) != (b.lon > p.lon)
                && p.lat < (b.lat - a.lat) * (p.lon - a.lon) / (b.lon - a.lon) + a.lat
            {
                inside = !inside;
            }
        }
        if inside {
            Location::Inside
        } else {
            Location::Outside
        }
    }

    fn segment_intersects_polygon(&self, a: Point, b: Point, polygon: &Polygon) -> bool {
        piece_locations(self, a, b, polygon).contains(&Location::Inside)
    }

    fn polygon_contains_segment(&self, polygon: &Polygon, a: Point, b: Point) -> bool {
        if self.locate(a, polygon) == Location::Outside
            || self.locate(b, polygon) == Location::Outside
        {
            return false;
        }
        !piece_locations(self, a, b, polygon).contains(&Location::Outside)
    }
}

/// Splits `a -> b` wherever it meets the polygon boundary and classifies the
/// midpoint of every piece. Each piece lies entirely on one side of the boundary.
fn piece_locations<G: Geometry + ?Sized>(
    geometry: &G,
    a: Point,
    b: Point,
    polygon: &Polygon,
) -> Vec<Location> {
    if a == b {
        return vec![geometry.locate(a, polygon)];
    }

    let params = split_parameters(a, b, polygon);
    params
        .windows(2)
        .filter(|w| w[1] - w[0] > TOLERANCE)
        .map(|w| geometry.locate(lerp(a, b, (w[0] + w[1]) / 2.0), polygon))
        .collect()
}

fn split_parameters(a: Point, b: Point, polygon: &Polygon) -> Vec<f64> {
    let d = sub(b, a);
    let d_len2 = dot(d, d);
    let d_len = d_len2.sqrt();

    let mut params = vec![0.0, 1.0];
    let mut push = |t: f64| {
        if (-PARAM_SLACK..=1.0 + PARAM_SLACK).contains(&t) {
            params.push(t.clamp(0.0, 1.0));
        }
    };

    for (c, e) in polygon.edges() {
        let f = sub(e, c);
        let f_len = dot(f, f).sqrt();
        let denom = cross(d, f);
        let ca = sub(c, a);

        if denom.abs() > PARALLEL_EPS * d_len * f_len {
            let t = cross(ca, f) / denom;
            let u = cross(ca, d) / denom;
            if (-PARAM_SLACK..=1.0 + PARAM_SLACK).contains(&u) {
                push(t);
            }
        } else if cross(ca, d).abs() / d_len <= TOLERANCE {
            // Collinear overlap: the edge endpoints bound the shared stretch.
            push(dot(ca, d) / d_len2);
            push(dot(sub(e, a), d) / d_len2);
        }
    }

    params.sort_by(f64::total_cmp);
    params.dedup_by(|x, y| (*x - *y).abs() <= TOLERANCE);
    params
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let d = sub(b, a);
    let len2 = dot(d, d);
    let ap = sub(p, a);
    if len2 == 0.0 {
        return dot(ap, ap).sqrt() <= TOLERANCE;
    }
    let len = len2.sqrt();
    if cross(d, ap).abs() / len > TOLERANCE {
        return false;
    }
    let s = dot(ap, d) / len2;
    let slack = TOLERANCE / len;
    (-slack..=1.0 + slack).contains(&s)
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.lat + (b.lat - a.lat) * t, a.lon + (b.lon - a.lon) * t)
}

fn sub(p: Point, q: Point) -> (f64, f64) {
    (p.lat - q.lat, p.lon - q.lon)
}

fn dot(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.0 + u.1 * v.1
}

fn cross(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.1 - u.1 * v.0
}
