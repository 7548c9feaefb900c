use crate::geo::BoundingBox;
use crate::spatial::geometry::{Geometry, PlanarGeometry, Polygon};
use crate::Point;

/// Forbidden regions plus the playable terrain, fixed for one planning run.
#[derive(Clone, Debug)]
pub struct ObstacleField<G: Geometry = PlanarGeometry> {
    obstacles: Vec<Polygon>,
    terrain: Polygon,
    geometry: G,
}

impl ObstacleField<PlanarGeometry> {
    /// Without an explicit terrain the playable area is the whole of `bounds`.
    pub fn new(obstacles: Vec<Polygon>, terrain: Option<Polygon>, bounds: &BoundingBox) -> Self {
        ObstacleField::with_geometry(obstacles, terrain, bounds, PlanarGeometry)
    }
}

impl<G: Geometry> ObstacleField<G> {
    pub fn with_geometry(
        obstacles: Vec<Polygon>,
        terrain: Option<Polygon>,
        bounds: &BoundingBox,
        geometry: G,
    ) -> Self {
        let terrain = terrain.unwrap_or_else(|| Polygon::rectangle(bounds));
        ObstacleField {
            obstacles,
            terrain,
            geometry,
        }
    }

    /// A shot from `a` to `b` is illegal if it passes through any obstacle or
    /// leaves the terrain.
    pub fn is_blocked(&self, a: Point, b: Point) -> bool {
        // Evaluate in a fixed endpoint order so the answer is symmetric bit for bit.
        let (a, b) = if (a.lat, a.lon) <= (b.lat, b.lon) {
            (a, b)
        } else {
            (b, a)
        };
        let hits_obstacle = self
            .obstacles
            .iter()
            .any(|obstacle| self.geometry.segment_intersects_polygon(a, b, obstacle));
        let leaves_terrain = !self.geometry.polygon_contains_segment(&self.terrain, a, b);
        hits_obstacle || leaves_terrain
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn terrain(&self) -> &Polygon {
        &self.terrain
    }
}
