//! One planning run: lattice, visibility graph, shortest route, club choice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clubs::catalog::Catalog;
use crate::clubs::selector::{self, PlannedSegment};
use crate::geo::BoundingBox;
use crate::graph::pathfinder::{self, NoPathFound};
use crate::graph::visibility::VisibilityGraphBuilder;
use crate::grid::lattice::{self, GridError};
use crate::spatial::geometry::Polygon;
use crate::spatial::obstacle_field::ObstacleField;
use crate::Point;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
}

/// Everything needed to plan one hole.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
    pub tee: Point,
    pub hole: Point,
    pub bounds: BoundingBox,
    /// Lattice spacing in degrees.
    pub spacing: f64,
    #[serde(default)]
    pub obstacles: Vec<Polygon>,
    /// Playable area; the whole of `bounds` when absent.
    #[serde(default)]
    pub terrain: Option<Polygon>,
    pub catalog: Catalog,
}

/// Route from tee to hole with a club per shot. Empty when no route exists.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ShotPlan {
    pub path: Vec<Point>,
    pub segments: Vec<PlannedSegment>,
}

impl ShotPlan {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn shot_count(&self) -> usize {
        self.segments.len()
    }

    pub fn total_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// The route in pixel coordinates of a `width` x `height` image of `bounds`.
    pub fn pixel_path(&self, bounds: &BoundingBox, width: u32, height: u32) -> Vec<(i64, i64)> {
        self.path
            .iter()
            .map(|&p| bounds.to_pixel(p, width, height))
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct ShotPlanner {
    parallel: bool,
}

impl Default for ShotPlanner {
    fn default() -> Self {
        ShotPlanner { parallel: true }
    }
}

impl ShotPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Grid problems are errors; an unreachable hole is an empty plan.
    pub fn plan(&self, course: &Course) -> Result<ShotPlan, PlanError> {
        let mut nodes = lattice::generate(&course.bounds, course.spacing)?;
        lattice::ensure_included(&mut nodes, &[course.tee, course.hole]);

        let field = ObstacleField::new(
            course.obstacles.clone(),
            course.terrain.clone(),
            &course.bounds,
        );
        let max_range = course.catalog.max_range();
        log::info!(
            "Planning over {} nodes, {} obstacles, max range {:.1} m",
            nodes.len(),
            field.obstacle_count(),
            max_range
        );

        let graph = VisibilityGraphBuilder::new(&field, max_range)
            .parallel(self.parallel)
            .build(&nodes);

        let steps = match pathfinder::shortest_path_between(&graph, course.tee, course.hole) {
            Ok(steps) => steps,
            Err(NoPathFound) => {
                log::warn!("No path found from tee to hole");
                return Ok(ShotPlan::default());
            }
        };

        // Indices come from the graph the search ran on.
        let path: Vec<Point> = steps
            .iter()
            .map(|step| graph.nodes[step.node_index])
            .collect();
        let segments = selector::assign(&path, &course.catalog);
        log::info!(
            "Planned {} shots over {:.1} m",
            segments.len(),
            steps.last().map(|s| s.cost).unwrap_or(0.0)
        );
        Ok(ShotPlan { path, segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_course() -> Course {
        Course {
            tee: Point::new(0.0, 0.0),
            hole: Point::new(0.0025, 0.0),
            bounds: BoundingBox::new(0.0, 0.003, -0.001, 0.001),
            spacing: 0.0005,
            obstacles: Vec::new(),
            terrain: None,
            catalog: Catalog::bethemont(),
        }
    }

    #[test]
    fn open_fairway_takes_the_straight_line() {
        // About 278 m, beyond the driver, so at least two shots.
        let plan = ShotPlanner::new().plan(&open_course()).expect("plan");
        assert!(plan.found());
        assert_eq!(plan.path.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(plan.path.last(), Some(&Point::new(0.0025, 0.0)));
        assert_eq!(plan.shot_count(), plan.path.len() - 1);
        assert!(plan.shot_count() >= 2);
        assert!((plan.total_distance() - 277.99).abs() < 0.1);
        assert!(plan.segments.iter().all(|s| s.length <= 190.0));
    }

    #[test]
    fn route_maps_onto_the_course_image() {
        let course = open_course();
        let plan = ShotPlanner::new().plan(&course).expect("plan");
        let pixels = plan.pixel_path(&course.bounds, 200, 300);
        assert_eq!(pixels.len(), plan.path.len());
        // Tee on the south edge, hole a sixth of the way down, both centered.
        assert_eq!(pixels.first(), Some(&(100, 300)));
        let (x, y) = pixels[pixels.len() - 1];
        assert_eq!(x, 100);
        assert!((49..=50).contains(&y));
        assert!(ShotPlan::default().pixel_path(&course.bounds, 200, 300).is_empty());
    }

    #[test]
    fn unreachable_hole_is_an_empty_plan() {
        let mut course = open_course();
        // Fence right across the course.
        course.obstacles = vec![Polygon::new(vec![
            Point::new(0.0012, -0.002),
            Point::new(0.0012, 0.002),
            Point::new(0.0013, 0.002),
            Point::new(0.0013, -0.002),
        ])
        .expect("fence")];
        let plan = ShotPlanner::new().plan(&course).expect("plan");
        assert!(!plan.found());
        assert!(plan.segments.is_empty());
        assert_eq!(plan.total_distance(), 0.0);
    }

    #[test]
    fn bad_spacing_is_an_error() {
        let mut course = open_course();
        course.spacing = 0.0;
        assert_eq!(
            ShotPlanner::new().plan(&course),
            Err(PlanError::InvalidGrid(GridError::InvalidSpacing(0.0)))
        );
    }
}
