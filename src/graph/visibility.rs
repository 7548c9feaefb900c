use std::cmp::Ordering;

use rayon::prelude::*;

use crate::geo::metric::{distance, latitude_lower_bound};
use crate::graph::graph::{ShotGraph, WeightedGraph};
use crate::spatial::geometry::Geometry;
use crate::spatial::obstacle_field::ObstacleField;
use crate::Point;

/// Node count above which the parallel scan is worth the thread pool.
pub const PARALLEL_THRESHOLD: usize = 64;

/// Relative padding on the latitude cut-off so rounding in the bound never
/// drops a pair the exact distance check would keep.
const PRUNE_PADDING: f64 = 1e-9;

/// Connects every pair of nodes that is within range and not blocked.
pub struct VisibilityGraphBuilder<'a, G: Geometry> {
    field: &'a ObstacleField<G>,
    max_range: f64,
    parallel: bool,
}

impl<'a, G: Geometry> VisibilityGraphBuilder<'a, G> {
    pub fn new(field: &'a ObstacleField<G>, max_range: f64) -> Self {
        VisibilityGraphBuilder {
            field,
            max_range,
            parallel: true,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the graph for `points`. Duplicate points collapse onto one node.
    ///
    /// Pairs are pruned with a latitude sweep: no pair whose latitude gap alone
    /// exceeds the range can be within range, so the edge set is exactly what a
    /// full pairwise scan would produce.
    pub fn build(&self, points: &[Point]) -> ShotGraph {
        let mut graph = ShotGraph::with_nodes(points);
        if graph.len() < 2 || !self.max_range.is_finite() || self.max_range <= 0.0 {
            return graph;
        }

        let mut order: Vec<usize> = (0..graph.len()).collect();
        order.sort_by(|&a, &b| {
            graph.nodes[a]
                .lat
                .partial_cmp(&graph.nodes[b].lat)
                .unwrap_or(Ordering::Equal)
        });

        let cutoff = self.max_range * (1.0 + PRUNE_PADDING);
        let scan = |pos: usize| -> Vec<(usize, usize, f64)> {
            let a = order[pos];
            let pa = graph.nodes[a];
            let mut found = Vec::new();
            for &b in &order[pos + 1..] {
                let pb = graph.nodes[b];
                if latitude_lower_bound(pa.lat, pb.lat) > cutoff {
                    break;
                }
                let d = distance(pa, pb);
                if d <= self.max_range && !self.field.is_blocked(pa, pb) {
                    found.push((a, b, d));
                }
            }
            found
        };

        let edges: Vec<(usize, usize, f64)> = if self.parallel && graph.len() > PARALLEL_THRESHOLD {
            (0..order.len()).into_par_iter().flat_map_iter(scan).collect()
        } else {
            (0..order.len()).flat_map(scan).collect()
        };

        for (a, b, d) in edges {
            graph.add_edge(a, b, d);
        }

        log::debug!(
            "Visibility graph: {} nodes, {} edges (max range {:.1} m)",
            graph.len(),
            graph.edge_count(),
            self.max_range
        );
        graph
    }
}
