use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::pathfinder::{self, NoPathFound, PathStep};
use crate::Point;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub to: usize,
    pub weight: f64,
}

/// Undirected weighted graph over candidate positions.
///
/// Every distinct point gets one index; adding a point that compares equal to
/// an existing node returns the existing index. Edges are stored on both
/// endpoints with the same weight and self-loops are never stored.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ShotGraph {
    pub nodes: Vec<Point>,
    /// adjacency[i] lists the edges leaving nodes[i]
    pub adjacency: Vec<Vec<Edge>>,
    #[serde(skip)]
    point_index: HashMap<(u64, u64), usize>,
}

/// Minimal graph capability the planner relies on.
pub trait WeightedGraph {
    fn add_node(&mut self, point: Point) -> usize;

    /// Returns false when the edge was refused (self-loop, unknown index or
    /// negative weight).
    fn add_edge(&mut self, a: usize, b: usize, weight: f64) -> bool;

    fn shortest_path(&self, source: usize, target: usize) -> Result<Vec<PathStep>, NoPathFound>;
}

impl ShotGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(points: &[Point]) -> Self {
        let mut graph = ShotGraph::new();
        for &p in points {
            graph.add_node(p);
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, point: Point) -> Option<usize> {
        self.point_index.get(&point.key()).copied()
    }

    pub fn neighbours(&self, idx: usize) -> &[Edge] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.neighbours(a)
            .iter()
            .find(|edge| edge.to == b)
            .map(|edge| edge.weight)
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Each undirected edge once, as `(lower index, higher index, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(from, edges)| {
            edges
                .iter()
                .filter(move |edge| edge.to > from)
                .map(move |edge| (from, edge.to, edge.weight))
        })
    }

    fn upsert_half_edge(&mut self, from: usize, to: usize, weight: f64) {
        let edges = &mut self.adjacency[from];
        match edges.iter_mut().find(|edge| edge.to == to) {
            Some(edge) => edge.weight = weight,
            None => edges.push(Edge { to, weight }),
        }
    }
}

impl WeightedGraph for ShotGraph {
    fn add_node(&mut self, point: Point) -> usize {
        if let Some(idx) = self.index_of(point) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(point);
        self.adjacency.push(Vec::new());
        self.point_index.insert(point.key(), idx);
        idx
    }

    fn add_edge(&mut self, a: usize, b: usize, weight: f64) -> bool {
        if a == b || a >= self.len() || b >= self.len() || weight.is_nan() || weight < 0.0 {
            return false;
        }
        self.upsert_half_edge(a, b, weight);
        self.upsert_half_edge(b, a, weight);
        true
    }

    fn shortest_path(&self, source: usize, target: usize) -> Result<Vec<PathStep>, NoPathFound> {
        pathfinder::shortest_path(self, source, target)
    }
}
