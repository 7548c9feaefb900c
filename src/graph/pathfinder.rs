use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::graph::graph::ShotGraph;
use crate::Point;

/// No route between the requested nodes. Callers report this as "no
/// recommendation" rather than failing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("no path found")]
pub struct NoPathFound;

#[derive(Clone, Debug, PartialEq)]
pub struct PathStep {
    pub node_index: usize,
    /// Total weight from the source up to and including this step.
    pub cost: f64,
}

#[derive(Copy, Clone, Debug)]
struct Frontier {
    idx: usize,
    cost: f64,
}

impl Eq for Frontier {}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for Frontier {
    // Reversed so the max-heap pops the cheapest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over the shot graph. Edge weights are non-negative by construction.
///
/// Which of several equally short paths is returned is unspecified.
pub fn shortest_path(
    graph: &ShotGraph,
    source: usize,
    target: usize,
) -> Result<Vec<PathStep>, NoPathFound> {
    if source >= graph.len() || target >= graph.len() {
        return Err(NoPathFound);
    }
    if source == target {
        return Ok(vec![PathStep {
            node_index: source,
            cost: 0.0,
        }]);
    }

    let mut dist = vec![f64::INFINITY; graph.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; graph.len()];
    let mut open = BinaryHeap::new();

    dist[source] = 0.0;
    open.push(Frontier {
        idx: source,
        cost: 0.0,
    });

    while let Some(Frontier { idx: current, cost }) = open.pop() {
        if current == target {
            return Ok(reconstruct_path(&came_from, &dist, current));
        }
        if cost > dist[current] {
            continue; // stale entry
        }

        for edge in graph.neighbours(current) {
            let tentative = cost + edge.weight;
            if tentative < dist[edge.to] {
                dist[edge.to] = tentative;
                came_from[edge.to] = Some(current);
                open.push(Frontier {
                    idx: edge.to,
                    cost: tentative,
                });
            }
        }
    }

    Err(NoPathFound)
}

/// Resolves both points to nodes first. A point that is not in the graph means
/// there is no path.
pub fn shortest_path_between(
    graph: &ShotGraph,
    source: Point,
    target: Point,
) -> Result<Vec<PathStep>, NoPathFound> {
    let source = graph.index_of(source).ok_or(NoPathFound)?;
    let target = graph.index_of(target).ok_or(NoPathFound)?;
    shortest_path(graph, source, target)
}

fn reconstruct_path(came_from: &[Option<usize>], dist: &[f64], mut current: usize) -> Vec<PathStep> {
    let mut total_path = vec![current];
    while let Some(prev) = came_from[current] {
        current = prev;
        total_path.push(current);
    }
    total_path.reverse();

    total_path
        .into_iter()
        .map(|idx| PathStep {
            node_index: idx,
            cost: dist[idx],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph::WeightedGraph;

    fn chain_with_shortcut() -> ShotGraph {
        let mut graph = ShotGraph::with_nodes(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 2.0),
        ]);
        graph.add_edge(0, 1, 3.0);
        graph.add_edge(1, 2, 4.0);
        graph.add_edge(0, 2, 10.0);
        graph
    }

    #[test]
    fn prefers_cheaper_two_hop_route() {
        let graph = chain_with_shortcut();
        let path = shortest_path(&graph, 0, 2).expect("path");
        let ids: Vec<usize> = path.iter().map(|p| p.node_index).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(path.iter().map(|p| p.cost).collect::<Vec<_>>(), vec![0.0, 3.0, 7.0]);
    }

    #[test]
    fn isolated_target_has_no_path() {
        let mut graph = chain_with_shortcut();
        let lonely = graph.add_node(Point::new(5.0, 5.0));
        assert_eq!(shortest_path(&graph, 0, lonely), Err(NoPathFound));
    }

    #[test]
    fn unknown_nodes_have_no_path() {
        let graph = chain_with_shortcut();
        assert_eq!(shortest_path(&graph, 0, 99), Err(NoPathFound));
        assert_eq!(
            shortest_path_between(&graph, Point::new(0.0, 0.0), Point::new(9.0, 9.0)),
            Err(NoPathFound)
        );
    }

    #[test]
    fn source_equals_target() {
        let graph = chain_with_shortcut();
        let path = shortest_path(&graph, 1, 1).expect("path");
        assert_eq!(path, vec![PathStep { node_index: 1, cost: 0.0 }]);
    }

    #[test]
    fn equal_cost_routes_report_optimal_cost() {
        // Square: two routes of cost 2 from 0 to 2.
        let mut graph = ShotGraph::with_nodes(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        graph.add_edge(2, 3, 1.0);
        graph.add_edge(3, 0, 1.0);
        let path = graph.shortest_path(0, 2).expect("path");
        assert_eq!(path.len(), 3);
        assert_eq!(path.last().map(|s| s.cost), Some(2.0));
    }
}
