pub mod graph;
pub mod pathfinder;
pub mod visibility;
