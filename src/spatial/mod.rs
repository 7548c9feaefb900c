pub mod geometry;
pub mod obstacle_field;
