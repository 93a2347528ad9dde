//! Simple polygons, the polygon intersection predicate, and a quadtree over polygon references.
mod grid_index;
mod polygon;

pub use grid_index::GridIndex;
pub use polygon::{PointLocation, Polygon};
