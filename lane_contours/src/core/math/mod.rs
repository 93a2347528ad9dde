//! Core/common math functions for working with angles, 2D space, intersections, etc.
mod base_math;
mod circle_circle_intersect;
mod fresnel;
mod line_line_intersect;
mod pose;
mod vector2;

pub use base_math::*;
pub use circle_circle_intersect::{circle_circle_intr, CircleCircleIntr};
pub use fresnel::fresnel;
pub use line_line_intersect::{line_line_intr, LineLineIntr};
pub use pose::Pose;
pub use vector2::{vec2, Vector2};
