use crate::{
    core::{
        math::{Pose, Vector2},
        traits::FuzzyEq,
    },
    error::{GeometryError, Result},
};

use super::Curve;

/// Straight line segment starting at a pose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Straight {
    start: Pose,
    length: f64,
}

impl Straight {
    /// Straight of `length` (> 0) in the heading of `start`.
    pub fn new(start: Pose, length: f64) -> Result<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(GeometryError::invalid(format!(
                "straight length must be positive and finite, got {}",
                length
            )));
        }

        if !start.point.is_finite() || !start.direction.is_finite() {
            return Err(GeometryError::invalid("straight start pose is not finite"));
        }

        Ok(Straight { start, length })
    }

    /// Straight from `p0` to `p1`.
    pub fn between(p0: Vector2, p1: Vector2) -> Result<Self> {
        let v = p1 - p0;
        if v.length().fuzzy_eq_zero() {
            return Err(GeometryError::invalid(format!(
                "straight end points {} and {} coincide",
                p0, p1
            )));
        }
        Self::new(Pose::from_point(p0, v.angle()), v.length())
    }
}

impl Curve for Straight {
    fn start_pose(&self) -> Pose {
        self.start
    }

    fn end_pose(&self) -> Pose {
        Pose::from_point(self.point_at(1.0), self.start.direction)
    }

    fn start_curvature(&self) -> f64 {
        0.0
    }

    fn end_curvature(&self) -> f64 {
        0.0
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn point_at(&self, t: f64) -> Vector2 {
        self.start.point + self.start.tangent().scale(t * self.length)
    }

    fn direction_at(&self, _t: f64) -> f64 {
        self.start.direction
    }

    fn is_straight(&self) -> bool {
        true
    }
}
