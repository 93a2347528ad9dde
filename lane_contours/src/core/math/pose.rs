use super::Vector2;
use crate::core::traits::Real;

/// A position with a heading.
///
/// `direction` is in radians, counter clockwise from the +x axis.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Pose<T = f64> {
    pub point: Vector2<T>,
    pub direction: T,
}

impl<T> Pose<T>
where
    T: Real,
{
    #[inline]
    pub fn new(x: T, y: T, direction: T) -> Self {
        Pose {
            point: Vector2::new(x, y),
            direction,
        }
    }

    #[inline]
    pub fn from_point(point: Vector2<T>, direction: T) -> Self {
        Pose { point, direction }
    }

    /// Unit vector in the heading direction.
    #[inline]
    pub fn tangent(&self) -> Vector2<T> {
        Vector2::from_angle(self.direction)
    }

    /// Unit vector pointing to the left of the heading.
    #[inline]
    pub fn normal(&self) -> Vector2<T> {
        self.tangent().perp()
    }

    /// Map a point given in this pose's local frame (x forward, y left) to world coordinates.
    #[inline]
    pub fn to_world(&self, local: Vector2<T>) -> Vector2<T> {
        self.point + local.rotate(self.direction)
    }

    /// Point displaced sideways by `offset` (positive to the left).
    #[inline]
    pub fn lateral(&self, offset: T) -> Vector2<T> {
        self.point + self.normal().scale(offset)
    }

    pub fn fuzzy_eq_eps(&self, other: &Self, fuzzy_epsilon: T) -> bool {
        self.point.fuzzy_eq_eps(other.point, fuzzy_epsilon)
            && super::delta_angle(self.direction, other.direction).fuzzy_eq_zero_eps(fuzzy_epsilon)
    }
}

impl<T: Real> std::fmt::Display for Pose<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} @ {} rad]", self.point, self.direction)
    }
}
