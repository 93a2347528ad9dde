use std::f64::consts::FRAC_PI_2;

use crate::{
    core::math::{Pose, Vector2},
    error::{GeometryError, Result},
};

use super::{Curve, Side};

/// Circular arc starting at a pose, turning to `side` by `angle` radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Arc {
    start: Pose,
    radius: f64,
    side: Side,
    angle: f64,
}

impl Arc {
    /// Arc with `radius` (> 0) turning by `angle` (>= 0) radians.
    ///
    /// A zero angle is accepted and yields a zero length arc which cannot be flattened.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lane_contours::core::math::Pose;
    /// # use lane_contours::curve::{Arc, Curve, Side};
    /// let arc = Arc::new(Pose::new(0.0, 0.0, 0.0), 10.0, Side::Left, std::f64::consts::PI).unwrap();
    /// let end = arc.end_pose().point;
    /// assert!((end.x - 0.0).abs() < 1e-12 && (end.y - 20.0).abs() < 1e-12);
    /// assert_eq!(arc.start_curvature(), 0.1);
    /// ```
    pub fn new(start: Pose, radius: f64, side: Side, angle: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::invalid(format!(
                "arc radius must be positive and finite, got {}",
                radius
            )));
        }

        if !(angle.is_finite() && angle >= 0.0) {
            return Err(GeometryError::invalid(format!(
                "arc angle must be non-negative and finite, got {}",
                angle
            )));
        }

        if !start.point.is_finite() || !start.direction.is_finite() {
            return Err(GeometryError::invalid("arc start pose is not finite"));
        }

        Ok(Arc {
            start,
            radius,
            side,
            angle,
        })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Total turn in radians (unsigned).
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn center(&self) -> Vector2 {
        self.start.lateral(self.side.sign() * self.radius)
    }

    /// Same arc turning to the other side.
    pub fn mirrored(&self) -> Arc {
        Arc {
            side: self.side.opposite(),
            ..*self
        }
    }
}

impl Curve for Arc {
    fn start_pose(&self) -> Pose {
        self.start
    }

    fn end_pose(&self) -> Pose {
        self.pose_at(1.0)
    }

    fn start_curvature(&self) -> f64 {
        self.side.sign() / self.radius
    }

    fn end_curvature(&self) -> f64 {
        self.start_curvature()
    }

    fn length(&self) -> f64 {
        self.radius * self.angle
    }

    fn point_at(&self, t: f64) -> Vector2 {
        let phi = self.angle * t;
        let half_sin = (0.5 * phi).sin();
        // 1 - cos(phi) written as 2 sin^2(phi / 2) to keep precision for small angles
        let local = Vector2::new(
            self.radius * phi.sin(),
            self.side.sign() * 2.0 * self.radius * half_sin * half_sin,
        );
        self.start.to_world(local)
    }

    fn direction_at(&self, t: f64) -> f64 {
        self.start.direction + self.side.sign() * self.angle * t
    }

    fn breakpoints(&self) -> Vec<f64> {
        let pieces = (self.angle / FRAC_PI_2).ceil().max(1.0) as usize;
        (0..=pieces).map(|i| i as f64 / pieces as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use std::f64::consts::PI;

    #[test]
    fn right_arc_quarter_circle() {
        let arc = Arc::new(Pose::new(1.0, 1.0, 0.0), 5.0, Side::Right, PI / 2.0).unwrap();
        let end = arc.end_pose();
        assert!(end.point.fuzzy_eq(Vector2::new(6.0, -4.0)));
        assert!(end.direction.fuzzy_eq(-PI / 2.0));
        assert!(arc.center().fuzzy_eq(Vector2::new(1.0, -4.0)));
        assert!(arc.end_radius().fuzzy_eq(-5.0));
        assert!(arc.length().fuzzy_eq(5.0 * PI / 2.0));
    }

    #[test]
    fn breakpoints_limit_quarter_turns() {
        let arc = Arc::new(Pose::default(), 1.0, Side::Left, 1.5 * PI).unwrap();
        assert_eq!(arc.breakpoints().len(), 4);
        let small = Arc::new(Pose::default(), 1.0, Side::Left, 0.1).unwrap();
        assert_eq!(small.breakpoints(), vec![0.0, 1.0]);
    }

    #[test]
    fn mirrored_arc_reflects_about_start_heading() {
        let arc = Arc::new(Pose::default(), 3.0, Side::Left, 1.0).unwrap();
        let mirror = arc.mirrored();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let a = arc.point_at(t);
            let b = mirror.point_at(t);
            assert!(a.x.fuzzy_eq(b.x));
            assert!(a.y.fuzzy_eq(-b.y));
        }
    }

    #[test]
    fn invalid_arcs() {
        assert!(Arc::new(Pose::default(), 0.0, Side::Left, 1.0).is_err());
        assert!(Arc::new(Pose::default(), 1.0, Side::Left, -1.0).is_err());
        assert!(Arc::new(Pose::default(), f64::INFINITY, Side::Left, 1.0).is_err());
        assert!(Arc::new(Pose::default(), 1.0, Side::Left, 0.0).is_ok());
    }
}
