use std::f64::consts::FRAC_PI_2;

use crate::{
    core::{
        math::{delta_angle, Pose, Vector2},
        traits::FuzzyEq,
    },
    error::{GeometryError, Result},
};

use super::{quadrature::gauss_legendre, Curve};

/// Sub intervals used for each arc length integration.
const LENGTH_INTERVALS: usize = 16;

/// Bisection steps when inverting the arc length fraction.
const FRACTION_SOLVE_ITERATIONS: usize = 64;

/// Samples per piece used to measure how far a piece turns.
const TURN_SAMPLES: usize = 16;

/// Cubic Bezier curve defined by four control points.
///
/// Unlike the other curves, the parameter `t` is the Bezier parameter and not the arc length
/// fraction, use [Curve::fraction_at] and [Curve::param_at_fraction] to convert.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BezierCubic {
    p0: Vector2,
    p1: Vector2,
    p2: Vector2,
    p3: Vector2,
    length: f64,
}

impl BezierCubic {
    /// Fails with [GeometryError::InvalidArgument] for non-finite control points or a curve of
    /// zero length.
    pub fn new(p0: Vector2, p1: Vector2, p2: Vector2, p3: Vector2) -> Result<Self> {
        if ![p0, p1, p2, p3].iter().all(|p| p.is_finite()) {
            return Err(GeometryError::invalid("bezier control point is not finite"));
        }

        let mut bezier = BezierCubic {
            p0,
            p1,
            p2,
            p3,
            length: 0.0,
        };
        bezier.length = bezier.arc_length(0.0, 1.0);

        let scale = [p0, p1, p2, p3]
            .iter()
            .fold(0.0f64, |acc, p| acc.max(p.max_abs_component()));
        if bezier
            .length
            .fuzzy_eq_zero_eps(f64::scaled_epsilon(scale, 1e-12))
        {
            return Err(GeometryError::invalid("bezier curve has zero length"));
        }

        Ok(bezier)
    }

    /// Bezier leaving `start` and arriving at `end` along their headings, control points placed
    /// at half the chord length from the end points.
    pub fn from_poses(start: Pose, end: Pose) -> Result<Self> {
        let d = 0.5 * (end.point - start.point).length();
        Self::new(
            start.point,
            start.point + start.tangent().scale(d),
            end.point - end.tangent().scale(d),
            end.point,
        )
    }

    #[inline]
    pub fn control_points(&self) -> [Vector2; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// First derivative at `t`.
    pub fn derivative(&self, t: f64) -> Vector2 {
        let s = 1.0 - t;
        ((self.p1 - self.p0).scale(s * s)
            + (self.p2 - self.p1).scale(2.0 * s * t)
            + (self.p3 - self.p2).scale(t * t))
        .scale(3.0)
    }

    /// Second derivative at `t`.
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        let s = 1.0 - t;
        let b0 = self.p2 - self.p1.scale(2.0) + self.p0;
        let b1 = self.p3 - self.p2.scale(2.0) + self.p1;
        (b0.scale(s) + b1.scale(t)).scale(6.0)
    }

    /// Signed curvature at `t`.
    pub fn curvature_at(&self, t: f64) -> f64 {
        let d1 = self.derivative(t);
        let d2 = self.second_derivative(t);
        let speed = d1.length();
        if speed.fuzzy_eq_zero() {
            return 0.0;
        }
        d1.perp_dot(d2) / (speed * speed * speed)
    }

    /// Parameters in (0, 1) where the curvature changes sign.
    pub fn inflections(&self) -> Vec<f64> {
        let a = self.p1 - self.p0;
        let b = self.p2 - self.p1.scale(2.0) + self.p0;
        let c = self.p3 - self.p2.scale(3.0) + self.p1.scale(3.0) - self.p0;
        // cross(B', B'') is proportional to q0 + q1 t + q2 t^2
        let q0 = a.perp_dot(b);
        let q1 = a.perp_dot(c);
        let q2 = b.perp_dot(c);

        let mut roots = Vec::with_capacity(2);
        let scale = q0.abs().max(q1.abs()).max(q2.abs());
        if scale == 0.0 {
            return roots;
        }
        let (q0, q1, q2) = (q0 / scale, q1 / scale, q2 / scale);

        if q2.abs() < 1e-12 {
            if q1.abs() > 1e-12 {
                roots.push(-q0 / q1);
            }
        } else {
            let disc = q1 * q1 - 4.0 * q2 * q0;
            if disc > 0.0 {
                let sq = disc.sqrt();
                // numerically stable pair
                let q = -0.5 * (q1 + q1.signum() * sq);
                roots.push(q / q2);
                if q != 0.0 {
                    roots.push(q0 / q);
                }
            }
        }

        roots.retain(|t| *t > 1e-9 && *t < 1.0 - 1e-9);
        roots.sort_by(|x, y| x.total_cmp(y));
        roots.dedup_by(|x, y| (*x - *y).abs() < 1e-9);
        roots
    }

    fn arc_length(&self, t0: f64, t1: f64) -> f64 {
        gauss_legendre(t0, t1, LENGTH_INTERVALS, 0.0, |t| self.derivative(t).length())
    }

    fn direction_of(&self, t: f64) -> Vector2 {
        let d1 = self.derivative(t);
        if !d1.length().fuzzy_eq_zero() {
            return d1;
        }

        // derivative vanishes at an end with a coincident control point, the curve leaves the
        // start along the second derivative and arrives at the end against it
        let d2 = self.second_derivative(t);
        if !d2.length().fuzzy_eq_zero() {
            return if t < 0.5 { d2 } else { -d2 };
        }
        self.p3 - self.p0
    }

    fn piece_turn(&self, t0: f64, t1: f64) -> f64 {
        let mut turn = 0.0;
        let mut prev = self.direction_at(t0);
        for i in 1..=TURN_SAMPLES {
            let t = t0 + (t1 - t0) * i as f64 / TURN_SAMPLES as f64;
            let dir = self.direction_at(t);
            turn += delta_angle(prev, dir).abs();
            prev = dir;
        }
        turn
    }
}

impl Curve for BezierCubic {
    fn start_pose(&self) -> Pose {
        Pose::from_point(self.p0, self.direction_at(0.0))
    }

    fn end_pose(&self) -> Pose {
        Pose::from_point(self.p3, self.direction_at(1.0))
    }

    fn start_curvature(&self) -> f64 {
        self.curvature_at(0.0)
    }

    fn end_curvature(&self) -> f64 {
        self.curvature_at(1.0)
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn point_at(&self, t: f64) -> Vector2 {
        if t <= 0.0 {
            return self.p0;
        }
        if t >= 1.0 {
            return self.p3;
        }
        let s = 1.0 - t;
        self.p0.scale(s * s * s)
            + self.p1.scale(3.0 * s * s * t)
            + self.p2.scale(3.0 * s * t * t)
            + self.p3.scale(t * t * t)
    }

    fn direction_at(&self, t: f64) -> f64 {
        self.direction_of(t).angle()
    }

    fn fraction_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        (self.arc_length(0.0, t) / self.length).clamp(0.0, 1.0)
    }

    fn param_at_fraction(&self, fraction: f64) -> f64 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }

        let mut lo = 0.0;
        let mut hi = 1.0;
        for _ in 0..FRACTION_SOLVE_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.fraction_at(mid) < fraction {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo < 1e-14 {
                break;
            }
        }
        0.5 * (lo + hi)
    }

    fn breakpoints(&self) -> Vec<f64> {
        let pieces = self.sampling_pieces();
        let mut result = vec![0.0];
        for w in pieces.windows(2) {
            let splits = (self.piece_turn(w[0], w[1]) / FRAC_PI_2).ceil().max(1.0) as usize;
            for i in 1..=splits {
                result.push(w[0] + (w[1] - w[0]) * i as f64 / splits as f64);
            }
        }
        result
    }

    fn sampling_pieces(&self) -> Vec<f64> {
        let mut pieces = vec![0.0];
        pieces.extend(self.inflections());
        pieces.push(1.0);
        pieces
    }

    fn is_straight(&self) -> bool {
        let chord = self.p3 - self.p0;
        let len = chord.length();
        if len.fuzzy_eq_zero() {
            return false;
        }
        let eps = f64::scaled_epsilon(len, 1e-12);
        (self.p1 - self.p0).perp_dot(chord).abs() / len <= eps
            && (self.p2 - self.p0).perp_dot(chord).abs() / len <= eps
            && (self.p1 - self.p0).dot(chord) >= 0.0
            && (self.p3 - self.p2).dot(chord) >= 0.0
    }
}
