//! Clothoids (Euler spirals), curves whose curvature changes linearly with arc length.
//!
//! A clothoid is stored by its start pose, start and end curvature and length. Points are
//! evaluated with the Fresnel integrals when the spiral is steep enough for them to be well
//! conditioned, otherwise the heading is integrated with Gauss-Legendre quadrature. Spirals whose
//! curvature change over their length vanishes are evaluated as arcs or straights.
//!
//! Fitting a clothoid between two poses follows the tangent-chord method by Walton and Meek,
//! with the shape selection of Connor and Krivodonova.
use std::f64::consts::{FRAC_PI_2, PI};

use log::trace;

use crate::{
    core::{
        math::{fresnel, normalize_angle, Pose, Vector2},
        traits::FuzzyEq,
    },
    diagnostics::{self, DegenerateGeometry, Diagnostics},
    error::{GeometryError, Result},
};

use super::{quadrature::gauss_legendre, Curve};

/// Curvature change over the full length below which the clothoid is evaluated as an arc.
const COLLAPSE_TOLERANCE: f64 = 1e-10;

/// Fresnel evaluation is used while `1 / a` stays below this scale, beyond it the absolute
/// error of the Fresnel approximation is magnified too much.
const FRESNEL_MAX_SCALE: f64 = 10.0;

/// Maximum heading change integrated by a single quadrature interval.
const QUADRATURE_MAX_TURN: f64 = 0.25;

const MAX_QUADRATURE_INTERVALS: usize = 4096;

/// Bisection steps for locating heading based breakpoints.
const BREAKPOINT_ITERATIONS: usize = 60;

/// Parameters for fitting a clothoid between two poses.
#[derive(Debug, Clone)]
pub struct ClothoidOptions<'a> {
    /// Tangent-chord angles below this are treated as zero (straight), and equal angles within
    /// it yield an arc.
    pub angle_tolerance: f64,
    /// Convergence tolerance of the secant iteration.
    pub secant_tolerance: f64,
    /// Ceiling on secant iterations before failing with [GeometryError::NoConvergence].
    pub max_iterations: usize,
    pub diagnostics: Option<&'a dyn Diagnostics>,
}

impl<'a> ClothoidOptions<'a> {
    pub fn new() -> Self {
        ClothoidOptions {
            angle_tolerance: 2.0 * PI / 3600.0,
            secant_tolerance: 1e-8,
            max_iterations: 100,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(diagnostics: &'a dyn Diagnostics) -> Self {
        ClothoidOptions {
            diagnostics: Some(diagnostics),
            ..Self::new()
        }
    }
}

impl<'a> Default for ClothoidOptions<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clothoid starting at a pose.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::Pose;
/// # use lane_contours::curve::{Clothoid, Curve};
/// // transition from straight into a radius 100 curve over 50 meters
/// let spiral = Clothoid::with_length(Pose::new(0.0, 0.0, 0.0), 50.0, 0.0, 0.01).unwrap();
/// assert!((spiral.end_pose().direction - 0.25).abs() < 1e-12);
/// assert!((spiral.a_value() - 5000f64.sqrt()).abs() < 1e-9);
///
/// let fit = Clothoid::between_poses(spiral.start_pose(), spiral.end_pose()).unwrap();
/// assert!((fit.length() - 50.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clothoid {
    start: Pose,
    start_curvature: f64,
    end_curvature: f64,
    length: f64,
    /// Linear drift added over the length so the curve ends on a requested end point.
    end_correction: Vector2,
    end_point: Vector2,
}

/// Result of the two pose solve before it is placed at the start pose.
enum Fit {
    Straight { length: f64, direction: f64 },
    Arc { curvature: f64, length: f64 },
    Spiral { k0: f64, k1: f64, length: f64 },
}

impl Clothoid {
    /// Clothoid of `length` (> 0) changing curvature linearly from `start_curvature` to
    /// `end_curvature`.
    pub fn with_length(
        start: Pose,
        length: f64,
        start_curvature: f64,
        end_curvature: f64,
    ) -> Result<Self> {
        Self::with_length_opt(
            start,
            length,
            start_curvature,
            end_curvature,
            &ClothoidOptions::new(),
        )
    }

    /// Same as [Clothoid::with_length], a spiral whose curvature change is too small to evaluate
    /// is reported to `options.diagnostics` as [DegenerateGeometry::CollapsedCurve].
    pub fn with_length_opt(
        start: Pose,
        length: f64,
        start_curvature: f64,
        end_curvature: f64,
        options: &ClothoidOptions,
    ) -> Result<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(GeometryError::invalid(format!(
                "clothoid length must be positive and finite, got {}",
                length
            )));
        }

        if !start_curvature.is_finite() || !end_curvature.is_finite() {
            return Err(GeometryError::invalid("clothoid curvature is not finite"));
        }

        if !start.point.is_finite() || !start.direction.is_finite() {
            return Err(GeometryError::invalid("clothoid start pose is not finite"));
        }

        let mut clothoid = Clothoid {
            start,
            start_curvature,
            end_curvature,
            length,
            end_correction: Vector2::zero(),
            end_point: Vector2::zero(),
        };
        clothoid.end_point = clothoid.raw_point(length);
        if clothoid.is_collapsed() && start_curvature != end_curvature {
            diagnostics::report(
                options.diagnostics,
                DegenerateGeometry::CollapsedCurve {
                    kind: clothoid.collapsed_kind(),
                },
            );
        }

        Ok(clothoid)
    }

    /// Clothoid with spiral parameter `a` (> 0), the length follows as `a² · |κ1 − κ0|`.
    pub fn with_a_value(
        start: Pose,
        a: f64,
        start_curvature: f64,
        end_curvature: f64,
    ) -> Result<Self> {
        if !(a.is_finite() && a > 0.0) {
            return Err(GeometryError::invalid(format!(
                "clothoid A-value must be positive and finite, got {}",
                a
            )));
        }

        if start_curvature == end_curvature {
            return Err(GeometryError::invalid(
                "clothoid A-value requires different start and end curvature",
            ));
        }

        Self::with_length(
            start,
            a * a * (end_curvature - start_curvature).abs(),
            start_curvature,
            end_curvature,
        )
    }

    /// Fit a clothoid from `start` to `end` with default [ClothoidOptions].
    pub fn between_poses(start: Pose, end: Pose) -> Result<Self> {
        Self::between_poses_opt(start, end, &ClothoidOptions::new())
    }

    /// Fit a clothoid from `start` to `end`.
    ///
    /// The curve starts at `start` with its heading, and ends exactly at the position of `end`
    /// with a heading within the solver tolerances of the requested one. Nearly aligned poses
    /// result in a straight and equal tangent-chord angles in an arc.
    pub fn between_poses_opt(start: Pose, end: Pose, options: &ClothoidOptions) -> Result<Self> {
        if !start.point.is_finite()
            || !end.point.is_finite()
            || !start.direction.is_finite()
            || !end.direction.is_finite()
        {
            return Err(GeometryError::invalid("clothoid pose is not finite"));
        }

        let chord = end.point - start.point;
        let chord_length = chord.length();
        let eps = f64::scaled_epsilon(
            start.point.max_abs_component().max(end.point.max_abs_component()),
            1e-12,
        );
        if chord_length.fuzzy_eq_zero_eps(eps) {
            return Err(GeometryError::invalid(format!(
                "clothoid end points {} and {} coincide",
                start.point, end.point
            )));
        }

        let mut clothoid = match solve_between(start, end, options)? {
            Fit::Straight { length, direction } => Clothoid {
                start: Pose::from_point(start.point, direction),
                start_curvature: 0.0,
                end_curvature: 0.0,
                length,
                end_correction: Vector2::zero(),
                end_point: end.point,
            },
            Fit::Arc { curvature, length } => Clothoid {
                start,
                start_curvature: curvature,
                end_curvature: curvature,
                length,
                end_correction: Vector2::zero(),
                end_point: end.point,
            },
            Fit::Spiral { k0, k1, length } => Clothoid {
                start,
                start_curvature: k0,
                end_curvature: k1,
                length,
                end_correction: Vector2::zero(),
                end_point: end.point,
            },
        };

        clothoid.end_correction = end.point - clothoid.raw_point(clothoid.length);
        trace!(
            "clothoid fit: length {}, curvature {} -> {}, end drift {}",
            clothoid.length,
            clothoid.start_curvature,
            clothoid.end_curvature,
            clothoid.end_correction.length()
        );

        Ok(clothoid)
    }

    /// Spiral parameter `A = sqrt(length / |κ1 − κ0|)`, infinite for constant curvature.
    pub fn a_value(&self) -> f64 {
        let dk = (self.end_curvature - self.start_curvature).abs();
        if dk == 0.0 {
            f64::INFINITY
        } else {
            (self.length / dk).sqrt()
        }
    }

    /// Signed curvature at parameter `t`.
    pub fn curvature_at(&self, t: f64) -> f64 {
        self.start_curvature + (self.end_curvature - self.start_curvature) * t
    }

    #[inline]
    fn curvature_rate(&self) -> f64 {
        (self.end_curvature - self.start_curvature) / self.length
    }

    #[inline]
    fn is_collapsed(&self) -> bool {
        (self.end_curvature - self.start_curvature).abs() * self.length < COLLAPSE_TOLERANCE
    }

    fn collapsed_kind(&self) -> &'static str {
        if self.start_curvature == 0.0 {
            "straight"
        } else {
            "arc"
        }
    }

    /// Heading at distance `s` from the start.
    #[inline]
    fn heading(&self, s: f64) -> f64 {
        self.start.direction + self.start_curvature * s + 0.5 * self.curvature_rate() * s * s
    }

    /// Point at distance `s` without the end correction.
    fn raw_point(&self, s: f64) -> Vector2 {
        let k0 = self.start_curvature;
        let local = if self.is_collapsed() {
            if k0 == 0.0 {
                Vector2::new(s, 0.0)
            } else {
                let turn = k0 * s;
                let half_sin = (0.5 * turn).sin();
                Vector2::new(turn.sin() / k0, 2.0 * half_sin * half_sin / k0)
            }
        } else {
            let c = self.curvature_rate();
            let a = (c.abs() / PI).sqrt();
            if 1.0 / a <= FRESNEL_MAX_SCALE {
                self.fresnel_local(s, c, a)
            } else {
                self.quadrature_local(s, c)
            }
        };

        self.start.to_world(local)
    }

    /// Local offset from the start by completing the square of the heading,
    /// `θ(u) = φ + c/2 · u²` with `u = s + κ0/c`, and substituting `t = a · u`.
    fn fresnel_local(&self, s: f64, c: f64, a: f64) -> Vector2 {
        let k0 = self.start_curvature;
        let sign = c.signum();
        let phi = -k0 * k0 / (2.0 * c);
        let (c0, s0) = fresnel(a * k0 / c);
        let (c1, s1) = fresnel(a * (s + k0 / c));
        let dc = c1 - c0;
        let ds = s1 - s0;
        let (sin_phi, cos_phi) = phi.sin_cos();
        Vector2::new(
            (cos_phi * dc - sign * sin_phi * ds) / a,
            (sin_phi * dc + sign * cos_phi * ds) / a,
        )
    }

    fn quadrature_local(&self, s: f64, c: f64) -> Vector2 {
        let k0 = self.start_curvature;
        let max_curvature = k0.abs().max((k0 + c * s).abs());
        let intervals = ((max_curvature * s / QUADRATURE_MAX_TURN).ceil() as usize + 1)
            .min(MAX_QUADRATURE_INTERVALS);
        gauss_legendre(0.0, s, intervals, Vector2::zero(), |u| {
            Vector2::from_angle(k0 * u + 0.5 * c * u * u)
        })
    }

    /// Parameter in `[t0, t1]` where the heading reaches `target`, heading must be monotonic
    /// over the interval.
    fn param_at_heading(&self, t0: f64, t1: f64, target: f64) -> f64 {
        let h0 = self.heading(t0 * self.length);
        let increasing = self.heading(t1 * self.length) > h0;
        let mut lo = t0;
        let mut hi = t1;
        for _ in 0..BREAKPOINT_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if (self.heading(mid * self.length) < target) == increasing {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

impl Curve for Clothoid {
    fn start_pose(&self) -> Pose {
        self.start
    }

    fn end_pose(&self) -> Pose {
        self.pose_at(1.0)
    }

    fn start_curvature(&self) -> f64 {
        self.start_curvature
    }

    fn end_curvature(&self) -> f64 {
        self.end_curvature
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn point_at(&self, t: f64) -> Vector2 {
        if t >= 1.0 {
            return self.end_point;
        }
        self.raw_point(t * self.length) + self.end_correction.scale(t)
    }

    fn direction_at(&self, t: f64) -> f64 {
        self.heading(t * self.length)
    }

    fn breakpoints(&self) -> Vec<f64> {
        // split at the inflection point, then so that each piece turns at most a quarter circle
        let mut pieces = vec![0.0];
        let dk = self.end_curvature - self.start_curvature;
        if dk != 0.0 {
            let inflection = -self.start_curvature / dk;
            if inflection > 1e-9 && inflection < 1.0 - 1e-9 {
                pieces.push(inflection);
            }
        }
        pieces.push(1.0);

        let mut result = vec![0.0];
        for w in pieces.windows(2) {
            let h0 = self.heading(w[0] * self.length);
            let turn = self.heading(w[1] * self.length) - h0;
            let splits = (turn.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
            for i in 1..splits {
                let target = h0 + turn * i as f64 / splits as f64;
                result.push(self.param_at_heading(w[0], w[1], target));
            }
            result.push(w[1]);
        }
        result
    }

    fn is_straight(&self) -> bool {
        self.start_curvature == 0.0 && self.end_curvature == 0.0
    }
}

#[inline]
fn alpha_to_t(alpha: f64) -> f64 {
    alpha.signum() * (2.0 * alpha.abs() / PI).sqrt()
}

/// Shape solve failure, a missing bracket is recoverable by trying the other shape.
enum ThetaError {
    NoBracket,
    Failed(GeometryError),
}

/// Tangent-chord solve.
///
/// `phi1` is the angle from the start heading to the chord, `phi2` from the chord to the end
/// heading. The problem is first normalized so that `|phi1| <= |phi2|` (by traversing the curve
/// from end to start) and `0 < phi2 < π` (by reflecting on the chord).
fn solve_between(start: Pose, end: Pose, options: &ClothoidOptions) -> Result<Fit> {
    let chord = end.point - start.point;
    let chord_length = chord.length();
    let chord_angle = chord.angle();
    let mut phi1 = normalize_angle(chord_angle - start.direction);
    let mut phi2 = normalize_angle(end.direction - chord_angle);
    let tol = options.angle_tolerance;

    if phi1.abs() < tol && phi2.abs() < tol {
        return Ok(Fit::Straight {
            length: chord_length,
            direction: chord_angle,
        });
    }

    if (phi2 - phi1).abs() < tol {
        let sin_phi = phi1.sin();
        if sin_phi.abs() < 1e-12 {
            return Err(GeometryError::invalid(
                "clothoid end position lies straight behind the start heading",
            ));
        }
        return Ok(Fit::Arc {
            curvature: 2.0 * sin_phi / chord_length,
            length: chord_length * phi1 / sin_phi,
        });
    }

    let opposite = phi2.abs() < phi1.abs();
    if opposite {
        (phi1, phi2) = (-phi2, -phi1);
    }

    let reflect = phi2 < 0.0 || phi2 > PI;
    if reflect {
        phi1 = -phi1;
        phi2 = -phi2;
    }

    // h < 0 indicates a C-shape exists, numerically the shape may still need to switch
    let (c, s) = fresnel(alpha_to_t(phi1 + phi2));
    let h = s * phi1.cos() - c * phi1.sin();
    let mut c_shape = 0.0 < phi1 && phi1 < phi2 && phi2 < PI && h < 0.0;

    let theta = match solve_theta(phi1, phi2, c_shape, options) {
        Ok(theta) => theta,
        Err(ThetaError::NoBracket) => {
            diagnostics::report(options.diagnostics, DegenerateGeometry::ClothoidShapeSwitched);
            c_shape = !c_shape;
            match solve_theta(phi1, phi2, c_shape, options) {
                Ok(theta) => theta,
                Err(ThetaError::NoBracket) => {
                    return Err(GeometryError::NoConvergence { iterations: 0 })
                }
                Err(ThetaError::Failed(e)) => return Err(e),
            }
        }
        Err(ThetaError::Failed(e)) => return Err(e),
    };

    let a_sign = if c_shape { -1.0 } else { 1.0 };
    let v1 = theta + phi1 + phi2;
    let v2 = theta + phi1;
    let (c0, s0) = fresnel(alpha_to_t(theta));
    let (c1, s1) = fresnel(alpha_to_t(v1));
    let a = chord_length / ((s1 + a_sign * s0) * v2.sin() + (c1 + a_sign * c0) * v2.cos());

    // curvature along the unit Fresnel spiral scaled by a is π t / a
    let t_start = alpha_to_t(-a_sign * theta);
    let t_end = alpha_to_t(v1);
    let length = a * (t_end - t_start);
    if !(a.is_finite() && a > 0.0 && length.is_finite() && length > 0.0) {
        return Err(GeometryError::NoConvergence {
            iterations: options.max_iterations,
        });
    }

    let mut k0 = PI * t_start / a;
    let mut k1 = PI * t_end / a;
    if reflect {
        k0 = -k0;
        k1 = -k1;
    }
    if opposite {
        // solved from end to start, reversing the traversal negates the curvature
        (k0, k1) = (-k1, -k0);
    }

    Ok(Fit::Spiral { k0, k1, length })
}

/// Residual whose root gives the spiral angle `theta`, `sign` is -1 for C-shapes and 1 for
/// S-shapes.
fn f_theta(theta: f64, phi1: f64, phi2: f64, sign: f64) -> f64 {
    let theta_phi1 = theta + phi1;
    let (c0, s0) = fresnel(alpha_to_t(theta));
    let (c1, s1) = fresnel(alpha_to_t(theta_phi1 + phi2));
    (s1 + sign * s0) * theta_phi1.cos() - (c1 + sign * c0) * theta_phi1.sin()
}

/// Bracketed secant iteration, falling back to bisection whenever the secant step leaves the
/// current bracket.
fn solve_theta(
    phi1: f64,
    phi2: f64,
    c_shape: bool,
    options: &ClothoidOptions,
) -> std::result::Result<f64, ThetaError> {
    let (lo, hi, sign) = if c_shape {
        let lambda = (1.0 - phi1.cos()) / (1.0 - phi2.cos());
        let lambda2 = lambda * lambda;
        (0.0, lambda2 * (phi1 + phi2) / (1.0 - lambda2), -1.0)
    } else {
        ((-phi1).max(0.0), FRAC_PI_2 - phi1, 1.0)
    };

    let f_lo = f_theta(lo, phi1, phi2, sign);
    let f_hi = f_theta(hi, phi1, phi2, sign);
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo * f_hi > 0.0 {
        return Err(ThetaError::NoBracket);
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }

    let tol = options.secant_tolerance;
    // bracket [a, b] with a sign change, (x0, x1) the last two secant iterates
    let (mut a, mut f_a, mut b) = (lo, f_lo, hi);
    let (mut x0, mut f0, mut x1, mut f1) = (lo, f_lo, hi, f_hi);
    for i in 0..options.max_iterations {
        let mut x2 = if f1 != f0 {
            x1 - f1 * (x1 - x0) / (f1 - f0)
        } else {
            0.5 * (a + b)
        };
        if !(x2 > a.min(b) && x2 < a.max(b)) {
            x2 = 0.5 * (a + b);
        }

        let f2 = f_theta(x2, phi1, phi2, sign);
        if (f2 < 0.0) == (f_a < 0.0) {
            a = x2;
            f_a = f2;
        } else {
            b = x2;
        }

        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f2;
        if (x0 - x1).abs() < tol || f2.abs() < tol || (b - a).abs() < tol {
            trace!("clothoid theta {} after {} iterations", x2, i + 1);
            return Ok(x2);
        }
    }

    Err(ThetaError::Failed(GeometryError::NoConvergence {
        iterations: options.max_iterations,
    }))
}
