//! Continuous curves and their conversion into polylines.
//!
//! Every curve is parameterized by `t` in `[0, 1]`, `t = 0` at the start pose and `t = 1` at the
//! end pose. For all curves except [BezierCubic] the parameter is the arc length fraction.
//! Curvature is signed, positive curvature turns left.
mod arc;
mod bezier;
mod clothoid;
mod flatten;
mod quadrature;
mod straight;

pub use arc::Arc;
pub use bezier::BezierCubic;
pub use clothoid::{Clothoid, ClothoidOptions};
pub use flatten::{FlattenOptions, Flattener};
pub use straight::Straight;

use crate::{
    core::math::{Pose, Vector2},
    error::Result,
    polyline::{OffsetProfile, Polyline},
};

/// Side a curve turns to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `1.0` for [Side::Left], `-1.0` for [Side::Right].
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Radius for a signed curvature, infinite for zero curvature.
#[inline]
pub(crate) fn radius_of(curvature: f64) -> f64 {
    if curvature == 0.0 {
        f64::INFINITY
    } else {
        1.0 / curvature
    }
}

/// A continuous, smooth 2D curve.
pub trait Curve {
    fn start_pose(&self) -> Pose;

    fn end_pose(&self) -> Pose;

    fn start_curvature(&self) -> f64;

    fn end_curvature(&self) -> f64;

    /// Signed radius at the start (`1 / curvature`), infinite when the curve starts straight.
    fn start_radius(&self) -> f64 {
        radius_of(self.start_curvature())
    }

    /// Signed radius at the end (`1 / curvature`), infinite when the curve ends straight.
    fn end_radius(&self) -> f64 {
        radius_of(self.end_curvature())
    }

    fn length(&self) -> f64;

    /// Point at parameter `t`.
    fn point_at(&self, t: f64) -> Vector2;

    /// Tangent direction in radians at parameter `t`.
    fn direction_at(&self, t: f64) -> f64;

    /// Arc length fraction at parameter `t`.
    fn fraction_at(&self, t: f64) -> f64 {
        t
    }

    /// Parameter at arc length `fraction`, inverse of [Curve::fraction_at].
    fn param_at_fraction(&self, fraction: f64) -> f64 {
        fraction
    }

    /// Sorted parameters that must appear in any flattening, always starting at 0 and ending at 1.
    ///
    /// Pieces between consecutive breakpoints turn by at most a quarter circle and contain no
    /// inflection point.
    fn breakpoints(&self) -> Vec<f64> {
        vec![0.0, 1.0]
    }

    /// Sorted parameters splitting the curve into pieces that a fixed count flattening samples
    /// uniformly, each piece receiving a share of the points proportional to its parameter span.
    fn sampling_pieces(&self) -> Vec<f64> {
        vec![0.0, 1.0]
    }

    /// `true` if the curve has zero curvature everywhere.
    fn is_straight(&self) -> bool {
        false
    }

    /// Pose at parameter `t`.
    fn pose_at(&self, t: f64) -> Pose {
        Pose::from_point(self.point_at(t), self.direction_at(t))
    }
}

/// Closed set of supported curve kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveModel {
    Straight(Straight),
    Arc(Arc),
    Bezier(BezierCubic),
    Clothoid(Clothoid),
}

macro_rules! dispatch {
    ($self:ident, $c:ident => $e:expr) => {
        match $self {
            CurveModel::Straight($c) => $e,
            CurveModel::Arc($c) => $e,
            CurveModel::Bezier($c) => $e,
            CurveModel::Clothoid($c) => $e,
        }
    };
}

impl Curve for CurveModel {
    fn start_pose(&self) -> Pose {
        dispatch!(self, c => c.start_pose())
    }

    fn end_pose(&self) -> Pose {
        dispatch!(self, c => c.end_pose())
    }

    fn start_curvature(&self) -> f64 {
        dispatch!(self, c => c.start_curvature())
    }

    fn end_curvature(&self) -> f64 {
        dispatch!(self, c => c.end_curvature())
    }

    fn length(&self) -> f64 {
        dispatch!(self, c => c.length())
    }

    fn point_at(&self, t: f64) -> Vector2 {
        dispatch!(self, c => c.point_at(t))
    }

    fn direction_at(&self, t: f64) -> f64 {
        dispatch!(self, c => c.direction_at(t))
    }

    fn fraction_at(&self, t: f64) -> f64 {
        dispatch!(self, c => c.fraction_at(t))
    }

    fn param_at_fraction(&self, fraction: f64) -> f64 {
        dispatch!(self, c => c.param_at_fraction(fraction))
    }

    fn breakpoints(&self) -> Vec<f64> {
        dispatch!(self, c => c.breakpoints())
    }

    fn sampling_pieces(&self) -> Vec<f64> {
        dispatch!(self, c => c.sampling_pieces())
    }

    fn is_straight(&self) -> bool {
        dispatch!(self, c => c.is_straight())
    }
}

impl CurveModel {
    /// Flatten with default [FlattenOptions], see [flatten_opt](CurveModel::flatten_opt).
    pub fn flatten(&self, flattener: Flattener) -> Result<Polyline> {
        flatten::flatten(self, flattener, &FlattenOptions::new())
    }

    /// Convert into a polyline whose points lie on the curve, the first and last point exactly
    /// at the curve's start and end position.
    pub fn flatten_opt(&self, flattener: Flattener, options: &FlattenOptions) -> Result<Polyline> {
        flatten::flatten(self, flattener, options)
    }

    /// Flatten the curve displaced sideways by `profile` (positive to the left), evaluated at the
    /// arc length fraction.
    pub fn offset_flatten(&self, profile: &OffsetProfile, flattener: Flattener) -> Result<Polyline> {
        flatten::offset_flatten(self, profile, flattener, &FlattenOptions::new())
    }

    pub fn offset_flatten_opt(
        &self,
        profile: &OffsetProfile,
        flattener: Flattener,
        options: &FlattenOptions,
    ) -> Result<Polyline> {
        flatten::offset_flatten(self, profile, flattener, options)
    }
}

impl From<Straight> for CurveModel {
    fn from(c: Straight) -> Self {
        CurveModel::Straight(c)
    }
}

impl From<Arc> for CurveModel {
    fn from(c: Arc) -> Self {
        CurveModel::Arc(c)
    }
}

impl From<BezierCubic> for CurveModel {
    fn from(c: BezierCubic) -> Self {
        CurveModel::Bezier(c)
    }
}

impl From<Clothoid> for CurveModel {
    fn from(c: Clothoid) -> Self {
        CurveModel::Clothoid(c)
    }
}
