use super::Vector2;
use crate::core::traits::Real;

/// Returns the (min, max) values from `v1` and `v2`.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::*;
/// let (min_val, max_val) = min_max(8, 4);
/// assert_eq!(min_val, 4);
/// assert_eq!(max_val, 8);
/// ```
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Normalize radians to be between `0` and `2PI`, e.g. `-PI/4` becomes `7PI/4` and `5PI` becomes
/// `PI`.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::*;
/// # use lane_contours::core::traits::*;
/// use std::f64::consts::PI;
/// assert!(normalize_radians(5.0 * PI).fuzzy_eq(PI));
/// assert!(normalize_radians(-PI / 4.0).fuzzy_eq(7.0 * PI / 4.0));
/// assert!(normalize_radians(2.0 * PI).fuzzy_eq(2.0 * PI));
/// ```
#[inline]
pub fn normalize_radians<T>(angle: T) -> T
where
    T: Real,
{
    if angle >= T::zero() && angle <= T::tau() {
        return angle;
    }

    angle - (angle / T::tau()).floor() * T::tau()
}

/// Normalize radians to be between `-PI` and `PI`.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::*;
/// # use lane_contours::core::traits::*;
/// use std::f64::consts::PI;
/// assert!(normalize_angle(1.5 * PI).fuzzy_eq(-0.5 * PI));
/// assert!(normalize_angle(-2.5 * PI).fuzzy_eq(-0.5 * PI));
/// assert!(normalize_angle(0.25 * PI).fuzzy_eq(0.25 * PI));
/// ```
#[inline]
pub fn normalize_angle<T>(angle: T) -> T
where
    T: Real,
{
    let a = normalize_radians(angle);
    if a > T::pi() {
        a - T::tau()
    } else {
        a
    }
}

/// Returns the smaller difference between two angles, i.e. the signed turn from `angle1` to
/// `angle2` in `(-PI, PI]`.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::*;
/// # use lane_contours::core::traits::*;
/// use std::f64::consts::PI;
/// assert!(delta_angle(0.5 * PI, 0.25 * PI).fuzzy_eq(-0.25 * PI));
/// assert!(delta_angle(0.25 * PI, 0.5 * PI).fuzzy_eq(0.25 * PI));
/// assert!(delta_angle(-0.9 * PI, 0.9 * PI).fuzzy_eq(-0.2 * PI));
/// ```
#[inline]
pub fn delta_angle<T>(angle1: T, angle2: T) -> T
where
    T: Real,
{
    let mut diff = normalize_radians(angle2 - angle1);
    if diff > T::pi() {
        diff = diff - T::tau();
    }

    diff
}

/// Distance squared between the points `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Angle of the direction vector described by `p0` to `p1`.
#[inline]
pub fn angle<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    T::atan2(p1.y - p0.y, p1.x - p0.x)
}

/// Midpoint of a line segment defined by `p0` to `p1`.
#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

/// Returns the point on the line segment going from `p0` to `p1` at parametric value `t`.
#[inline]
pub fn point_from_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Returns the parametric value on the line segment going from `p0` to `p1` at the `point` given.
///
/// Assumes `point` lies on the line. The dominant axis of the segment is used so vertical and
/// horizontal segments are handled without dividing by a (near) zero extent.
#[inline]
pub fn parametric_from_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let d = p1 - p0;
    if d.x.abs() >= d.y.abs() {
        (point.x - p0.x) / d.x
    } else {
        (point.y - p0.y) / d.y
    }
}

/// Returns the closest point on the line segment from `p0` to `p1` to the `point` given.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    // http://geomalgorithms.com/a02-_lines.html
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 <= T::zero() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 <= c1 {
        return p1;
    }

    point_from_parametric(p0, p1, c1 / c2)
}

/// Distance from `point` to the line segment `p0` to `p1`.
#[inline]
pub fn dist_to_line_seg<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    dist_squared(line_seg_closest_point(p0, p1, point), point).sqrt()
}

/// Signed perpendicular distance from `point` to the infinite line through `p0` and `p1`,
/// positive to the left of the direction `p0 -> p1`.
///
/// `p0` and `p1` must not coincide.
#[inline]
pub fn signed_dist_to_line<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let d = p1 - p0;
    d.perp_dot(point - p0) / d.length()
}
