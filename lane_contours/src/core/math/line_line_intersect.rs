use super::{
    base_math::{min_max, parametric_from_point, point_from_parametric},
    Vector2,
};
use crate::core::traits::Real;

/// Result of intersecting two line segments `v1 -> v2` and `u1 -> u2`.
///
/// Parametric values follow `P(t) = p0 + t * (p1 - p0)` for each segment.
#[derive(Debug, Copy, Clone)]
pub enum LineLineIntr<T>
where
    T: Real,
{
    /// Segments are parallel and not collinear, or collinear and disjoint.
    NoIntersect,
    /// Segments meet at a single point that lies on both of them.
    TrueIntersect {
        seg1_t: T,
        seg2_t: T,
    },
    /// Segments are collinear and share a stretch of positive length, given as the parametric
    /// range along the second segment.
    Overlapping {
        seg2_t0: T,
        seg2_t1: T,
    },
    /// The supporting lines intersect but at least one segment must be extended to reach it.
    FalseIntersect {
        seg1_t: T,
        seg2_t: T,
    },
}

/// Finds the intersect between two line segments.
///
/// `epsilon` is a distance: parametric values are scaled by segment length before fuzzy
/// comparison so the tolerance means the same thing for short and long segments.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::*;
/// let v1 = Vector2::new(0.0, 0.0);
/// let v2 = Vector2::new(1.0, 0.0);
/// let u1 = Vector2::new(0.5, -1.0);
/// let u2 = Vector2::new(0.5, 1.0);
/// if let LineLineIntr::TrueIntersect { seg1_t, seg2_t } = line_line_intr(v1, v2, u1, u2, 1e-9) {
///     assert_eq!(seg1_t, 0.5);
///     assert_eq!(seg2_t, 0.5);
/// } else {
///     unreachable!("expected true intersect");
/// }
/// ```
pub fn line_line_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> LineLineIntr<T>
where
    T: Real,
{
    // http://geomalgorithms.com/a05-_intersect-1.html
    use LineLineIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let w = v1 - u1;
    let seg1_length = v.length();
    let seg2_length = u.length();
    let v_pdot_u = v.perp_dot(u);

    // perp dot of two vectors scales with both lengths, normalize so epsilon is a sine
    let len_prod = seg1_length * seg2_length;
    let is_parallel = len_prod <= T::zero() || (v_pdot_u / len_prod).fuzzy_eq_zero_eps(epsilon);

    if !is_parallel {
        let seg1_t = u.perp_dot(w) / v_pdot_u;
        let seg2_t = v.perp_dot(w) / v_pdot_u;
        if (seg1_t * seg1_length).fuzzy_in_range_eps(T::zero(), seg1_length, epsilon)
            && (seg2_t * seg2_length).fuzzy_in_range_eps(T::zero(), seg2_length, epsilon)
        {
            return TrueIntersect { seg1_t, seg2_t };
        }
        return FalseIntersect { seg1_t, seg2_t };
    }

    let v_is_point = seg1_length.fuzzy_eq_zero_eps(epsilon);
    let u_is_point = seg2_length.fuzzy_eq_zero_eps(epsilon);

    if v_is_point && u_is_point {
        return if v1.fuzzy_eq_eps(u1, epsilon) {
            TrueIntersect {
                seg1_t: T::zero(),
                seg2_t: T::zero(),
            }
        } else {
            NoIntersect
        };
    }

    // distance of the other segment from each supporting line
    if !v_is_point && (v.perp_dot(w) / seg1_length).abs() > epsilon {
        return NoIntersect;
    }
    if !u_is_point && (u.perp_dot(w) / seg2_length).abs() > epsilon {
        return NoIntersect;
    }

    if v_is_point {
        let seg2_t = parametric_from_point(u1, u2, v1);
        if (seg2_t * seg2_length).fuzzy_in_range_eps(T::zero(), seg2_length, epsilon) {
            return TrueIntersect {
                seg1_t: T::zero(),
                seg2_t,
            };
        }
        return NoIntersect;
    }

    if u_is_point {
        let seg1_t = parametric_from_point(v1, v2, u1);
        if (seg1_t * seg1_length).fuzzy_in_range_eps(T::zero(), seg1_length, epsilon) {
            return TrueIntersect {
                seg1_t,
                seg2_t: T::zero(),
            };
        }
        return NoIntersect;
    }

    // collinear, project the first segment onto the second
    let (mut seg2_t0, mut seg2_t1) = min_max(
        parametric_from_point(u1, u2, v1),
        parametric_from_point(u1, u2, v2),
    );

    if !(seg2_t0 * seg2_length).fuzzy_lt_eps(seg2_length, epsilon)
        || !(seg2_t1 * seg2_length).fuzzy_gt_eps(T::zero(), epsilon)
    {
        return NoIntersect;
    }

    seg2_t0 = num_traits::real::Real::max(seg2_t0, T::zero());
    seg2_t1 = num_traits::real::Real::min(seg2_t1, T::one());

    if ((seg2_t1 - seg2_t0) * seg2_length).fuzzy_eq_zero_eps(epsilon) {
        // end to end touch
        let touch = point_from_parametric(u1, u2, seg2_t0);
        let seg1_t = if touch.fuzzy_eq_eps(v1, epsilon) {
            T::zero()
        } else {
            T::one()
        };
        return TrueIntersect {
            seg1_t,
            seg2_t: seg2_t0,
        };
    }

    Overlapping { seg2_t0, seg2_t1 }
}

