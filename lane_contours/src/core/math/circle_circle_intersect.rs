use super::Vector2;
use crate::core::traits::Real;

/// Result of intersecting two circles.
#[derive(Debug, Copy, Clone)]
pub enum CircleCircleIntr<T>
where
    T: Real,
{
    NoIntersect,
    /// Circles touch at a single point.
    TangentIntersect { point: Vector2<T> },
    TwoIntersects {
        point1: Vector2<T>,
        point2: Vector2<T>,
    },
    /// Same circle.
    Overlapping,
}

/// Finds the intersects between two circles.
///
/// Near tangency is resolved explicitly: when the center distance is within `epsilon` of
/// `radius1 + radius2` (external) or `|radius1 - radius2|` (internal) the result is always a
/// single [CircleCircleIntr::TangentIntersect], never two coincident points or a spurious miss.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::*;
/// let c1 = Vector2::new(0.0, 0.0);
/// let c2 = Vector2::new(2.0 + 1e-12, 0.0);
/// match circle_circle_intr(1.0, c1, 1.0, c2, 1e-9) {
///     CircleCircleIntr::TangentIntersect { point } => assert!(point.fuzzy_eq(Vector2::new(1.0, 0.0))),
///     r => panic!("expected tangent intersect, got {:?}", r),
/// }
/// ```
pub fn circle_circle_intr<T>(
    radius1: T,
    center1: Vector2<T>,
    radius2: T,
    center2: Vector2<T>,
    epsilon: T,
) -> CircleCircleIntr<T>
where
    T: Real,
{
    // http://paulbourke.net/geometry/circlesphere/
    use CircleCircleIntr::*;

    let cv = center2 - center1;
    let d2 = cv.dot(cv);
    let d = d2.sqrt();

    if d.fuzzy_eq_zero_eps(epsilon) {
        if radius1.fuzzy_eq_eps(radius2, epsilon) {
            return Overlapping;
        }
        return NoIntersect;
    }

    let rad_sum = radius1 + radius2;
    let rad_diff = (radius1 - radius2).abs();
    let rad1_sq = radius1 * radius1;
    // distance along center line from center1 to the chord through the intersects
    let a = (rad1_sq - radius2 * radius2 + d2) / (T::two() * d);
    let chord_point = center1 + cv.scale(a / d);

    if d.fuzzy_eq_eps(rad_sum, epsilon) || d.fuzzy_eq_eps(rad_diff, epsilon) {
        return TangentIntersect { point: chord_point };
    }

    if d > rad_sum || d < rad_diff {
        return NoIntersect;
    }

    let h = num_traits::real::Real::max(rad1_sq - a * a, T::zero()).sqrt();
    let h_over_d = h / d;
    let x_term = h_over_d * cv.y;
    let y_term = h_over_d * cv.x;

    let point1 = Vector2::new(chord_point.x + x_term, chord_point.y - y_term);
    let point2 = Vector2::new(chord_point.x - x_term, chord_point.y + y_term);

    if point1.fuzzy_eq_eps(point2, epsilon) {
        return TangentIntersect { point: chord_point };
    }

    TwoIntersects { point1, point2 }
}
