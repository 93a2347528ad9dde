use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder, AABB};

use crate::{
    core::{
        math::{
            dist_to_line_seg, line_line_intr, parametric_from_point, point_from_parametric,
            LineLineIntr, Vector2,
        },
        traits::Real,
    },
    error::{GeometryError, Result},
};

/// Where a point lies relative to a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    /// On an edge, within the comparison epsilon.
    Boundary,
    Outside,
}

/// Simple closed polygon, the last point connects back to the first.
#[derive(Debug, Clone)]
pub struct Polygon<T = f64> {
    points: Vec<Vector2<T>>,
    bounds: AABB<T>,
}

impl<T> Polygon<T>
where
    T: Real,
{
    /// Create a polygon from its corner points.
    ///
    /// Consecutive repeated points and a closing point equal to the first are dropped. Fails with
    /// [GeometryError::InvalidArgument] when fewer than 3 distinct points remain or a coordinate
    /// is not finite.
    pub fn new(points: Vec<Vector2<T>>) -> Result<Self> {
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::invalid(format!(
                "polygon point {} is not finite",
                i
            )));
        }

        let mut points = points;
        points.dedup();
        if points.len() > 1 && points[0] == points[points.len() - 1] {
            points.pop();
        }

        if points.len() < 3 {
            return Err(GeometryError::invalid(format!(
                "polygon needs at least 3 distinct points, got {}",
                points.len()
            )));
        }

        Ok(Self::from_points_unchecked(points))
    }

    /// Axis aligned rectangle covering `aabb`, counter clockwise from its minimum corner.
    ///
    /// Degenerate (zero width or height) boxes yield a polygon without area, it still intersects
    /// whatever its edges pass through or run along.
    pub fn rectangle(aabb: AABB<T>) -> Self {
        Self::from_points_unchecked(vec![
            Vector2::new(aabb.min_x, aabb.min_y),
            Vector2::new(aabb.max_x, aabb.min_y),
            Vector2::new(aabb.max_x, aabb.max_y),
            Vector2::new(aabb.min_x, aabb.max_y),
        ])
    }

    fn from_points_unchecked(points: Vec<Vector2<T>>) -> Self {
        let first = points[0];
        let mut bounds = AABB::new(first.x, first.y, first.x, first.y);
        for p in points.iter().skip(1) {
            bounds.min_x = num_traits::real::Real::min(bounds.min_x, p.x);
            bounds.min_y = num_traits::real::Real::min(bounds.min_y, p.y);
            bounds.max_x = num_traits::real::Real::max(bounds.max_x, p.x);
            bounds.max_y = num_traits::real::Real::max(bounds.max_y, p.y);
        }
        Polygon { points, bounds }
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<T>] {
        &self.points
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Axis aligned bounding box.
    #[inline]
    pub fn bounds(&self) -> AABB<T> {
        self.bounds
    }

    /// Iterate the closed ring of edges.
    pub fn iter_edges(&self) -> impl Iterator<Item = (Vector2<T>, Vector2<T>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed area, positive for counter clockwise polygons.
    pub fn area(&self) -> T {
        self.iter_edges()
            .fold(T::zero(), |acc, (a, b)| acc + a.perp_dot(b))
            / T::two()
    }

    fn max_coordinate_magnitude(&self) -> T {
        let b = &self.bounds;
        let x = num_traits::real::Real::max(b.min_x.abs(), b.max_x.abs());
        let y = num_traits::real::Real::max(b.min_y.abs(), b.max_y.abs());
        num_traits::real::Real::max(x, y)
    }

    /// Default epsilon for comparisons between `self` and `other`.
    fn pair_epsilon(&self, other: &Self) -> T {
        let magnitude = num_traits::real::Real::max(
            self.max_coordinate_magnitude(),
            other.max_coordinate_magnitude(),
        );
        T::scaled_epsilon(magnitude, T::from_f64(1e-12))
    }

    /// Locate `point` using an epsilon scaled to this polygon's coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lane_contours::core::math::Vector2;
    /// # use lane_contours::spatial::{Polygon, PointLocation};
    /// # use static_aabb2d_index::AABB;
    /// let square = Polygon::rectangle(AABB::new(0.0, 0.0, 2.0, 2.0));
    /// assert_eq!(square.locate_point(Vector2::new(1.0, 1.0)), PointLocation::Inside);
    /// assert_eq!(square.locate_point(Vector2::new(2.0, 1.0)), PointLocation::Boundary);
    /// assert_eq!(square.locate_point(Vector2::new(3.0, 1.0)), PointLocation::Outside);
    /// ```
    pub fn locate_point(&self, point: Vector2<T>) -> PointLocation {
        let eps = T::scaled_epsilon(
            num_traits::real::Real::max(self.max_coordinate_magnitude(), point.max_abs_component()),
            T::from_f64(1e-12),
        );
        self.locate_point_eps(point, eps)
    }

    /// Locate `point`, points within `eps` of an edge are on the boundary.
    pub fn locate_point_eps(&self, point: Vector2<T>, eps: T) -> PointLocation {
        let mut inside = false;
        for (a, b) in self.iter_edges() {
            if dist_to_line_seg(a, b, point) <= eps {
                return PointLocation::Boundary;
            }

            // crossing number, half open rule on y so shared vertices count once
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }

        if inside {
            PointLocation::Inside
        } else {
            PointLocation::Outside
        }
    }

    /// `true` if the polygons share area or an edge stretch of positive length.
    ///
    /// Polygons touching only at single points (shared corners, a corner on an edge) do not
    /// intersect. Bounding boxes are only used to reject early.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lane_contours::spatial::Polygon;
    /// # use static_aabb2d_index::AABB;
    /// let a = Polygon::rectangle(AABB::new(0.0, 0.0, 1.0, 1.0));
    /// let overlapping = Polygon::rectangle(AABB::new(0.5, 0.5, 1.5, 1.5));
    /// let corner = Polygon::rectangle(AABB::new(1.0, 1.0, 2.0, 2.0));
    /// let shared_edge = Polygon::rectangle(AABB::new(1.0, 0.0, 2.0, 1.0));
    /// assert!(a.intersects(&overlapping));
    /// assert!(!a.intersects(&corner));
    /// assert!(a.intersects(&shared_edge));
    /// ```
    pub fn intersects(&self, other: &Polygon<T>) -> bool {
        let eps = self.pair_epsilon(other);
        if !bounds_overlap(&self.bounds, &other.bounds, eps) {
            return false;
        }

        let other_index = edge_index(other);
        let self_index = edge_index(self);
        edge_inside(self, other, other_index.as_ref(), eps)
            || edge_inside(other, self, self_index.as_ref(), eps)
    }
}

impl<T> PartialEq for Polygon<T>
where
    T: Real,
{
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

/// Inclusive overlap test of two boxes grown by `eps`.
#[inline]
pub(crate) fn bounds_overlap<T>(a: &AABB<T>, b: &AABB<T>, eps: T) -> bool
where
    T: Real,
{
    a.min_x <= b.max_x + eps
        && a.max_x + eps >= b.min_x
        && a.min_y <= b.max_y + eps
        && a.max_y + eps >= b.min_y
}

/// Spatial index of the edges of `polygon`, item `i` is the edge starting at point `i`.
fn edge_index<T>(polygon: &Polygon<T>) -> Option<StaticAABB2DIndex<T>>
where
    T: Real,
{
    let mut builder = StaticAABB2DIndexBuilder::new(polygon.vertex_count());
    for (a, b) in polygon.iter_edges() {
        builder.add(
            num_traits::real::Real::min(a.x, b.x),
            num_traits::real::Real::min(a.y, b.y),
            num_traits::real::Real::max(a.x, b.x),
            num_traits::real::Real::max(a.y, b.y),
        );
    }

    match builder.build() {
        Ok(index) => Some(index),
        Err(e) => {
            // falls back to testing every edge pair
            log::debug!("polygon edge index not built: {}", e);
            None
        }
    }
}

/// `true` if some stretch of an edge of `polygon` lies inside or along the boundary of `other`.
///
/// Each edge is split at all points where it meets an edge of `other`. The pieces then lie either
/// entirely inside, entirely outside or along the boundary of `other`, so testing the midpoint of
/// each piece decides it.
fn edge_inside<T>(
    polygon: &Polygon<T>,
    other: &Polygon<T>,
    other_index: Option<&StaticAABB2DIndex<T>>,
    eps: T,
) -> bool
where
    T: Real,
{
    let mut query_stack = Vec::with_capacity(8);
    let all_edges: Vec<usize> = (0..other.vertex_count()).collect();
    let mut splits: Vec<T> = Vec::new();
    let other_count = other.vertex_count();

    for (v1, v2) in polygon.iter_edges() {
        let edge_length = (v2 - v1).length();
        if edge_length <= eps {
            continue;
        }

        let queried;
        let candidates = match other_index {
            Some(index) => {
                queried = index.query_with_stack(
                    num_traits::real::Real::min(v1.x, v2.x) - eps,
                    num_traits::real::Real::min(v1.y, v2.y) - eps,
                    num_traits::real::Real::max(v1.x, v2.x) + eps,
                    num_traits::real::Real::max(v1.y, v2.y) + eps,
                    &mut query_stack,
                );
                &queried
            }
            None => &all_edges,
        };

        splits.clear();
        splits.push(T::zero());
        splits.push(T::one());
        for &i in candidates.iter() {
            let u1 = other.points[i];
            let u2 = other.points[(i + 1) % other_count];
            match line_line_intr(v1, v2, u1, u2, eps) {
                LineLineIntr::TrueIntersect { seg1_t, .. } => splits.push(seg1_t),
                LineLineIntr::Overlapping { seg2_t0, seg2_t1 } => {
                    splits.push(parametric_from_point(
                        v1,
                        v2,
                        point_from_parametric(u1, u2, seg2_t0),
                    ));
                    splits.push(parametric_from_point(
                        v1,
                        v2,
                        point_from_parametric(u1, u2, seg2_t1),
                    ));
                }
                LineLineIntr::NoIntersect | LineLineIntr::FalseIntersect { .. } => {}
            }
        }

        for t in splits.iter_mut() {
            *t = num_traits::clamp(*t, T::zero(), T::one());
        }
        splits.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        for w in splits.windows(2) {
            if (w[1] - w[0]) * edge_length <= eps {
                continue;
            }
            let mid = point_from_parametric(v1, v2, (w[0] + w[1]) / T::two());
            if other.locate_point_eps(mid, eps) != PointLocation::Outside {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[(f64, f64)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, y)| Vector2::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn construction_cleans_points() {
        let p = poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(p.vertex_count(), 3);
        assert_eq!(p.area(), 0.5);
        assert!(Polygon::new(vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)]).is_err());
        assert!(Polygon::new(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, f64::NAN),
            Vector2::new(1.0, 1.0)
        ])
        .is_err());
    }

    #[test]
    fn contained_polygon_intersects() {
        let outer = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let inner = poly(&[(4.0, 4.0), (6.0, 4.0), (5.0, 6.0)]);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn crossing_without_contained_vertices() {
        // a plus sign, no vertex of either polygon is inside the other
        let h = poly(&[(0.0, 2.0), (6.0, 2.0), (6.0, 4.0), (0.0, 4.0)]);
        let v = poly(&[(2.0, 0.0), (4.0, 0.0), (4.0, 6.0), (2.0, 6.0)]);
        assert!(h.intersects(&v));
    }

    #[test]
    fn vertex_touching_edge_does_not_intersect() {
        let a = poly(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let b = poly(&[(4.0, 2.0), (6.0, 1.0), (6.0, 3.0)]);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn concave_polygon_pocket() {
        // U shape with a triangle sitting in its pocket
        let u = poly(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]);
        let in_pocket = poly(&[(2.5, 3.0), (3.5, 3.0), (3.0, 5.0)]);
        assert!(!u.intersects(&in_pocket));
        let into_arm = poly(&[(2.5, 3.0), (4.5, 3.0), (3.0, 5.0)]);
        assert!(u.intersects(&into_arm));
    }

    #[test]
    fn identical_polygons_intersect() {
        let a = poly(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(a.intersects(&a.clone()));
    }
}
