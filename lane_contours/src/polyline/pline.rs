use std::ops::Index;

use static_aabb2d_index::AABB;

use crate::{
    core::{
        math::{dist_squared, point_from_parametric, Vector2},
        traits::Real,
    },
    error::{GeometryError, Result},
    polyline::{internal::pline_offset, OffsetOptions, OffsetProfile},
};

/// Open polyline of at least two points where no two consecutive points coincide.
///
/// Instances are immutable, every operation producing geometry returns a new polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline<T = f64> {
    points: Vec<Vector2<T>>,
    length: T,
}

impl<T> Polyline<T>
where
    T: Real,
{
    /// Create a polyline from `points`.
    ///
    /// Fails with [GeometryError::InvalidArgument] when fewer than two points are given, a
    /// coordinate is not finite, or two consecutive points are exactly equal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lane_contours::core::math::Vector2;
    /// # use lane_contours::polyline::Polyline;
    /// let pline = Polyline::new(vec![Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0)]).unwrap();
    /// assert_eq!(pline.length(), 5.0);
    /// assert!(Polyline::new(vec![Vector2::new(0.0, 0.0)]).is_err());
    /// ```
    pub fn new(points: Vec<Vector2<T>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::invalid(format!(
                "polyline needs at least 2 points, got {}",
                points.len()
            )));
        }

        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::invalid(format!(
                "polyline point {} is not finite",
                i
            )));
        }

        if let Some(i) = points.windows(2).position(|w| w[0] == w[1]) {
            return Err(GeometryError::invalid(format!(
                "polyline points {} and {} coincide",
                i,
                i + 1
            )));
        }

        Ok(Self::from_points_unchecked(points))
    }

    /// Create a polyline from `points` dropping each point within `pos_equal_eps` of the previous
    /// kept point (the last point always survives, replacing its predecessor when they collide).
    pub fn new_remove_repeat(points: Vec<Vector2<T>>, pos_equal_eps: T) -> Result<Self> {
        let count = points.len();
        let cleaned = remove_repeat_points(points, pos_equal_eps);
        if cleaned.len() < 2 {
            return Err(GeometryError::invalid(format!(
                "polyline needs at least 2 distinct points, got {} of {}",
                cleaned.len(),
                count
            )));
        }
        Self::new(cleaned)
    }

    /// Internal constructor, caller guarantees the invariants.
    pub(crate) fn from_points_unchecked(points: Vec<Vector2<T>>) -> Self {
        debug_assert!(points.len() >= 2);
        let length = points
            .windows(2)
            .fold(T::zero(), |acc, w| acc + (w[1] - w[0]).length());
        Polyline { points, length }
    }

    /// Number of points.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Point at `index`, or [GeometryError::OutOfRange].
    pub fn get(&self, index: usize) -> Result<Vector2<T>> {
        self.points
            .get(index)
            .copied()
            .ok_or(GeometryError::OutOfRange {
                index,
                len: self.points.len(),
            })
    }

    #[inline]
    pub fn first(&self) -> Vector2<T> {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> Vector2<T> {
        self.points[self.points.len() - 1]
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<T>] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<Vector2<T>> {
        self.points
    }

    /// Iterate over the points.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Vector2<T>> + '_ {
        self.points.iter().copied()
    }

    /// Iterate over the segments as `(start, end)` pairs.
    #[inline]
    pub fn iter_segments(&self) -> impl Iterator<Item = (Vector2<T>, Vector2<T>)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total path length (cached).
    #[inline]
    pub fn length(&self) -> T {
        self.length
    }

    /// Axis aligned bounding box of all points.
    pub fn extents(&self) -> AABB<T> {
        let p0 = self.points[0];
        self.points.iter().skip(1).fold(
            AABB::new(p0.x, p0.y, p0.x, p0.y),
            |mut acc, p| {
                acc.min_x = num_traits::real::Real::min(acc.min_x, p.x);
                acc.min_y = num_traits::real::Real::min(acc.min_y, p.y);
                acc.max_x = num_traits::real::Real::max(acc.max_x, p.x);
                acc.max_y = num_traits::real::Real::max(acc.max_y, p.y);
                acc
            },
        )
    }

    /// Largest absolute coordinate value, the magnitude epsilons are scaled against.
    pub fn max_coordinate_magnitude(&self) -> T {
        self.points
            .iter()
            .fold(T::zero(), |acc, p| num_traits::real::Real::max(acc, p.max_abs_component()))
    }

    /// Same points in reverse order.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Polyline {
            points,
            length: self.length,
        }
    }

    /// Cumulative arc length fraction of every point, `0` at the first and `1` at the last.
    pub fn vertex_fractions(&self) -> Vec<T> {
        let mut result = Vec::with_capacity(self.points.len());
        let mut acc = T::zero();
        result.push(T::zero());
        for (i, (p0, p1)) in self.iter_segments().enumerate() {
            acc = acc + (p1 - p0).length();
            if i + 1 == self.segment_count() {
                result.push(T::one());
            } else {
                result.push(acc / self.length);
            }
        }
        result
    }

    /// Point at arc length fraction `fraction`, clamped to `[0, 1]`.
    pub fn location_at_fraction(&self, fraction: T) -> Vector2<T> {
        let (index, t) = self.segment_at_fraction(fraction);
        point_from_parametric(self.points[index], self.points[index + 1], t)
    }

    /// Unit direction of the segment containing arc length fraction `fraction`.
    pub fn direction_at_fraction(&self, fraction: T) -> Vector2<T> {
        let (index, _) = self.segment_at_fraction(fraction);
        (self.points[index + 1] - self.points[index]).normalize()
    }

    /// Segment index and segment parameter at `fraction` (clamped).
    fn segment_at_fraction(&self, fraction: T) -> (usize, T) {
        let fraction = num_traits::clamp(fraction, T::zero(), T::one());
        let target = fraction * self.length;
        let mut acc = T::zero();
        let last = self.segment_count() - 1;
        for (i, (p0, p1)) in self.iter_segments().enumerate() {
            let seg_len = (p1 - p0).length();
            if i == last || acc + seg_len >= target {
                let t = num_traits::clamp((target - acc) / seg_len, T::zero(), T::one());
                return (i, t);
            }
            acc = acc + seg_len;
        }
        (last, T::one())
    }

    /// Part of the polyline between arc length fractions `start` and `end`.
    ///
    /// Fails with [GeometryError::InvalidArgument] unless `0 <= start < end <= 1`.
    pub fn extract_fractional(&self, start: T, end: T) -> Result<Self> {
        if !(start >= T::zero() && start < end && end <= T::one()) {
            return Err(GeometryError::invalid(format!(
                "fractional range [{}, {}] must satisfy 0 <= start < end <= 1",
                start, end
            )));
        }

        let (i0, t0) = self.segment_at_fraction(start);
        let (i1, t1) = self.segment_at_fraction(end);
        let mut points = Vec::with_capacity(i1 - i0 + 2);
        points.push(point_from_parametric(self.points[i0], self.points[i0 + 1], t0));
        points.extend_from_slice(&self.points[i0 + 1..=i1]);
        points.push(point_from_parametric(self.points[i1], self.points[i1 + 1], t1));
        let eps = T::scaled_epsilon(self.max_coordinate_magnitude(), T::from_f64(1e-12));
        Self::new_remove_repeat(points, eps)
    }

    /// Join polylines end to start.
    ///
    /// Each line must start within `tolerance` of where the previous one ended, the shared point
    /// is kept once.
    pub fn concatenate(tolerance: T, lines: &[&Polyline<T>]) -> Result<Self> {
        let (first, rest) = lines
            .split_first()
            .ok_or_else(|| GeometryError::invalid("concatenate needs at least one polyline"))?;

        let mut points = first.points.clone();
        for (i, line) in rest.iter().enumerate() {
            let gap = dist_squared(points[points.len() - 1], line.first()).sqrt();
            if gap > tolerance {
                return Err(GeometryError::invalid(format!(
                    "gap of {} between polyline {} and {} exceeds tolerance {}",
                    gap,
                    i,
                    i + 1,
                    tolerance
                )));
            }
            points.extend_from_slice(&line.points[1..]);
        }

        let eps = T::scaled_epsilon(
            lines
                .iter()
                .fold(T::zero(), |acc, l| num_traits::real::Real::max(acc, l.max_coordinate_magnitude())),
            T::from_f64(1e-12),
        );
        Self::new_remove_repeat(points, eps)
    }

    /// Fuzzy compare point by point.
    pub fn fuzzy_eq_eps(&self, other: &Self, eps: T) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(other.points.iter())
                .all(|(a, b)| a.fuzzy_eq_eps(*b, eps))
    }
}

/// Lateral offsetting, positive offsets are to the left of the direction of travel.
impl<T> Polyline<T>
where
    T: Real,
{
    /// Offset by a constant distance using default options.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lane_contours::core::math::Vector2;
    /// # use lane_contours::polyline::Polyline;
    /// let line = Polyline::new(vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]).unwrap();
    /// let left = line.offset(2.0).unwrap();
    /// assert_eq!(left.points(), &[Vector2::new(0.0, 2.0), Vector2::new(10.0, 2.0)]);
    /// ```
    pub fn offset(&self, offset: T) -> Result<Polyline<T>> {
        self.offset_opt(offset, &OffsetOptions::new())
    }

    pub fn offset_opt(&self, offset: T, options: &OffsetOptions<T>) -> Result<Polyline<T>> {
        pline_offset::offset_constant(self, offset, options)
    }

    /// Offset by `profile` evaluated at the arc length fraction along this polyline.
    pub fn offset_profile(&self, profile: &OffsetProfile<T>) -> Result<Polyline<T>> {
        self.offset_profile_opt(profile, &OffsetOptions::new())
    }

    pub fn offset_profile_opt(
        &self,
        profile: &OffsetProfile<T>,
        options: &OffsetOptions<T>,
    ) -> Result<Polyline<T>> {
        pline_offset::offset_variable(self, profile, options)
    }

    /// Offset by the piecewise linear profile given as parallel `fractions` and `offsets` arrays.
    ///
    /// Fails with [GeometryError::InvalidArgument] when the arrays differ in length, have fewer
    /// than two entries, or the fractions are not strictly increasing within `[0, 1]`.
    pub fn offset_fractions(&self, fractions: &[T], offsets: &[T]) -> Result<Polyline<T>> {
        let profile = OffsetProfile::new(fractions.to_vec(), offsets.to_vec())?;
        self.offset_profile(&profile)
    }
}

impl<T> Index<usize> for Polyline<T> {
    type Output = Vector2<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

/// Drop points within `pos_equal_eps` of the previously kept point, always keeping the first and
/// the last point.
pub(crate) fn remove_repeat_points<T>(points: Vec<Vector2<T>>, pos_equal_eps: T) -> Vec<Vector2<T>>
where
    T: Real,
{
    let mut result: Vec<Vector2<T>> = Vec::with_capacity(points.len());
    let last_index = points.len().saturating_sub(1);
    for (i, p) in points.into_iter().enumerate() {
        match result.last() {
            Some(prev) if prev.fuzzy_eq_eps(p, pos_equal_eps) => {
                if i == last_index && result.len() > 1 {
                    let n = result.len();
                    result[n - 1] = p;
                }
            }
            _ => result.push(p),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    fn square_path() -> Polyline<f64> {
        Polyline::new(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_consecutive_duplicates() {
        let r = Polyline::new(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
        ]);
        assert!(matches!(r, Err(GeometryError::InvalidArgument(_))));
    }

    #[test]
    fn remove_repeat_keeps_last_point() {
        let pts = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0 + 1e-12, 0.0),
        ];
        let p = Polyline::new_remove_repeat(pts, 1e-9).unwrap();
        assert_eq!(p.vertex_count(), 2);
        assert_eq!(p.last(), Vector2::new(1.0 + 1e-12, 0.0));
    }

    #[test]
    fn get_out_of_range() {
        let p = square_path();
        assert_eq!(p.get(3).unwrap(), Vector2::new(0.0, 1.0));
        assert_eq!(
            p.get(4),
            Err(GeometryError::OutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn fractions_and_locations() {
        let p = square_path();
        assert!(p.length().fuzzy_eq(3.0));
        let f = p.vertex_fractions();
        assert_eq!(f.len(), 4);
        assert!(f[1].fuzzy_eq(1.0 / 3.0));
        assert_eq!(f[3], 1.0);
        assert!(p.location_at_fraction(0.5).fuzzy_eq(Vector2::new(1.0, 0.5)));
        assert!(p.location_at_fraction(2.0).fuzzy_eq(Vector2::new(0.0, 1.0)));
        assert!(p.location_at_fraction(-1.0).fuzzy_eq(Vector2::new(0.0, 0.0)));
        assert!(p.direction_at_fraction(0.5).fuzzy_eq(Vector2::new(0.0, 1.0)));
        assert!(p.direction_at_fraction(0.9).fuzzy_eq(Vector2::new(-1.0, 0.0)));
        assert_eq!(p.into_points().len(), 4);
    }

    #[test]
    fn extract_and_concatenate() {
        let p = square_path();
        let a = p.extract_fractional(0.0, 0.5).unwrap();
        let b = p.extract_fractional(0.5, 1.0).unwrap();
        assert!(a.last().fuzzy_eq(Vector2::new(1.0, 0.5)));
        assert!(b.first().fuzzy_eq(Vector2::new(1.0, 0.5)));
        let joined = Polyline::concatenate(1e-9, &[&a, &b]).unwrap();
        assert_eq!(joined.vertex_count(), 5);
        assert!(joined.length().fuzzy_eq(p.length()));
        assert!(joined.first().fuzzy_eq(p.first()));
        assert!(joined.last().fuzzy_eq(p.last()));
        assert!(p.extract_fractional(0.5, 0.5).is_err());
        assert!(Polyline::concatenate(1e-9, &[&b, &a]).is_err());
    }

    #[test]
    fn reversed_swaps_offset_side() {
        let p = square_path();
        let r = p.reversed();
        assert_eq!(r.first(), p.last());
        assert_eq!(r.length(), p.length());

        let inside = p.offset(0.25).unwrap();
        let inside_reversed = r.offset(-0.25).unwrap().reversed();
        assert!(inside.fuzzy_eq_eps(&inside_reversed, 1e-12));
        assert!(inside[1].fuzzy_eq(Vector2::new(0.75, 0.25)));
    }

    #[test]
    fn extents_cover_all_points() {
        let e = square_path().extents();
        assert_eq!((e.min_x, e.min_y, e.max_x, e.max_y), (0.0, 0.0, 1.0, 1.0));
    }
}
