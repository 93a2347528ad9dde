use crate::{
    core::traits::Real,
    error::{GeometryError, Result},
};

/// Piecewise linear lateral offset as a function of arc length fraction.
///
/// Positive offsets are to the left of the direction of travel. Fractions outside the
/// breakpoint range are clamped to the first or last offset.
///
/// # Examples
///
/// ```
/// # use lane_contours::polyline::OffsetProfile;
/// let profile = OffsetProfile::new(vec![0.0, 0.5, 1.0], vec![1.0, 2.0, 2.0]).unwrap();
/// assert_eq!(profile.apply(0.25), 1.5);
/// assert_eq!(profile.apply(-3.0), 1.0);
/// assert_eq!(profile.apply(0.75), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetProfile<T = f64> {
    fractions: Vec<T>,
    offsets: Vec<T>,
}

impl<T> OffsetProfile<T>
where
    T: Real,
{
    /// Create a profile from matching `fractions` and `offsets`.
    ///
    /// Fails with [GeometryError::InvalidArgument] if the lengths differ, fewer than two pairs are
    /// given, a value is not finite, or the fractions are not strictly increasing within `[0, 1]`.
    pub fn new(fractions: Vec<T>, offsets: Vec<T>) -> Result<Self> {
        if fractions.len() != offsets.len() {
            return Err(GeometryError::invalid(format!(
                "offset profile has {} fractions but {} offsets",
                fractions.len(),
                offsets.len()
            )));
        }
        if fractions.len() < 2 {
            return Err(GeometryError::invalid(
                "offset profile needs at least 2 (fraction, offset) pairs",
            ));
        }
        if fractions.iter().chain(offsets.iter()).any(|v| !v.is_finite()) {
            return Err(GeometryError::invalid(
                "offset profile values must be finite",
            ));
        }
        if fractions[0] < T::zero() || fractions[fractions.len() - 1] > T::one() {
            return Err(GeometryError::invalid(
                "offset profile fractions must lie in [0, 1]",
            ));
        }
        if fractions.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GeometryError::invalid(
                "offset profile fractions must be strictly increasing",
            ));
        }

        Ok(OffsetProfile { fractions, offsets })
    }

    /// Same offset everywhere.
    pub fn constant(offset: T) -> Self {
        OffsetProfile {
            fractions: vec![T::zero(), T::one()],
            offsets: vec![offset, offset],
        }
    }

    /// Offset changing linearly from `start` to `end`.
    pub fn linear(start: T, end: T) -> Self {
        OffsetProfile {
            fractions: vec![T::zero(), T::one()],
            offsets: vec![start, end],
        }
    }

    /// Offset at `fraction`.
    pub fn apply(&self, fraction: T) -> T {
        let n = self.fractions.len();
        if fraction <= self.fractions[0] {
            return self.offsets[0];
        }
        if fraction >= self.fractions[n - 1] {
            return self.offsets[n - 1];
        }

        // first breakpoint strictly greater than fraction
        let hi = self.fractions.partition_point(|&f| f <= fraction);
        let lo = hi - 1;
        let t = (fraction - self.fractions[lo]) / (self.fractions[hi] - self.fractions[lo]);
        self.offsets[lo] + (self.offsets[hi] - self.offsets[lo]) * t
    }

    #[inline]
    pub fn fractions(&self) -> &[T] {
        &self.fractions
    }

    #[inline]
    pub fn offsets(&self) -> &[T] {
        &self.offsets
    }

    pub fn max_abs_offset(&self) -> T {
        self.offsets
            .iter()
            .fold(T::zero(), |acc, o| num_traits::real::Real::max(acc, o.abs()))
    }

    /// `true` if every breakpoint has the same offset.
    pub fn is_constant(&self) -> bool {
        self.offsets.iter().all(|&o| o == self.offsets[0])
    }

    /// Profile with every offset negated (left and right swapped).
    pub fn mirrored(&self) -> Self {
        OffsetProfile {
            fractions: self.fractions.clone(),
            offsets: self.offsets.iter().map(|&o| -o).collect(),
        }
    }

    /// Profile for traversing the same curve in the opposite direction.
    ///
    /// Fractions become `1 - f`, offsets are negated since left and right swap with the direction
    /// of travel.
    pub fn reversed(&self) -> Self {
        OffsetProfile {
            fractions: self.fractions.iter().rev().map(|&f| T::one() - f).collect(),
            offsets: self.offsets.iter().rev().map(|&o| -o).collect(),
        }
    }
}
