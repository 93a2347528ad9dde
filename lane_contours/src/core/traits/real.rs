use super::FuzzyOrd;
use static_aabb2d_index::IndexableNum;

/// Trait representing a real number that can be fuzzy compared and ordered, and used as the
/// coordinate type of a [static_aabb2d_index::AABB].
pub trait Real:
    num_traits::real::Real
    + num_traits::Bounded
    + FuzzyOrd
    + std::default::Default
    + std::fmt::Debug
    + std::fmt::Display
    + IndexableNum
    + 'static
{
    #[inline]
    fn pi() -> Self {
        Self::from(std::f64::consts::PI).unwrap()
    }

    #[inline]
    fn tau() -> Self {
        Self::from(std::f64::consts::TAU).unwrap()
    }

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn half() -> Self {
        Self::one() / Self::two()
    }

    /// `true` if the value is neither infinite nor NaN.
    #[inline]
    fn is_finite(self) -> bool {
        num_traits::ToPrimitive::to_f64(&self).map_or(false, f64::is_finite)
    }

    /// Convert an `f64` constant into `Self`.
    ///
    /// Only intended for literal constants (tolerances, ratios) that are always representable.
    #[inline]
    fn from_f64(value: f64) -> Self {
        <Self as num_traits::NumCast>::from(value).unwrap()
    }

    /// Convert a count (number of points, subdivisions) into `Self`.
    #[inline]
    fn from_usize(value: usize) -> Self {
        <Self as num_traits::NumCast>::from(value).unwrap()
    }
}

impl Real for f32 {
    #[inline]
    fn pi() -> Self {
        std::f32::consts::PI
    }

    #[inline]
    fn tau() -> Self {
        std::f32::consts::TAU
    }

    #[inline]
    fn two() -> Self {
        2.0f32
    }

    #[inline]
    fn half() -> Self {
        0.5f32
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Real for f64 {
    #[inline]
    fn pi() -> Self {
        std::f64::consts::PI
    }

    #[inline]
    fn tau() -> Self {
        std::f64::consts::TAU
    }

    #[inline]
    fn two() -> Self {
        2.0f64
    }

    #[inline]
    fn half() -> Self {
        0.5f64
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}
