/// Fuzzy equality for floating point values.
///
/// Geometric predicates in this crate never compare coordinates exactly. Each comparison either
/// takes an explicit epsilon (`*_eps` variants) or falls back to [FuzzyEq::fuzzy_epsilon].
/// Epsilons that must follow the magnitude of the coordinates involved are derived with
/// [FuzzyEq::scaled_epsilon].
///
/// # Examples
///
/// ```
/// # use lane_contours::core::traits::*;
/// let a = 0.1f64 + 0.2;
/// assert_ne!(a, 0.3);
/// assert!(a.fuzzy_eq(0.3));
///
/// // near 1e6 the fixed epsilon is too tight for values that went through a few operations
/// let eps = f64::scaled_epsilon(1.0e6, 1.0e-12);
/// assert!((1.0e6f64 + 1.0e-7).fuzzy_eq_eps(1.0e6, eps));
/// ```
pub trait FuzzyEq: Sized + Copy {
    /// Default epsilon for fuzzy comparisons.
    fn fuzzy_epsilon() -> Self;

    /// `true` if `self` and `other` differ by less than `fuzzy_epsilon`.
    fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }

    /// `true` if the magnitude of `self` is less than `fuzzy_epsilon`.
    fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_eq_zero(&self) -> bool {
        self.fuzzy_eq_zero_eps(Self::fuzzy_epsilon())
    }

    /// Epsilon relative to a coordinate `magnitude`.
    ///
    /// Returns `relative * magnitude`, but never less than a few units of machine precision at
    /// that magnitude and never less than `relative` itself (magnitudes below one are treated as
    /// one).
    fn scaled_epsilon(magnitude: Self, relative: Self) -> Self;
}

/// Fuzzy ordering built on top of [FuzzyEq].
pub trait FuzzyOrd: FuzzyEq {
    /// `self > other - fuzzy_epsilon`.
    fn fuzzy_gt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_gt(&self, other: Self) -> bool {
        self.fuzzy_gt_eps(other, Self::fuzzy_epsilon())
    }

    /// `self < other + fuzzy_epsilon`.
    fn fuzzy_lt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    #[inline]
    fn fuzzy_lt(&self, other: Self) -> bool {
        self.fuzzy_lt_eps(other, Self::fuzzy_epsilon())
    }

    /// Test if `self` is between `min` and `max`, inclusive within `fuzzy_epsilon`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lane_contours::core::traits::*;
    /// assert!(0.99f64.fuzzy_in_range_eps(1.0, 2.0, 0.05));
    /// assert!(2.0f64.fuzzy_in_range_eps(1.0, 2.0, 1e-5));
    /// assert!(!2.1f64.fuzzy_in_range_eps(1.0, 2.0, 1e-5));
    /// ```
    #[inline]
    fn fuzzy_in_range_eps(&self, min: Self, max: Self, fuzzy_epsilon: Self) -> bool {
        self.fuzzy_gt_eps(min, fuzzy_epsilon) && self.fuzzy_lt_eps(max, fuzzy_epsilon)
    }

    #[inline]
    fn fuzzy_in_range(&self, min: Self, max: Self) -> bool {
        self.fuzzy_in_range_eps(min, max, Self::fuzzy_epsilon())
    }
}

macro_rules! impl_fuzzy {
    ($ty:ty, $eps:expr) => {
        impl FuzzyEq for $ty {
            #[inline]
            fn fuzzy_epsilon() -> Self {
                $eps
            }

            #[inline]
            fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                (*self - other).abs() < fuzzy_epsilon
            }

            #[inline]
            fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool {
                self.abs() < fuzzy_epsilon
            }

            #[inline]
            fn scaled_epsilon(magnitude: Self, relative: Self) -> Self {
                let m = magnitude.abs().max(1.0);
                (relative * m).max(<$ty>::EPSILON * 16.0 * m)
            }
        }

        impl FuzzyOrd for $ty {
            #[inline]
            fn fuzzy_gt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                *self + fuzzy_epsilon > other
            }

            #[inline]
            fn fuzzy_lt_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                *self < other + fuzzy_epsilon
            }
        }
    };
}

impl_fuzzy!(f32, 1.0e-6);
impl_fuzzy!(f64, 1.0e-8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_epsilon_floors_at_machine_precision() {
        assert_eq!(f64::scaled_epsilon(0.5, 1e-9), 1e-9);
        assert!(f64::scaled_epsilon(1e12, 0.0) >= f64::EPSILON * 1e12);
        assert!((f64::scaled_epsilon(-1e3, 1e-9) - 1e-6).abs() < 1e-18);
    }
}
