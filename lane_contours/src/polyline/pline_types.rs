use crate::{core::traits::Real, diagnostics::Diagnostics};

/// Options for offsetting a [super::Polyline].
///
/// Epsilons are relative: they are multiplied by the coordinate magnitude of the input (see
/// [crate::core::traits::FuzzyEq::scaled_epsilon]) so the same options work for lines spanning
/// millimeters or kilometers.
#[derive(Debug, Clone)]
pub struct OffsetOptions<'a, T>
where
    T: Real,
{
    /// Relative epsilon for considering two positions equal.
    pub pos_equal_eps: T,
    /// Relative perpendicular distance below which an interior point is considered collinear with
    /// its neighbors and removed before offsetting.
    pub collinear_eps: T,
    /// Turns sharper than this (`1 + cos(turn)` below the value) are treated as reversals.
    pub reversal_eps: T,
    /// Maximum miter length as a multiple of the offset on the outside of a corner. Corners with a
    /// longer miter are beveled with extra points.
    pub miter_limit: T,
    /// Maximum change of a variable offset between consecutive samples, as a fraction of the
    /// largest absolute offset of the profile.
    pub offset_change_ratio: T,
    /// Upper bound on the samples inserted into a single reference segment by variable offsetting.
    pub max_segment_subdivisions: usize,
    /// Receiver of degenerate geometry events, `None` logs them at debug level.
    pub diagnostics: Option<&'a dyn Diagnostics>,
}

impl<'a, T> OffsetOptions<'a, T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from_f64(1e-9),
            collinear_eps: T::from_f64(1e-10),
            reversal_eps: T::from_f64(1e-12),
            miter_limit: T::from_f64(4.0),
            offset_change_ratio: T::from_f64(0.05),
            max_segment_subdivisions: 1000,
            diagnostics: None,
        }
    }

    /// Options reporting to `diagnostics`.
    #[inline]
    pub fn with_diagnostics(diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            diagnostics: Some(diagnostics),
            ..Self::new()
        }
    }
}

impl<'a, T> Default for OffsetOptions<'a, T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
