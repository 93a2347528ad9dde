/// Trait for control flow inside visiting methods.
///
/// Visitors passed to query methods return a value implementing this trait, the query stops as
/// soon as [ControlFlow::should_break] returns `true`.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::Control;
/// # use lane_contours::spatial::{GridIndex, Polygon};
/// # use static_aabb2d_index::AABB;
/// let a = Polygon::rectangle(AABB::new(0.0, 0.0, 2.0, 2.0));
/// let b = Polygon::rectangle(AABB::new(1.0, 1.0, 3.0, 3.0));
/// let mut index = GridIndex::new(AABB::new(0.0, 0.0, 4.0, 4.0), 0.5).unwrap();
/// index.insert(&a);
/// index.insert(&b);
///
/// let query = Polygon::rectangle(AABB::new(0.5, 0.5, 2.5, 2.5));
/// let mut visited = 0;
/// index.visit_intersecting(&query, |_| {
///     visited += 1;
///     Control::Break(())
/// });
/// assert_eq!(visited, 1);
/// ```
pub trait ControlFlow {
    /// Constructs state indicating to continue visiting.
    fn continuing() -> Self;

    /// Returns `true` if visiting should stop.
    fn should_break(&self) -> bool;
}

impl ControlFlow for () {
    #[inline]
    fn continuing() -> Self {}

    #[inline]
    fn should_break(&self) -> bool {
        false
    }
}
