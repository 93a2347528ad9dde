/// Macro used for test assertions.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Construct an `f64` polyline from a list of (x, y) tuples, panics if fewer than two points are
/// given.
///
/// # Examples
///
/// ```
/// # use lane_contours::polyline;
/// # use lane_contours::core::math::Vector2;
/// let line = polyline![(0.0, 0.0), (3.0, 4.0)];
/// assert_eq!(line.vertex_count(), 2);
/// assert_eq!(line[1], Vector2::new(3.0, 4.0));
/// ```
#[macro_export]
macro_rules! polyline {
    ($( $x:expr ),* $(,)?) => {
        {
            let points = vec![$($crate::core::math::Vector2::new($x.0, $x.1)),*];
            match $crate::polyline::Polyline::<f64>::new(points) {
                Ok(pl) => pl,
                Err(e) => panic!("invalid polyline literal: {}", e),
            }
        }
    };
}
