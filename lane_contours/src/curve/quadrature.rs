const GL5_NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];

const GL5_WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

/// Composite 5 point Gauss-Legendre quadrature of `f` over `[a, b]` using `intervals` equal
/// sub intervals.
pub(crate) fn gauss_legendre<V, F>(a: f64, b: f64, intervals: usize, zero: V, mut f: F) -> V
where
    V: Copy + std::ops::Add<Output = V> + Scale,
    F: FnMut(f64) -> V,
{
    let n = intervals.max(1);
    let h = (b - a) / n as f64;
    let mut sum = zero;
    for i in 0..n {
        let lo = a + h * i as f64;
        let half = 0.5 * h;
        let mid = lo + half;
        for (x, w) in GL5_NODES.iter().zip(GL5_WEIGHTS.iter()) {
            sum = sum + f(mid + half * x).scaled(w * half);
        }
    }
    sum
}

/// Multiplication by a scalar, for quadrature over scalars and vectors alike.
pub(crate) trait Scale {
    fn scaled(self, factor: f64) -> Self;
}

impl Scale for f64 {
    #[inline]
    fn scaled(self, factor: f64) -> Self {
        self * factor
    }
}

impl Scale for crate::core::math::Vector2 {
    #[inline]
    fn scaled(self, factor: f64) -> Self {
        self.scale(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Vector2;

    #[test]
    fn integrates_polynomials_exactly() {
        // degree 9 is exact for 5 point rules
        let v = gauss_legendre(0.0, 2.0, 1, 0.0, |x| x.powi(9));
        assert!((v - 102.4).abs() < 1e-10);
    }

    #[test]
    fn integrates_vectors() {
        let v = gauss_legendre(0.0, std::f64::consts::PI, 4, Vector2::zero(), |x| {
            Vector2::new(x.cos(), x.sin())
        });
        assert!(v.x.abs() < 1e-10);
        assert!((v.y - 2.0).abs() < 1e-10);
    }
}
