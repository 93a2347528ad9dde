use std::f64::consts::TAU;

use lane_contours::{core::math::Vector2, polyline::Polyline, spatial::Polygon};
use rand::{rngs::StdRng, Rng};

/// Random star shaped polygon (always simple) centered at `center`.
pub fn random_star_polygon(rng: &mut StdRng, center: Vector2, max_radius: f64) -> Polygon {
    let count = rng.gen_range(3..9);
    let mut angles: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..TAU)).collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    angles.dedup_by(|a, b| (*a - *b).abs() < 1e-3);
    while angles.len() < 3 {
        let last = angles.last().copied().unwrap_or(0.0);
        angles.push(last + 1.0);
    }

    let points = angles
        .iter()
        .map(|&a| {
            let r = rng.gen_range(0.2 * max_radius..max_radius);
            center + Vector2::new(a.cos(), a.sin()).scale(r)
        })
        .collect();
    Polygon::new(points).unwrap()
}

/// `count` random star polygons with centers in `[0, extent]` squared, kept at least `max_radius`
/// away from the border.
pub fn random_polygons(rng: &mut StdRng, count: usize, extent: f64, max_radius: f64) -> Vec<Polygon> {
    (0..count)
        .map(|_| {
            let center = Vector2::new(
                rng.gen_range(max_radius..extent - max_radius),
                rng.gen_range(max_radius..extent - max_radius),
            );
            random_star_polygon(rng, center, max_radius)
        })
        .collect()
}

/// Composite Simpson integration of the heading of a clothoid, returns the end point relative to
/// the start.
pub fn integrate_clothoid(
    start_dir: f64,
    k0: f64,
    k1: f64,
    length: f64,
    intervals: usize,
) -> Vector2 {
    let heading = |s: f64| start_dir + k0 * s + 0.5 * (k1 - k0) / length * s * s;
    let h = length / intervals as f64;
    let mut x = 0.0;
    let mut y = 0.0;
    for i in 0..=intervals {
        let w = if i == 0 || i == intervals {
            1.0
        } else if i % 2 == 1 {
            4.0
        } else {
            2.0
        };
        let th = heading(i as f64 * h);
        x += w * th.cos();
        y += w * th.sin();
    }
    Vector2::new(x * h / 3.0, y * h / 3.0)
}

/// Closed lane area between two edge lines running in the same direction.
pub fn lane_polygon(left: &Polyline, right: &Polyline) -> Polygon {
    let points = left.iter().chain(right.iter().rev()).collect();
    Polygon::new(points).unwrap()
}
