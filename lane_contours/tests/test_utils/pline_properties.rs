use lane_contours::{
    core::math::{delta_angle, Vector2},
    polyline::Polyline,
};

// positions equal epsilon
pub const POS_EQ_EPS: f64 = 1e-9;

/// Panics if two consecutive points of `pline` are within `eps` of each other.
pub fn assert_no_repeat_points(pline: &Polyline, eps: f64) {
    for (i, (a, b)) in pline.iter_segments().enumerate() {
        assert!(
            !a.fuzzy_eq_eps(b, eps),
            "repeat point at segment {}: {:?} {:?}",
            i,
            a,
            b
        );
    }
}

/// Largest absolute heading change between consecutive segments.
pub fn max_turn(pline: &Polyline) -> f64 {
    let dirs: Vec<Vector2> = pline.iter_segments().map(|(a, b)| b - a).collect();
    dirs.windows(2)
        .map(|w| delta_angle(w[0].angle(), w[1].angle()).abs())
        .fold(0.0, f64::max)
}

/// Largest distance from any point of `pline` to the circle with `center` and `radius`.
pub fn max_circle_distance(pline: &Polyline, center: Vector2, radius: f64) -> f64 {
    pline
        .iter()
        .map(|p| ((p - center).length() - radius).abs())
        .fold(0.0, f64::max)
}

/// Distance from `p` to the line through `a` and `b`, signed positive to the left.
pub fn signed_line_distance(p: Vector2, a: Vector2, b: Vector2) -> f64 {
    let dir = (b - a).normalize();
    dir.perp_dot(p - a)
}

/// `true` if no two non-adjacent segments of `pline` cross or run along each other.
pub fn is_simple(pline: &Polyline) -> bool {
    let segs: Vec<(Vector2, Vector2)> = pline.iter_segments().collect();
    for i in 0..segs.len() {
        for j in i + 2..segs.len() {
            if segments_cross(segs[i], segs[j]) || segments_overlap(segs[i], segs[j]) {
                return false;
            }
        }
    }
    true
}

fn segments_cross((a0, a1): (Vector2, Vector2), (b0, b1): (Vector2, Vector2)) -> bool {
    let d1 = (a1 - a0).perp_dot(b0 - a0);
    let d2 = (a1 - a0).perp_dot(b1 - a0);
    let d3 = (b1 - b0).perp_dot(a0 - b0);
    let d4 = (b1 - b0).perp_dot(a1 - b0);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn segments_overlap((a0, a1): (Vector2, Vector2), (b0, b1): (Vector2, Vector2)) -> bool {
    let dir = a1 - a0;
    let len = dir.length();
    if len < POS_EQ_EPS {
        return false;
    }
    let off0 = dir.perp_dot(b0 - a0) / len;
    let off1 = dir.perp_dot(b1 - a0) / len;
    if off0.abs() > POS_EQ_EPS || off1.abs() > POS_EQ_EPS {
        return false;
    }
    let t0 = dir.dot(b0 - a0) / len;
    let t1 = dir.dot(b1 - a0) / len;
    t0.max(t1).min(len) - t0.min(t1).max(0.0) > POS_EQ_EPS
}
