use lane_contours::core::{
    math::{line_line_intr, LineLineIntr::*, Vector2},
    traits::FuzzyEq,
};
use std::f64::consts::{FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

const EPS: f64 = 1e-9;

macro_rules! assert_case_eq {
    ($left:expr, $right:expr) => {
        match ($left, $right) {
            (NoIntersect, NoIntersect) => {}
            (
                TrueIntersect {
                    seg1_t: a1,
                    seg2_t: b1,
                },
                TrueIntersect {
                    seg1_t: a2,
                    seg2_t: b2,
                },
            )
            | (
                FalseIntersect {
                    seg1_t: a1,
                    seg2_t: b1,
                },
                FalseIntersect {
                    seg1_t: a2,
                    seg2_t: b2,
                },
            )
            | (
                Overlapping {
                    seg2_t0: a1,
                    seg2_t1: b1,
                },
                Overlapping {
                    seg2_t0: a2,
                    seg2_t1: b2,
                },
            ) if a1.fuzzy_eq(a2) && b1.fuzzy_eq(b2) => {}
            _ => panic!(
                "intersect cases do not match: left: {:?}, right: {:?}",
                $left, $right
            ),
        };
    };
}

#[test]
fn crossing_edges() {
    let v1 = Vector2::new(0.0, 0.0);
    let v2 = Vector2::new(4.0, 4.0);
    let u1 = Vector2::new(0.0, 4.0);
    let u2 = Vector2::new(4.0, 0.0);
    assert_case_eq!(
        line_line_intr(v1, v2, u1, u2, EPS),
        TrueIntersect {
            seg1_t: 0.5,
            seg2_t: 0.5
        }
    );
}

#[test]
fn lines_meet_beyond_segment_end() {
    let v1 = Vector2::new(0.0, 0.0);
    let v2 = Vector2::new(1.0, 0.0);
    let u1 = Vector2::new(3.0, -1.0);
    let u2 = Vector2::new(3.0, 1.0);
    assert_case_eq!(
        line_line_intr(v1, v2, u1, u2, EPS),
        FalseIntersect {
            seg1_t: 3.0,
            seg2_t: 0.5
        }
    );
}

#[test]
fn shared_end_point_at_any_angle() {
    let v1 = Vector2::new(-2.0, 1.0);
    let v2 = Vector2::new(2.0, 1.0);
    let u1 = v2;
    let u2 = Vector2::new(5.0, 1.0);
    // collinear, touching end to start
    assert_case_eq!(
        line_line_intr(v1, v2, u1, u2, EPS),
        TrueIntersect {
            seg1_t: 1.0,
            seg2_t: 0.0
        }
    );

    for angle in [FRAC_PI_6, FRAC_PI_4, FRAC_PI_3, -FRAC_PI_4] {
        let u2 = u2.rotate_about(u1, angle);
        assert_case_eq!(
            line_line_intr(v1, v2, u1, u2, EPS),
            TrueIntersect {
                seg1_t: 1.0,
                seg2_t: 0.0
            }
        );
    }
}

#[test]
fn parallel_offset_edges_do_not_intersect() {
    let v1 = Vector2::new(0.0, 0.0);
    let v2 = Vector2::new(100.0, 50.0);
    let shift = Vector2::new(-50.0, 100.0).normalize().scale(1e-6);
    assert_case_eq!(
        line_line_intr(v1, v2, v1 + shift, v2 + shift, EPS),
        NoIntersect::<f64>
    );
}

#[test]
fn collinear_disjoint_edges() {
    let v1 = Vector2::new(0.0, 0.0);
    let v2 = Vector2::new(1.0, 1.0);
    let u1 = Vector2::new(2.0, 2.0);
    let u2 = Vector2::new(3.0, 3.0);
    assert_case_eq!(line_line_intr(v1, v2, u1, u2, EPS), NoIntersect::<f64>);
}

#[test]
fn partially_overlapping_edges() {
    let v1 = Vector2::new(0.0, 0.0);
    let v2 = Vector2::new(6.0, 0.0);
    let u1 = Vector2::new(4.0, 0.0);
    let u2 = Vector2::new(12.0, 0.0);
    assert_case_eq!(
        line_line_intr(v1, v2, u1, u2, EPS),
        Overlapping {
            seg2_t0: 0.0,
            seg2_t1: 0.25
        }
    );

    // opposing direction gives the same range along the second segment
    assert_case_eq!(
        line_line_intr(v2, v1, u1, u2, EPS),
        Overlapping {
            seg2_t0: 0.0,
            seg2_t1: 0.25
        }
    );
}

#[test]
fn contained_edge_overlaps() {
    let v1 = Vector2::new(-1.0, -1.0);
    let v2 = Vector2::new(1.0, 1.0);
    let u1 = Vector2::new(0.0, 0.0);
    let u2 = Vector2::new(0.5, 0.5);
    assert_case_eq!(
        line_line_intr(v1, v2, u1, u2, EPS),
        Overlapping {
            seg2_t0: 0.0,
            seg2_t1: 1.0
        }
    );
    assert_case_eq!(
        line_line_intr(u1, u2, v1, v2, EPS),
        Overlapping {
            seg2_t0: 0.5,
            seg2_t1: 0.75
        }
    );
}

#[test]
fn degenerate_point_segment() {
    let v1 = Vector2::new(0.0, -3.0);
    let v2 = Vector2::new(0.0, 3.0);
    let p = Vector2::new(0.0, 1.5);
    assert_case_eq!(
        line_line_intr(v1, v2, p, p, EPS),
        TrueIntersect {
            seg1_t: 0.75,
            seg2_t: 0.0
        }
    );
    assert_case_eq!(
        line_line_intr(p, p, v1, v2, EPS),
        TrueIntersect {
            seg1_t: 0.0,
            seg2_t: 0.75
        }
    );

    let off = Vector2::new(0.1, 1.5);
    assert_case_eq!(line_line_intr(v1, v2, off, off, EPS), NoIntersect::<f64>);
}

#[test]
fn epsilon_is_a_distance_for_long_segments() {
    // end of the second segment is 1e-10 short of a 10 km edge, within epsilon
    let v1 = Vector2::new(0.0, 0.0);
    let v2 = Vector2::new(10_000.0, 0.0);
    let u1 = Vector2::new(5_000.0, 1e-10);
    let u2 = Vector2::new(5_000.0, 10.0);
    match line_line_intr(v1, v2, u1, u2, EPS) {
        TrueIntersect { seg1_t, seg2_t } => {
            assert!(seg1_t.fuzzy_eq(0.5));
            assert!(seg2_t.fuzzy_eq_eps(0.0, 1e-10));
        }
        r => panic!("expected true intersect, got {:?}", r),
    }
}
