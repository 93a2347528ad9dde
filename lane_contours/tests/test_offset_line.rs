mod test_utils;

use lane_contours::{
    core::math::Vector2,
    diagnostics::{CollectDiagnostics, DegenerateGeometry},
    polyline,
    polyline::{OffsetOptions, OffsetProfile, Polyline},
    GeometryError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_utils::{assert_no_repeat_points, is_simple, signed_line_distance, POS_EQ_EPS};

#[test]
fn diagonal_segment_to_the_right() {
    let line = polyline![(10.0, 20.0), (30.0, 40.0)];
    let result = line.offset(-2.0).unwrap();
    assert_eq!(result.vertex_count(), 2);

    let shift = Vector2::new(1.0, -1.0).scale(2.0f64.sqrt());
    assert!(result[0].fuzzy_eq_eps(Vector2::new(10.0, 20.0) + shift, 1e-12));
    assert!(result[1].fuzzy_eq_eps(Vector2::new(30.0, 40.0) + shift, 1e-12));
    for p in result.iter() {
        let d = signed_line_distance(p, line[0], line[1]);
        assert!((d + 2.0).abs() < 1e-12);
    }
}

#[test]
fn offset_round_trip() {
    let straight = polyline![(-150.0, 3.0), (140.0, 130.0)];
    let back = straight.offset(2.5).unwrap().offset(-2.5).unwrap();
    assert!(back.fuzzy_eq_eps(&straight, 1e-9));

    let line = polyline![(-150.0, 3.0), (-20.0, 60.0), (140.0, 130.0)];
    for k in [0.25, 1.0, 3.5, 17.0] {
        let there = line.offset(k).unwrap();
        let back = there.offset(-k).unwrap();
        assert_eq!(back.vertex_count(), line.vertex_count());
        assert!(back.fuzzy_eq_eps(&line, 1e-9), "offset {}", k);
    }
}

#[test]
fn gentle_bends_round_trip() {
    let line = polyline![(0.0, 0.0), (10.0, 5.0), (20.0, 0.0), (30.0, 5.0), (40.0, 0.0)];
    for k in [-1.0, 1.0] {
        let there = line.offset(k).unwrap();
        assert_eq!(there.vertex_count(), 5);
        assert!(is_simple(&there));
        let back = there.offset(-k).unwrap();
        assert!(back.fuzzy_eq_eps(&line, 1e-9));
    }
}

#[test]
fn collinear_points_are_collapsed() {
    let line = polyline![(0.0, 0.0), (1.0, 0.0), (2.0, 1e-13), (3.0, 0.0), (10.0, 0.0)];
    let diag = CollectDiagnostics::new();
    let result = line
        .offset_opt(1.0, &OffsetOptions::with_diagnostics(&diag))
        .unwrap();
    assert_eq!(result.vertex_count(), 2);
    assert!(diag.any(|e| matches!(e, DegenerateGeometry::CollinearPointsRemoved { count: 3 })));
}

#[test]
fn sharp_corner_is_beveled_on_the_outside() {
    // 170 degree turn to the left, offsetting right puts the miter far outside
    let turn = 170f64.to_radians();
    let line = Polyline::new(vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(10.0, 0.0),
        Vector2::new(10.0, 0.0) + Vector2::new(turn.cos(), turn.sin()).scale(10.0),
    ])
    .unwrap();
    let diag = CollectDiagnostics::new();
    let result = line
        .offset_opt(-1.0, &OffsetOptions::with_diagnostics(&diag))
        .unwrap();
    assert!(diag.any(|e| matches!(e, DegenerateGeometry::KinkBeveled { vertex: 1 })));
    assert_eq!(result.vertex_count(), 5);
    let corner = Vector2::new(10.0, 0.0);
    for p in result.points()[1..4].iter() {
        assert!(((*p - corner).length() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn variable_offset_follows_profile() {
    let line = polyline![(0.0, 0.0), (100.0, 0.0)];
    let profile = OffsetProfile::linear(0.0, 10.0);
    let result = line.offset_profile(&profile).unwrap();
    // offset may change by at most 5% of the largest offset per step
    assert_eq!(result.vertex_count(), 21);
    for p in result.iter() {
        assert!((p.y - p.x / 10.0).abs() < 1e-9);
    }
    assert_no_repeat_points(&result, POS_EQ_EPS);
}

#[test]
fn profile_breakpoints_become_samples() {
    let line = polyline![(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (100.0, 50.0)];
    let profile = OffsetProfile::new(vec![0.0, 0.3, 1.0], vec![2.0, 2.0, 3.0]).unwrap();
    let result = line.offset_profile(&profile).unwrap();
    assert!(result
        .iter()
        .any(|p| p.fuzzy_eq_eps(Vector2::new(45.0, 2.0), 1e-9)));
    assert!(result.first().fuzzy_eq(Vector2::new(0.0, 2.0)));
    assert!(result.last().fuzzy_eq(Vector2::new(97.0, 50.0)));
}

#[test]
fn subdivision_cap_is_reported() {
    let line = polyline![(0.0, 0.0), (100.0, 0.0)];
    let profile = OffsetProfile::linear(-5.0, 5.0);
    let diag = CollectDiagnostics::new();
    let options = OffsetOptions {
        max_segment_subdivisions: 4,
        ..OffsetOptions::with_diagnostics(&diag)
    };
    let result = line.offset_profile_opt(&profile, &options).unwrap();
    assert_eq!(result.vertex_count(), 5);
    assert!(diag.any(|e| matches!(
        e,
        DegenerateGeometry::SubdivisionCapReached { segment: 0, cap: 4 }
    )));
}

#[test]
fn offset_fractions_validates_arrays() {
    let line = polyline![(0.0, 0.0), (10.0, 0.0)];
    let invalid =
        |r: Result<Polyline, GeometryError>| matches!(r, Err(GeometryError::InvalidArgument(_)));
    assert!(invalid(line.offset_fractions(&[0.0, 1.0], &[1.0])));
    assert!(invalid(line.offset_fractions(&[0.0], &[1.0])));
    assert!(invalid(line.offset_fractions(&[0.5, 0.5], &[1.0, 2.0])));
    assert!(invalid(line.offset_fractions(&[0.0, 1.5], &[1.0, 2.0])));

    let result = line.offset_fractions(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
    assert_eq!(result.points(), &[Vector2::new(0.0, 1.0), Vector2::new(10.0, 1.0)]);
}

#[test]
fn too_few_points_rejected() {
    assert!(matches!(
        Polyline::new(vec![Vector2::new(1.0, 1.0)]),
        Err(GeometryError::InvalidArgument(_))
    ));
    assert!(matches!(
        Polyline::<f64>::new(vec![]),
        Err(GeometryError::InvalidArgument(_))
    ));
}

#[test]
fn random_kinked_lines_terminate_cleanly() {
    let mut rng = StdRng::seed_from_u64(0x1a9e_ed9e);
    for _ in 0..300 {
        let count = rng.gen_range(2..12);
        let mut points = Vec::with_capacity(count);
        let mut p = Vector2::new(0.0, 0.0);
        points.push(p);
        while points.len() < count {
            let step = Vector2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
            if step.length() < 1e-3 {
                continue;
            }
            p = p + step;
            points.push(p);
        }
        let line = Polyline::new(points).unwrap();
        let simple = is_simple(&line);

        let offset = rng.gen_range(-8.0..8.0);
        match line.offset(offset) {
            Ok(result) => {
                assert!(result.vertex_count() >= 2);
                assert_no_repeat_points(&result, POS_EQ_EPS);
                assert!(result.iter().all(|p| p.is_finite()));
                if simple {
                    assert!(is_simple(&result), "offset {} of {:?}", offset, line);
                }
            }
            Err(e) => assert!(matches!(e, GeometryError::InvalidArgument(_))),
        }

        let profile = OffsetProfile::new(
            vec![0.0, rng.gen_range(0.1..0.9), 1.0],
            vec![
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            ],
        )
        .unwrap();
        match line.offset_profile(&profile) {
            Ok(result) => {
                assert_no_repeat_points(&result, POS_EQ_EPS);
                if simple {
                    assert!(is_simple(&result), "profile {:?} of {:?}", profile, line);
                }
            }
            Err(e) => assert!(matches!(e, GeometryError::InvalidArgument(_))),
        }
    }
}

#[test]
fn bump_folded_by_large_offset_stays_simple() {
    let line = polyline![(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (11.0, 1.0), (11.0, 0.0), (20.0, 0.0)];
    let result = line.offset(-3.0).unwrap();
    assert!(is_simple(&result));
    assert_no_repeat_points(&result, POS_EQ_EPS);
    for p in result.iter() {
        assert!((p.y + 3.0).abs() < 1e-9, "{:?} left the offset line", p);
    }
    assert!(result.first().fuzzy_eq(Vector2::new(0.0, -3.0)));
    assert!(result.last().fuzzy_eq(Vector2::new(20.0, -3.0)));
}

#[test]
fn hook_with_crossing_raw_offset_stays_simple() {
    let line = polyline![(0.0, 0.0), (9.48, 0.57), (14.50, -4.80), (6.80, -0.95)];
    assert!(is_simple(&line));
    let result = line.offset(-0.729).unwrap();
    assert!(is_simple(&result), "{:?}", result);
    assert_no_repeat_points(&result, POS_EQ_EPS);
    assert!(result.first().fuzzy_eq(line.first() + (line[1] - line[0]).normalize().perp().scale(-0.729)));
}
