mod test_utils;

use lane_contours::{
    core::{math::Vector2, Control},
    spatial::{GridIndex, Polygon},
    GeometryError, AABB,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_utils::random_polygons;

fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon {
    Polygon::rectangle(AABB::new(min_x, min_y, max_x, max_y))
}

fn next_up(v: f64) -> f64 {
    debug_assert!(v > 0.0);
    f64::from_bits(v.to_bits() + 1)
}

fn next_down(v: f64) -> f64 {
    debug_assert!(v > 0.0);
    f64::from_bits(v.to_bits() - 1)
}

fn addresses(polygons: &[&Polygon]) -> Vec<*const Polygon> {
    polygons.iter().map(|p| *p as *const Polygon).collect()
}

fn check_queries(
    index: &GridIndex,
    polygons: &[Polygon],
    queries: &[Polygon],
    live: impl Fn(usize) -> bool,
) {
    for q in queries.iter() {
        let expected: Vec<*const Polygon> = polygons
            .iter()
            .enumerate()
            .filter(|(i, p)| live(*i) && p.intersects(q))
            .map(|(_, p)| p as *const Polygon)
            .collect();
        assert_eq!(addresses(&index.query_intersecting(q)), expected);
    }
}

#[test]
fn region_boundary_is_exact() {
    let region = AABB::new(10.0, 10.0, 100.0, 100.0);
    let exact = rect(10.0, 10.0, 100.0, 100.0);
    let over_max_x = rect(10.0, 10.0, next_up(100.0), 100.0);
    let over_max_y = rect(20.0, 20.0, 30.0, next_up(100.0));
    let under_min_x = rect(next_down(10.0), 10.0, 50.0, 50.0);
    let under_min_y = rect(20.0, next_down(10.0), 50.0, 50.0);
    let just_inside = rect(next_up(10.0), next_up(10.0), next_down(100.0), next_down(100.0));

    let mut index = GridIndex::new(region, 1.0).unwrap();
    assert!(index.insert(&exact));
    assert!(!index.insert(&over_max_x));
    assert!(!index.insert(&over_max_y));
    assert!(!index.insert(&under_min_x));
    assert!(!index.insert(&under_min_y));
    assert!(index.insert(&just_inside));
    assert_eq!(index.len(), 2);
}

#[test]
fn queries_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let polygons = random_polygons(&mut rng, 400, 1000.0, 25.0);
    let queries = random_polygons(&mut rng, 100, 1000.0, 60.0);

    let mut index = GridIndex::new(AABB::new(0.0, 0.0, 1000.0, 1000.0), 8.0).unwrap();
    for p in polygons.iter() {
        assert!(index.insert(p));
    }
    assert_eq!(index.len(), polygons.len());

    check_queries(&index, &polygons, &queries, |_| true);

    for p in polygons.iter().step_by(2) {
        assert!(index.remove(p));
    }
    assert_eq!(index.len(), polygons.len() / 2);
    check_queries(&index, &polygons, &queries, |i| i % 2 == 1);
}

#[test]
fn bounds_query_returns_each_polygon_once() {
    let big = rect(1.0, 1.0, 99.0, 99.0);
    let small = rect(40.0, 40.0, 41.0, 41.0);
    let mut index = GridIndex::new(AABB::new(0.0, 0.0, 100.0, 100.0), 0.5).unwrap();
    index.insert(&big);
    index.insert(&small);

    let hits = index.query_bounds(&AABB::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(hits.len(), 2);
    let hits = index.query_bounds(&AABB::new(60.0, 60.0, 70.0, 70.0));
    assert_eq!(addresses(&hits), vec![&big as *const Polygon]);
    // touching boxes are candidates, the polygon predicate decides
    let touching = rect(41.0, 41.0, 42.0, 42.0);
    assert_eq!(index.query_bounds(&touching.bounds()).len(), 2);
    assert_eq!(addresses(&index.query_intersecting(&touching)), vec![&big as *const Polygon]);
}

#[test]
fn degenerate_regions_are_accepted() {
    // zero width strip
    let line = rect(5.0, 10.0, 5.0, 20.0);
    let mut index = GridIndex::new(AABB::new(5.0, 0.0, 5.0, 100.0), 1.0).unwrap();
    assert!(index.insert(&line));
    let query = rect(4.0, 12.0, 6.0, 14.0);
    assert_eq!(index.query_intersecting(&query).len(), 1);
    assert!(index.query_intersecting(&rect(4.0, 30.0, 6.0, 40.0)).is_empty());

    // width below the representable precision at this magnitude
    let x = 1.0e6;
    let region = AABB::new(x, 0.0, next_up(x), 100.0);
    let sliver = rect(x, 50.0, next_up(x), 60.0);
    let mut index = GridIndex::new(region, 1e-12).unwrap();
    assert!(index.insert(&sliver));
    assert!(index.contains(&sliver));

    // single point region
    let mut index = GridIndex::new(AABB::new(3.0, 3.0, 3.0, 3.0), 1.0).unwrap();
    let dot = rect(3.0, 3.0, 3.0, 3.0);
    assert!(index.insert(&dot));
    assert!(!index.insert(&rect(3.0, 3.0, 4.0, 3.0)));
}

#[test]
fn invalid_construction() {
    for (region, min_cell) in [
        (AABB::new(0.0, 0.0, f64::NAN, 1.0), 1.0),
        (AABB::new(f64::NEG_INFINITY, 0.0, 1.0, 1.0), 1.0),
        (AABB::new(0.0, 2.0, 1.0, 1.0), 1.0),
        (AABB::new(0.0, 0.0, 1.0, 1.0), -1.0),
        (AABB::new(0.0, 0.0, 1.0, 1.0), f64::INFINITY),
    ] {
        assert!(matches!(
            GridIndex::new(region, min_cell),
            Err(GeometryError::InvalidArgument(_))
        ));
    }
}

#[test]
fn early_exit_and_clear() {
    let mut rng = StdRng::seed_from_u64(99);
    let polygons: Vec<Polygon> = (0..50)
        .map(|_| {
            let x = rng.gen_range(0.0..10.0);
            let y = rng.gen_range(0.0..10.0);
            Polygon::new(vec![
                Vector2::new(x, y),
                Vector2::new(x + 5.0, y),
                Vector2::new(x, y + 5.0),
            ])
            .unwrap()
        })
        .collect();
    let mut index = GridIndex::new(AABB::new(0.0, 0.0, 20.0, 20.0), 0.25).unwrap();
    for p in polygons.iter() {
        index.insert(p);
    }

    let query = rect(0.0, 0.0, 20.0, 20.0);
    let mut seen = Vec::new();
    let result = index.visit_intersecting(&query, |p| {
        seen.push(p as *const Polygon);
        if seen.len() == 10 {
            Control::Break(seen.len())
        } else {
            Control::Continue
        }
    });
    assert_eq!(result, Control::Break(10));
    assert_eq!(seen, addresses(&index.query_intersecting(&query))[..10].to_vec());

    index.clear();
    assert!(index.is_empty());
    assert!(index.query_intersecting(&query).is_empty());
    assert!(index.insert(&polygons[0]));
}
