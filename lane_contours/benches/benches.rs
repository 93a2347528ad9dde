use criterion::{criterion_group, criterion_main, Bencher, BenchmarkId, Criterion};
use lane_contours::{
    core::math::Pose,
    curve::{Curve, Flattener},
    polyline::Polyline,
    spatial::{GridIndex, Polygon},
    AABB,
};
use road_shapes::*;

fn bench_flatten(b: &mut Bencher, flattener: Flattener) {
    let curves = transition_curves();
    let profile = widening_profile();
    b.iter(|| {
        for curve in curves.iter() {
            curve.offset_flatten(&profile, flattener).unwrap();
        }
    })
}

fn flatten_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    for &max_deviation in &[0.1, 0.01, 0.001] {
        group.bench_with_input(
            BenchmarkId::new("max_deviation", max_deviation),
            &max_deviation,
            |b, &d| bench_flatten(b, Flattener::MaxDeviation(d)),
        );
    }
    group.bench_function("num_points_100", |b| {
        bench_flatten(b, Flattener::NumPoints(100))
    });
    group.finish();
}

fn bench_offset(b: &mut Bencher, line: &Polyline) {
    let profile = widening_profile();
    b.iter(|| {
        line.offset_profile(&profile).unwrap();
    })
}

fn offset_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset_line");
    for &max_deviation in &[0.1, 0.01, 0.001] {
        let line = transition_center_line(Flattener::MaxDeviation(max_deviation));
        group.bench_with_input(
            BenchmarkId::new("widening", line.vertex_count()),
            &line,
            bench_offset,
        );
    }
    group.finish();
}

fn clothoid_group(c: &mut Criterion) {
    let curves = transition_curves();
    let start = curves[0].start_pose();
    let end = curves[0].end_pose();
    c.bench_function("clothoid_between_poses", |b| {
        b.iter(|| lane_contours::curve::Clothoid::between_poses(start, end).unwrap())
    });
    let s_start = Pose::new(0.0, 0.0, 0.0);
    let s_end = Pose::new(100.0, 5.0, 0.0);
    c.bench_function("clothoid_between_poses_s_shape", |b| {
        b.iter(|| lane_contours::curve::Clothoid::between_poses(s_start, s_end).unwrap())
    });
}

fn bench_index_query(b: &mut Bencher, tiles: &[Polygon], queries: &[Polygon]) {
    let region = AABB::new(0.0, 0.0, 1000.0, 1000.0);
    let mut index = GridIndex::new(region, 5.0).unwrap();
    for t in tiles.iter() {
        index.insert(t);
    }
    b.iter(|| {
        let mut hits = 0;
        for q in queries.iter() {
            hits += index.query_intersecting(q).len();
        }
        hits
    })
}

fn spatial_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_index");
    for &per_side in &[10, 40, 100] {
        let size = 1000.0 / per_side as f64;
        let tiles = lane_tiles(per_side, per_side, size);
        let queries = lane_tiles(5, 5, 200.0);
        group.bench_with_input(
            BenchmarkId::new("query_tiles", per_side * per_side),
            &tiles,
            |b, tiles| bench_index_query(b, tiles, &queries),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    flatten_group,
    offset_group,
    clothoid_group,
    spatial_group,
);
criterion_main!(benches);
