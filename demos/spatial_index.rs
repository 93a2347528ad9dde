use lane_contours::{
    core::{math::Pose, Control},
    curve::{CurveModel, Flattener, Straight},
    polyline::OffsetProfile,
    spatial::{GridIndex, Polygon},
    AABB,
};

fn main() {
    env_logger::init();

    println!("Indexing lane polygons...");

    let flattener = Flattener::MaxDeviation(0.01);
    let mut lanes = Vec::new();
    // three parallel lanes on each of two crossing roads
    for (origin, heading) in [((0.0, 50.0), 0.0), ((50.0, 0.0), std::f64::consts::FRAC_PI_2)] {
        let road: CurveModel = Straight::new(Pose::new(origin.0, origin.1, heading), 100.0)
            .unwrap()
            .into();
        for lane in 0..3 {
            let right = -5.25 + 3.5 * lane as f64;
            let left = right + 3.5;
            let left_edge = road
                .offset_flatten(&OffsetProfile::constant(left), flattener)
                .unwrap();
            let right_edge = road
                .offset_flatten(&OffsetProfile::constant(right), flattener)
                .unwrap();
            let points = left_edge.iter().chain(right_edge.iter().rev()).collect();
            lanes.push(Polygon::new(points).unwrap());
        }
    }

    let mut index = GridIndex::new(AABB::new(-10.0, -10.0, 110.0, 110.0), 2.0).unwrap();
    for lane in lanes.iter() {
        assert!(index.insert(lane));
    }
    println!("  Indexed lanes: {}", index.len());

    for (i, lane) in lanes.iter().enumerate() {
        let hits = index.query_intersecting(lane);
        // every lane intersects itself
        println!("  Lane {} intersects {} lanes", i, hits.len() - 1);
    }

    let probe = Polygon::rectangle(AABB::new(48.0, 48.0, 52.0, 52.0));
    let first = index.visit_intersecting(&probe, |lane| Control::Break(lane.area().abs()));
    println!("  Probe at the crossing hits a lane: {:?}", first);
    assert!(matches!(first, Control::Break(_)));

    index.remove(&lanes[0]);
    println!("  After removing lane 0: {} indexed", index.len());
}
