use lane_contours::{
    core::math::{Pose, Vector2},
    curve::{Arc, BezierCubic, Curve, CurveModel, Flattener, Side},
    diagnostics::CollectDiagnostics,
    polyline::{OffsetOptions, OffsetProfile, Polyline},
};
use log::info;

fn main() {
    env_logger::init();
    curve_edges();
    polyline_edges();
}

fn curve_edges() {
    println!("Flattening lane edges along a curve...");

    let arc: CurveModel = Arc::new(Pose::new(0.0, 0.0, 0.0), 80.0, Side::Left, 0.8)
        .unwrap()
        .into();
    let flattener = Flattener::MaxAngleAndDeviation {
        max_angle: 0.05,
        max_deviation: 0.01,
    };

    let center = arc.flatten(flattener).unwrap();
    println!("Center line:");
    println!("  Length: {:.3}", center.length());
    println!("  Vertices: {}", center.vertex_count());

    // lane widens from 3.5 to 5.0 over the middle of the curve
    let profile = OffsetProfile::new(vec![0.0, 0.3, 0.7, 1.0], vec![3.5, 5.0, 5.0, 3.5]).unwrap();
    let left = arc.offset_flatten(&profile, flattener).unwrap();
    let right = arc.offset_flatten(&profile.mirrored(), flattener).unwrap();
    println!("Left edge: length {:.3}, vertices {}", left.length(), left.vertex_count());
    println!("Right edge: length {:.3}, vertices {}", right.length(), right.vertex_count());

    // inner edge of a left turn is shorter than the center line
    assert!(left.length() < center.length());
    assert!(right.length() > center.length());
    assert_eq!(left.first(), arc.start_pose().lateral(3.5));
    assert_eq!(right.last(), arc.end_pose().lateral(-3.5));

    let s_curve: CurveModel =
        BezierCubic::from_poses(Pose::new(0.0, 0.0, 0.0), Pose::new(60.0, 8.0, 0.0))
            .unwrap()
            .into();
    for flattener in [
        Flattener::NumPoints(12),
        Flattener::MaxAngle(0.02),
        Flattener::MaxDeviation(0.005),
    ] {
        let pline = s_curve.flatten(flattener).unwrap();
        info!("{:?} -> {} vertices", flattener, pline.vertex_count());
        println!("  S-curve {:?}: {} vertices", flattener, pline.vertex_count());
    }
}

fn polyline_edges() {
    println!("\nOffsetting a surveyed polyline...");

    let surveyed = Polyline::new(vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(25.0, 1.0),
        Vector2::new(50.0, 4.0),
        Vector2::new(50.5, 4.1),
        Vector2::new(75.0, 9.0),
        Vector2::new(100.0, 16.0),
    ])
    .unwrap();

    let diagnostics = CollectDiagnostics::new();
    let options = OffsetOptions::with_diagnostics(&diagnostics);
    let edge = surveyed
        .offset_profile_opt(&OffsetProfile::linear(2.0, 4.0), &options)
        .unwrap();

    println!("  Input vertices: {}", surveyed.vertex_count());
    println!("  Edge vertices: {}", edge.vertex_count());
    for event in diagnostics.events() {
        println!("  Event: {:?}", event);
    }

    let back = edge.offset(-2.0).unwrap();
    println!("  Edge offset back by 2.0 has {} vertices", back.vertex_count());
}
