use lane_contours::{
    core::math::Pose,
    curve::{Clothoid, ClothoidOptions, Curve, CurveModel, Flattener},
    diagnostics::LogDiagnostics,
};

fn main() {
    env_logger::init();
    spiral_from_parameters();
    fit_between_poses();
}

fn print_clothoid(name: &str, clothoid: &Clothoid) {
    println!("{}:", name);
    println!("  Length: {:.4}", clothoid.length());
    println!(
        "  Curvature: {:.6} -> {:.6}",
        clothoid.start_curvature(),
        clothoid.end_curvature()
    );
    println!("  A value: {:.4}", clothoid.a_value());
    let end = clothoid.end_pose();
    println!(
        "  End: ({:.4}, {:.4}) heading {:.6}",
        end.point.x, end.point.y, end.direction
    );
}

fn spiral_from_parameters() {
    println!("Building transition spirals...");

    let start = Pose::new(0.0, 0.0, 0.0);
    let entry = Clothoid::with_a_value(start, 150.0, 0.0, 1.0 / 250.0).unwrap();
    print_clothoid("Entry spiral (A = 150, R = 250)", &entry);

    let by_length = Clothoid::with_length(start, entry.length(), 0.0, 1.0 / 250.0).unwrap();
    assert!(by_length.end_pose().fuzzy_eq_eps(&entry.end_pose(), 1e-9));

    let pline = CurveModel::from(entry)
        .flatten(Flattener::MaxDeviation(0.005))
        .unwrap();
    println!("  Flattened to {} vertices", pline.vertex_count());
}

fn fit_between_poses() {
    println!("\nFitting clothoids between poses...");

    let options = ClothoidOptions::with_diagnostics(&LogDiagnostics);
    let start = Pose::new(0.0, 0.0, 0.0);
    let cases = [
        ("Left turn", Pose::new(80.0, 20.0, 0.5)),
        ("Lane change", Pose::new(100.0, 3.5, 0.0)),
        ("Circular arc", Pose::new(20.0, 20.0, std::f64::consts::FRAC_PI_2)),
        ("Straight", Pose::new(50.0, 0.0, 0.0)),
    ];

    for (name, end) in cases {
        let clothoid = Clothoid::between_poses_opt(start, end, &options).unwrap();
        print_clothoid(name, &clothoid);
        assert_eq!(clothoid.end_pose().point, end.point);
    }
}
