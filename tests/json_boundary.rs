use approx::assert_relative_eq;
use serde_json::Value;
use trussx2d::{analyse_json, AnalysisError, SolverOptions};

/// Warren-style bridge: pinned at 1, roller at 3, deck loads on the top chord.
const BRIDGE: &str = r#"{
    "nodes": {
        "1": [0, 0], "2": [4, 0], "3": [8, 0],
        "4": [2, 3], "5": [6, 3]
    },
    "members": [[1, 2], [2, 3], [1, 4], [2, 4], [2, 5], [3, 5], [4, 5]],
    "supports": {"1": [true, true], "3": [false, true]},
    "loads": {"4": [0, -10], "5": [0, -10]}
}"#;

#[test]
fn bridge_matches_method_of_joints() {
    let results = analyse_json(BRIDGE, &SolverOptions::unit()).expect("bridge solves");
    let diagonal = -10.0 * 13.0_f64.sqrt() / 3.0;

    for (a, b, expected) in [
        ("1", "2", 20.0 / 3.0),
        ("2", "3", 20.0 / 3.0),
        ("1", "4", diagonal),
        ("2", "4", 0.0),
        ("2", "5", 0.0),
        ("3", "5", diagonal),
        ("4", "5", -20.0 / 3.0),
    ] {
        let force = results.force_between(a, b).expect("member exists");
        assert_relative_eq!(force, expected, epsilon = 1.0e-9);
    }

    let pin = results.reaction("1").expect("pin reacts");
    let roller = results.reaction("3").expect("roller reacts");
    assert_relative_eq!(pin.x, 0.0, epsilon = 1.0e-9);
    assert_relative_eq!(pin.y, 10.0, epsilon = 1.0e-9);
    assert_relative_eq!(roller.y, 10.0, epsilon = 1.0e-9);
}

#[test]
fn determinate_forces_do_not_depend_on_rigidity() {
    let stiff = BRIDGE.replace(
        r#"[[1, 2], [2, 3], [1, 4], [2, 4], [2, 5], [3, 5], [4, 5]]"#,
        r#"[
            {"start": 1, "end": 2, "ea": 2.0e8},
            {"start": 2, "end": 3, "ea": 2.0e8},
            {"start": 1, "end": 4, "ea": 5.0e7},
            {"start": 2, "end": 4, "ea": 5.0e7},
            {"start": 2, "end": 5, "ea": 5.0e7},
            {"start": 3, "end": 5, "ea": 5.0e7},
            {"start": 4, "end": 5, "ea": 2.0e8}
        ]"#,
    );
    let unit = analyse_json(BRIDGE, &SolverOptions::unit()).expect("unit bridge solves");
    let physical = analyse_json(&stiff, &SolverOptions::default()).expect("bridge solves");

    for (a, b) in unit.members().iter().zip(physical.members()) {
        assert_relative_eq!(a.axial_force, b.axial_force, epsilon = 1.0e-6);
    }
    // Stiffer members deflect less.
    let sag = |results: &trussx2d::TrussResults| results.displacement("2").expect("joint 2").y;
    assert!(sag(&physical).abs() < sag(&unit).abs());
}

#[test]
fn results_serialise_with_keyed_members_and_joints() {
    let results = analyse_json(BRIDGE, &SolverOptions::unit()).expect("bridge solves");
    let value: Value = serde_json::to_value(&results).expect("serialisable");

    let forces = value["member_forces"].as_object().expect("object");
    assert_eq!(forces.len(), 7);
    assert!(forces.contains_key("1,2"));
    assert!(forces.contains_key("4,5"));

    let displacements = value["displacements"].as_object().expect("object");
    assert_eq!(displacements.len(), 5);
    assert_eq!(displacements["1"], serde_json::json!([0.0, 0.0]));
    assert_eq!(displacements["3"].as_array().expect("pair").len(), 2);

    let reactions = value["reactions"].as_object().expect("object");
    assert_eq!(
        reactions.keys().map(String::as_str).collect::<Vec<_>>(),
        ["1", "3"]
    );
}

#[test]
fn members_without_rigidity_need_unit_mode() {
    let error = analyse_json(BRIDGE, &SolverOptions::default()).expect_err("no ea given");
    assert!(matches!(error, AnalysisError::MissingRigidity(_)));
}

#[test]
fn malformed_documents_are_rejected() {
    for json in [
        "not json",
        r#"{"nodes": {"1": [0, 0]}}"#,
        r#"{"nodes": {"1": [0, 0], "1": [1, 0]}, "members": []}"#,
        r#"{"nodes": {"1": [0]}, "members": []}"#,
        r#"{"nodes": {"1": [0, 0]}, "members": [], "extra": 1}"#,
        r#"{"nodes": {"1": [0, 0], "2": [1, 0]}, "members": [[1, 2], [2, 1]]}"#,
        r#"{"nodes": {"1": [0, 0]}, "members": [], "loads": {"9": [1, 0]}}"#,
        r#"{"nodes": {"A": [0, 0], "B,C": [1, 0]}, "members": [["A", "B,C"]]}"#,
    ] {
        let error = analyse_json(json, &SolverOptions::unit()).expect_err(json);
        assert!(
            matches!(error, AnalysisError::MalformedInput(_)),
            "{json}: {error:?}"
        );
    }
}

#[test]
fn ids_that_would_collide_as_member_keys_are_rejected() {
    // Both members would serialise as "A,B,C".
    let error = analyse_json(
        r#"{
            "nodes": {"A": [0, 0], "B,C": [1, 0], "A,B": [0, 1], "C": [1, 1]},
            "members": [["A", "B,C"], ["A,B", "C"], ["A", "A,B"], ["B,C", "C"], ["A", "C"]],
            "supports": {"A": [true, true], "B,C": [true, true]}
        }"#,
        &SolverOptions::unit(),
    )
    .expect_err("comma in node id");
    assert_eq!(
        error,
        AnalysisError::MalformedInput("joint id `B,C` must not contain `,`".into())
    );
}

#[test]
fn unknown_member_endpoint_is_a_topology_error() {
    let error = analyse_json(
        r#"{"nodes": {"1": [0, 0]}, "members": [[1, 7]]}"#,
        &SolverOptions::unit(),
    )
    .expect_err("node 7 is missing");
    assert!(matches!(
        error,
        AnalysisError::InvalidTopology { ref node, .. } if node == "7"
    ));
}
