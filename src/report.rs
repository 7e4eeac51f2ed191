use std::fmt::Write;

use trussx2d::TrussResults;

/// Forces smaller than this are reported as zero-force members.
const ZERO_FORCE: f64 = 1.0e-9;

/// Render a textual summary of a truss analysis.
///
/// Members are listed in input order with a tension/compression tag so the
/// numbers can be checked against a method-of-joints hand calculation
/// (<https://en.wikipedia.org/wiki/Truss#Method_of_joints>).
#[must_use]
pub fn render_report(results: &TrussResults) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Truss analysis: {} members, {} joints",
        results.members().len(),
        results.joints().len()
    )
    .expect("writing to string cannot fail");

    output.push_str("\nMember forces (tension +)\n");
    for member in results.members() {
        let state = if member.axial_force.abs() < ZERO_FORCE {
            "zero"
        } else if member.axial_force > 0.0 {
            "tension"
        } else {
            "compression"
        };
        writeln!(
            &mut output,
            "  {:>6} -> {:<6} {:+12.4e}  {state}",
            member.start, member.end, member.axial_force
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nJoint displacements\n");
    for joint in results.joints() {
        writeln!(
            &mut output,
            "  {:>6}  ux = {:+.4e}  uy = {:+.4e}",
            joint.id, joint.displacement.x, joint.displacement.y
        )
        .expect("writing to string cannot fail");
    }

    let supported: Vec<_> = results
        .joints()
        .iter()
        .filter_map(|joint| joint.reaction.map(|reaction| (&joint.id, reaction)))
        .collect();
    if !supported.is_empty() {
        output.push_str("\nSupport reactions\n");
        for (id, reaction) in supported {
            writeln!(
                &mut output,
                "  {:>6}  rx = {:+.4e}  ry = {:+.4e}",
                id, reaction.x, reaction.y
            )
            .expect("writing to string cannot fail");
        }
    }

    if let Some(member) = results.max_force_member() {
        writeln!(
            &mut output,
            "\nLargest force: {} -> {} ({:+.4e})",
            member.start, member.end, member.axial_force
        )
        .expect("writing to string cannot fail");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::{EdgeIndex, NodeIndex};
    use trussx2d::{Displacement, Force, JointResult, MemberResult};

    #[test]
    fn formats_human_readable_report() {
        let results = TrussResults::new(
            vec![
                MemberResult {
                    member: EdgeIndex::new(0),
                    start: "A".into(),
                    end: "B".into(),
                    axial_force: -10.0,
                },
                MemberResult {
                    member: EdgeIndex::new(1),
                    start: "A".into(),
                    end: "C".into(),
                    axial_force: 0.0,
                },
            ],
            vec![
                JointResult {
                    joint: NodeIndex::new(0),
                    id: "A".into(),
                    displacement: Displacement::new(10.0, 0.0),
                    reaction: None,
                },
                JointResult {
                    joint: NodeIndex::new(1),
                    id: "B".into(),
                    displacement: Displacement::default(),
                    reaction: Some(Force::new(10.0, 0.0)),
                },
            ],
        );
        let report = render_report(&results);
        assert!(report.contains("2 members, 2 joints"));
        assert!(report.contains("compression"));
        assert!(report.contains("zero"));
        assert!(report.contains("ux = +1.0000e1"));
        assert!(report.contains("Support reactions"));
        assert!(report.contains("Largest force: A -> B"));
    }
}
