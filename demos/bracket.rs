use trussx2d::{force, point, SolverOptions, Truss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two bars meeting at A, both anchored to a wall
    let mut truss = Truss::new();
    let a = truss.add_joint("A", point(0.0, 0.0))?;
    let b = truss.add_joint("B", point(1.0, 0.0))?;
    let c = truss.add_joint("C", point(0.0, 1.0))?;

    let ab = truss.add_member(a, b)?;
    let ac = truss.add_member(a, c)?;
    truss.set_support(b, [true, true])?;
    truss.set_support(c, [true, true])?;
    truss.set_load(a, force(10.0, 0.0))?;

    // Steel bars, 5 cm² each
    truss.set_rigidity_for_all(0.0005 * 200.0e9)?;

    let results = truss.analyse(&SolverOptions::default())?;

    for (name, member) in [("AB", ab), ("AC", ac)] {
        if let Some(axial) = results.member_axial_force(member) {
            println!("{name}: {axial:+.3} N");
        }
    }
    if let Some(displacement) = results.joint_displacement(a) {
        println!("A moves by ({:.3e}, {:.3e}) m", displacement.x, displacement.y);
    }

    Ok(())
}
