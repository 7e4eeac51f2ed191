use trussx2d::{analyse_json, SolverOptions};

const BRIDGE: &str = include_str!("bridge.json");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // No rigidities in the file, so every member gets EA / L = 1
    let results = analyse_json(BRIDGE, &SolverOptions::unit())?;

    println!("{}", serde_json::to_string_pretty(&results)?);

    if let Some(member) = results.max_force_member() {
        println!(
            "largest force: {} -> {} ({:+.3})",
            member.start, member.end, member.axial_force
        );
    }
    Ok(())
}
