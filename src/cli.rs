use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use trussx2d::SolverOptions;

/// Output flavours for the analysis results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// JSON object with member forces, displacements and reactions.
    Json,
}

/// Analyse a planar truss described in JSON.
#[derive(Debug, Parser)]
#[command(name = "trussx2d", version, about)]
pub struct Cli {
    /// Truss description file; read from stdin when omitted.
    pub input: Option<PathBuf>,

    /// Give members without `ea` a unit stiffness (EA / L = 1).
    #[arg(long)]
    pub unit_stiffness: bool,

    /// How to print the results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Indent JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Members shorter than this are rejected as degenerate.
    #[arg(long, default_value_t = SolverOptions::default().length_tolerance)]
    pub length_tolerance: f64,

    /// Relative pivot threshold for detecting unstable structures.
    #[arg(long, default_value_t = SolverOptions::default().singularity_tolerance)]
    pub singularity_tolerance: f64,
}

impl Cli {
    /// Solver options selected on the command line.
    pub fn options(&self) -> SolverOptions {
        SolverOptions::default()
            .with_unit_stiffness(self.unit_stiffness)
            .with_length_tolerance(self.length_tolerance)
            .with_singularity_tolerance(self.singularity_tolerance)
    }

    /// Read the description text from the input file or stdin.
    pub fn read_input(&self) -> io::Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path),
            None => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}
