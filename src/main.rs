mod cli;
mod report;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, OutputFormat};
use report::render_report;
use trussx2d::analyse_json;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    // The description is parsed, validated and solved in one pass; any
    // failure is reported as-is without partial output.
    let json = cli.read_input()?;
    let results = analyse_json(&json, &cli.options())?;

    let output = match cli.format {
        OutputFormat::Text => render_report(&results),
        OutputFormat::Json if cli.pretty => serde_json::to_string_pretty(&results)?,
        OutputFormat::Json => serde_json::to_string(&results)?,
    };
    Ok(output)
}
