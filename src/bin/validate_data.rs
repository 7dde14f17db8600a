//! Validate the configured datasets: check that each file exists, loads, and
//! passes the data-quality checks.
//! Run: cargo run --bin validate_data [data_dir]

use cagemap::config::AppConfig;
use cagemap::data::validate::{validate_data_files, validate_state, ValidationSeverity};
use cagemap::data::AppState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_with_env()?;
    if let Some(dir) = std::env::args().nth(1) {
        config = config.with_data_dir(dir);
    }

    let files = validate_data_files(&config);
    for diagnostic in &files.diagnostics {
        eprintln!("{diagnostic}");
    }

    let state = AppState::load(&config)?;
    let report = validate_state(&state);
    for diagnostic in report
        .diagnostics
        .iter()
        .filter(|d| d.severity != ValidationSeverity::Info)
    {
        eprintln!("{diagnostic}");
    }

    println!(
        "Validated {} records, {} errors, {} warnings ({} files missing)",
        state.total_records(),
        report.count(ValidationSeverity::Error),
        report.count(ValidationSeverity::Warning),
        files.diagnostics.len(),
    );
    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
