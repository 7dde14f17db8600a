use std::io;

use crate::config::AppConfig;
use crate::data::validate::{validate_data_files, validate_state, ValidationSeverity};
use crate::data::AppState;
use crate::export::write_csv;
use crate::facility::classify_facility_type;
use crate::filter::filter;
use crate::server;
use crate::server::api::FilterQuery;

const USAGE: &str = "usage: cagemap <serve|classify|export|validate>";
const EXPORT_USAGE: &str =
    "usage: cagemap export [--country CC] [--region R] [--search TEXT] [--categories a,b]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Classify,
    Export,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("classify") => Some(Command::Classify),
        Some("export") => Some(Command::Export),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Classify) => handle_classify(args),
        Some(Command::Export) => handle_export(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn load_config() -> Option<AppConfig> {
    match AppConfig::load_with_env() {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("config error: {err}");
            None
        }
    }
}

fn handle_serve() -> i32 {
    let Some(config) = load_config() else {
        return 1;
    };
    match server::run_server(&config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_classify(args: &[String]) -> i32 {
    let raw_type = args.get(2..).unwrap_or_default().join(" ");
    if raw_type.trim().is_empty() {
        eprintln!("usage: cagemap classify <type string>");
        return 2;
    }
    let class = classify_facility_type(&raw_type, None);
    match serde_json::to_string_pretty(&class) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("failed to encode classification: {err}");
            1
        }
    }
}

/// Parse `--flag value` pairs into the same query shape the HTTP API uses.
fn parse_export_flags(args: &[String]) -> Result<FilterQuery, String> {
    let mut query = FilterQuery::default();
    let mut rest = args.iter().skip(2);
    while let Some(flag) = rest.next() {
        let slot = match flag.as_str() {
            "--country" => &mut query.country,
            "--region" => &mut query.region,
            "--search" => &mut query.q,
            "--categories" => &mut query.categories,
            other => return Err(format!("unknown flag '{other}'")),
        };
        let value = rest
            .next()
            .ok_or_else(|| format!("missing value for '{flag}'"))?;
        *slot = Some(value.clone());
    }
    Ok(query)
}

fn handle_export(args: &[String]) -> i32 {
    let params = match parse_export_flags(args).and_then(|q| q.to_params().map_err(|e| e.to_string())) {
        Ok(params) => params,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{EXPORT_USAGE}");
            return 2;
        }
    };
    let Some(config) = load_config() else {
        return 1;
    };
    let state = match AppState::load(&config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("failed to load datasets: {err}");
            return 1;
        }
    };

    let visible = filter(&state, &params);
    tracing::info!(rows = visible.counts.total, "exporting csv");
    match write_csv(&visible.flat_rows(), io::stdout().lock()) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(mut config) = load_config() else {
        return 1;
    };
    if let Some(dir) = args.get(2) {
        config = config.with_data_dir(dir);
    }

    let state = match AppState::load(&config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let mut report = validate_data_files(&config);
    report.diagnostics.extend(validate_state(&state).diagnostics);
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    println!(
        "validation finished: {} error(s), {} warning(s), {} info",
        report.count(ValidationSeverity::Error),
        report.count(ValidationSeverity::Warning),
        report.count(ValidationSeverity::Info),
    );
    if report.has_errors() {
        1
    } else {
        0
    }
}
