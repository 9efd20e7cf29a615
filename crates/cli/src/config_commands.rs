use std::path::Path;

use {
    anyhow::Result,
    clap::Subcommand,
    herald_config::{HeraldConfig, Severity},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the effective configuration and report errors/warnings.
    Check,
}

pub fn handle_config(
    action: ConfigAction,
    config: &HeraldConfig,
    source: Option<&Path>,
) -> Result<()> {
    match action {
        ConfigAction::Check => check(config, source),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check_header(source: Option<&Path>) -> String {
    match source {
        Some(path) => format!("Checking {}", path.display()),
        None => "No config file found; checking defaults and environment.".to_string(),
    }
}

fn check(config: &HeraldConfig, source: Option<&Path>) -> Result<()> {
    eprintln!("{}\n", check_header(source));

    let result = herald_config::validate(config);
    for d in &result.diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
    }

    let errors = result
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = result.diagnostics.len() - errors;

    if !result.diagnostics.is_empty() {
        eprintln!();
    }
    if result.diagnostics.is_empty() {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
