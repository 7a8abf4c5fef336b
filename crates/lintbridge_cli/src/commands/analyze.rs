//! Analyze command implementation

use std::env;
use std::path::Path;

use miette::{IntoDiagnostic, Result, miette};
use tracing::{debug, info};

use lintbridge_core::{Host, HostConfig, render};

use crate::cli::Cli;

/// Runs the analysis and prints the report. Returns the process exit code.
pub fn run_analyze(cli: &Cli) -> Result<u8> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.fail_on_run_error {
        config.fail_on_run_error = true;
    }

    Host::check_target(&cli.target).into_diagnostic()?;

    let host = Host::new(config).into_diagnostic()?;
    let result = host.run(&cli.target, &cli.analyzers);

    if !cli.quiet {
        let report = render(cli.format, &result, cli.verbose).into_diagnostic()?;
        if !report.is_empty() {
            println!("{}", report);
        }
    }

    if host.config().fail_on_run_error && result.has_errors() {
        return Err(miette!(
            "{} analyzer run error(s) occurred",
            result.errors().len()
        ));
    }

    info!(
        "{} diagnostic(s), {} run error(s)",
        result.diagnostics().len(),
        result.errors().len()
    );

    u8::try_from(result.exit_code()).into_diagnostic()
}

fn load_config(explicit: Option<&Path>) -> Result<HostConfig> {
    if let Some(path) = explicit {
        debug!("Using config {}", path.display());
        return HostConfig::from_file(path).into_diagnostic();
    }

    let cwd = env::current_dir().into_diagnostic()?;
    match HostConfig::discover(&cwd) {
        Some(path) => {
            debug!("Found config {}", path.display());
            HostConfig::from_file(&path).into_diagnostic()
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(HostConfig::new())
        }
    }
}
