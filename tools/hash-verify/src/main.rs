//! hash-verify: operator CLI for SHA-Infinity state integrity

use std::io;
use std::process::ExitCode;

use clap::Parser;
use integrity_telemetry::{init_logging, log_event, TelemetryConfig};

use hash_verify::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    if let Err(e) = init_logging(&telemetry) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match run(&cli, &mut io::stdout().lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            log_event!(error, "hash-verify", "command failed", error = %err);
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
