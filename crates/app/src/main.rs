//! ScanBridge command-line entry point.
//!
//! Uploads a local scan result file to the security platform:
//! authenticate, request an upload slot, upload the file, then poll the
//! ingestion job until the platform reports it.

#![forbid(unsafe_code)]

mod cli;
mod logging;
mod report;
mod runner;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use scanbridge_domain::{IngestionReport, ScanBridgeError};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::cli::Cli;

fn main() -> ExitCode {
    // Load .env before parsing so flags with an `env` fallback see it.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.log_json);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    match try_main(&cli) {
        Ok(report) => {
            print!("{}", report::render(&report));
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = err.downcast_ref::<ScanBridgeError>().map_or("internal", ScanBridgeError::label);
            error!(kind, error = %err, "ingestion failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> anyhow::Result<IngestionReport> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let run_id = Uuid::new_v4();
    let span = info_span!("scanbridge", %run_id);

    let report = runtime.block_on(runner::run(cli).instrument(span))?;
    info!(%run_id, upload_id = %report.slot.id, status = %report.activity.status, "ingestion finished");
    Ok(report)
}
