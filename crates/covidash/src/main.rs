//! Main entry point for covidash.

use clap::Parser;
use covidash::{AppError, AppResult, Args, Dashboard};
use covidash_common::init_logging;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> AppResult<()> {
    init_logging(args.logging_config()).map_err(|e| AppError::Logging(e.to_string()))?;

    let config = args.resolve_config()?;
    info!(output = %config.output.path.display(), "configuration resolved");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let path = runtime.block_on(Dashboard::new(config).run())?;
    info!(path = %path.display(), "wrote dashboard");
    Ok(())
}
