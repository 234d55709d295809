//! Shared plumbing for the `generate-key` and `generate-assetlinks` binaries.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use twa_core::TwaError;

pub mod output;
pub mod prompt;

/// Loads `.env` and installs the log subscriber.
///
/// `.env` never overrides variables that are already set. Logs go to stderr
/// at `warn` unless `RUST_LOG` says otherwise.
pub fn init() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Exit status for a failed run.
///
/// A declined overwrite is a cancellation and maps to 0.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<TwaError>()
        .map(TwaError::exit_code)
        .unwrap_or(1)
}

/// Reports the outcome of `run` and converts it into the process exit code.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    let Err(err) = result else {
        return ExitCode::SUCCESS;
    };

    if matches!(err.downcast_ref::<TwaError>(), Some(TwaError::OverwriteDeclined)) {
        println!("Cancelled.");
    } else {
        eprintln!();
        output::print_error(&format!("Error: {:#}", err));
        eprintln!();
    }

    ExitCode::from(exit_status(&err))
}

/// Handles a command-line parsing failure.
///
/// `--help` and `--version` exit 0; invalid arguments exit 1.
pub fn exit_code_for_usage(err: clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
