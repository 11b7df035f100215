//! Shepherd command-line tools.
//!
//! # Usage
//!
//! ```text
//! migrate-workflows [--source <git-url>] [--dry-run] [--force] [--config <path>]
//! scan-repos [--config <path>] [--json]
//! migrate-fleet [--apply] [--config <path>] [--json]
//! ```
//!
//! Each binary under `src/bin/` is a thin `main` over one module in
//! [`commands`].

pub mod argv;
pub mod commands;

use std::ffi::OsString;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use shepherd_migrate::MigrateError;

/// Exit status for a refused safety check.
pub const EXIT_SAFETY: u8 = 2;

/// Install the `fmt` subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Load `.env` from the working directory (or a parent) if there is one.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}

/// Parse `args` into `C`.
///
/// Help and version output exit 0. Usage errors exit 1 so that status 2
/// keeps meaning a refused safety check.
pub fn parse_args<C: Parser>(args: impl IntoIterator<Item = OsString>) -> Result<C, ExitCode> {
    C::try_parse_from(args).map_err(|err| {
        let _ = err.print();
        ExitCode::from(usage_exit_status(&err))
    })
}

fn usage_exit_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Map a command result to the process exit status, printing the error chain.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    let safety = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<MigrateError>())
        .any(MigrateError::is_safety_check);
    if safety {
        EXIT_SAFETY
    } else {
        1
    }
}
