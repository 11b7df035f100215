//! `migrate-fleet` binary.

use std::process::ExitCode;

use shepherd_cli::commands::fleet::FleetArgs;

fn main() -> ExitCode {
    shepherd_cli::init_tracing();
    match shepherd_cli::parse_args::<FleetArgs>(std::env::args_os()) {
        Ok(args) => shepherd_cli::finish(args.run()),
        Err(code) => code,
    }
}
