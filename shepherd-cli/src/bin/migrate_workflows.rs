//! `migrate-workflows` binary.

use std::process::ExitCode;

use anyhow::Context;

use shepherd_cli::{argv, commands::migrate::MigrateArgs};

fn main() -> ExitCode {
    shepherd_cli::init_tracing();

    let args = argv::partition::<MigrateArgs>(std::env::args_os());
    for ignored in &args.ignored {
        tracing::warn!("Unknown argument ignored: {ignored}");
    }
    let cli = match shepherd_cli::parse_args::<MigrateArgs>(args.known) {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    let result = std::env::current_dir()
        .context("could not determine the current directory")
        .and_then(|target| cli.run(&target));
    shepherd_cli::finish(result)
}
