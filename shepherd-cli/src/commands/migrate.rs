//! `migrate-workflows` — migrate the repository in the current directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use shepherd_core::RunOptions;
use shepherd_migrate::{resolve_local_source, GitCli, Migrator};

/// Replace the CI workflow files of the repository in the current directory
/// with those from a source workflow repository.
///
/// Run from the root of the target repository; the command refuses to run
/// elsewhere unless --force is given.
#[derive(Parser, Debug)]
#[command(name = "migrate-workflows", version, long_about = None)]
pub struct MigrateArgs {
    /// Source workflow repository (defaults to the configured plan source).
    #[arg(short = 's', long, value_name = "GIT_URL")]
    pub source: Option<String>,

    /// Show planned actions without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the repository-root safety check.
    #[arg(long)]
    pub force: bool,

    /// Fleet config file supplying the migration plan.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl MigrateArgs {
    pub fn run(self, target: &Path) -> Result<()> {
        let mut config = super::load_config(self.config.as_deref())?;
        // Relative local sources name paths under the launch directory.
        config.plan.source = resolve_local_source(target, &config.plan.source).into_owned();
        let options = RunOptions {
            dry_run: self.dry_run,
            force: self.force,
            source_override: self
                .source
                .map(|s| resolve_local_source(target, &s).into_owned()),
        };

        tracing::info!(
            "{}Migrating workflows in {}",
            options.log_prefix(),
            target.display()
        );
        let git = GitCli::new();
        let report = Migrator::new(&git)
            .migrate(target, &config.plan, &options)
            .with_context(|| format!("migration of {} failed", target.display()))?;
        tracing::debug!("{}", report.summary());
        Ok(())
    }
}
