//! Fleet-wide migration: scan the organization, then migrate every
//! candidate in its own temporary clone, one at a time.

use std::path::{Path, PathBuf};

use chrono::Utc;
use shepherd_core::{
    CandidateSet, FleetConfig, FleetReport, PerRepoOutcome, RepositoryRef, RunOptions,
};
use shepherd_remote::{scan_candidates, RepositoryHost};
use tempfile::TempDir;

use crate::error::{error_chain, CandidateError, FleetError};
use crate::migrator::{MigrationReport, Migrator};
use crate::vcs::VersionControl;

const CLONE_PREFIX: &str = "fleet-migrate-";

/// Runs the scan and the per-repository migrations for one fleet config.
pub struct FleetOrchestrator<'a> {
    host: &'a dyn RepositoryHost,
    vcs: &'a dyn VersionControl,
    config: &'a FleetConfig,
    temp_root: Option<PathBuf>,
}

impl<'a> FleetOrchestrator<'a> {
    pub fn new(
        host: &'a dyn RepositoryHost,
        vcs: &'a dyn VersionControl,
        config: &'a FleetConfig,
    ) -> Self {
        Self {
            host,
            vcs,
            config,
            temp_root: None,
        }
    }

    /// Create clones and workspaces under `root` instead of the OS temp directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Repositories that match the filter and pass the probe.
    pub fn scan(&self) -> Result<CandidateSet, FleetError> {
        let filter = self.config.repo_filter();
        let predicate = self.config.probe.predicate();
        tracing::info!(
            org = %filter.org,
            suffix = %filter.suffix,
            probe = %self.config.probe.path,
            %predicate,
            "scanning for candidate repositories"
        );
        Ok(scan_candidates(
            self.host,
            &filter,
            &self.config.probe.path,
            &predicate,
        )?)
    }

    /// Scan, then migrate every candidate.
    ///
    /// Only a failed scan is an error; per-repository failures are recorded
    /// in the report.
    pub fn run(&self, options: &RunOptions) -> Result<FleetReport, FleetError> {
        let started_at = Utc::now();
        if options.dry_run {
            tracing::info!("Dry-run mode: pass --apply to perform migrations.");
        } else {
            tracing::info!("Apply mode: migrations will create branches and commits.");
        }

        let candidates = self.scan()?;
        tracing::info!("Found {} candidate repositories.", candidates.len());

        let outcomes = self.migrate_candidates(&candidates, options);
        tracing::info!("All migrations complete.");

        Ok(FleetReport {
            started_at,
            finished_at: Utc::now(),
            dry_run: options.dry_run,
            outcomes,
        })
    }

    /// Migrate `candidates` in order. Every candidate is attempted.
    pub fn migrate_candidates(
        &self,
        candidates: &[RepositoryRef],
        options: &RunOptions,
    ) -> Vec<PerRepoOutcome> {
        candidates
            .iter()
            .map(|repo| match self.migrate_candidate(repo, options) {
                Ok(report) => PerRepoOutcome::success(&repo.name, self.success_detail(&report)),
                Err(err) => {
                    let detail = error_chain(&err);
                    tracing::error!(repo = %repo.name, error = %detail, "Error migrating repository");
                    PerRepoOutcome::failed(&repo.name, detail)
                }
            })
            .collect()
    }

    fn success_detail(&self, report: &MigrationReport) -> String {
        match &report.workspace {
            Some(kept) => format!("{} (workspace kept at {})", report.summary(), kept.display()),
            None => format!("{}; pushed {}", report.summary(), self.config.branch),
        }
    }

    /// Clone, migrate, and (unless dry-run) commit and push one repository.
    /// The clone directory is removed on every path.
    fn migrate_candidate(
        &self,
        repo: &RepositoryRef,
        options: &RunOptions,
    ) -> Result<MigrationReport, CandidateError> {
        tracing::info!("Migrating workflows for repository: {}", repo.name);

        let mut builder = tempfile::Builder::new();
        builder.prefix(CLONE_PREFIX);
        let clone_dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(CandidateError::Workspace)?;

        let result = self.migrate_in(repo, clone_dir.path(), options);

        let path = clone_dir.path().to_path_buf();
        if let Err(e) = clone_dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary clone");
        }
        tracing::info!("Cleaned up temporary directory for {}.", repo.name);
        result
    }

    fn migrate_in(
        &self,
        repo: &RepositoryRef,
        clone_dir: &Path,
        options: &RunOptions,
    ) -> Result<MigrationReport, CandidateError> {
        let url = self.config.clone_url(&repo.name);
        tracing::info!("Cloning {} into temporary directory...", repo.name);
        self.vcs
            .clone_repo(&url, clone_dir)
            .map_err(|source| CandidateError::Git {
                step: "clone",
                source,
            })?;

        if !options.dry_run {
            self.vcs
                .create_branch(clone_dir, &self.config.branch)
                .map_err(|source| CandidateError::Git {
                    step: "branch",
                    source,
                })?;
        }

        let migrate_options = RunOptions {
            dry_run: options.dry_run,
            force: false,
            source_override: options.source_override.clone(),
        };
        let mut migrator = Migrator::new(self.vcs);
        if let Some(root) = &self.temp_root {
            migrator = migrator.with_temp_root(root);
        }
        let report = migrator.migrate(clone_dir, &self.config.plan, &migrate_options)?;

        if !options.dry_run {
            self.vcs
                .commit_all(clone_dir, &self.config.commit_message)
                .map_err(|source| CandidateError::Git {
                    step: "commit",
                    source,
                })?;
            self.vcs
                .push(clone_dir, &self.config.branch)
                .map_err(|source| CandidateError::Git {
                    step: "push",
                    source,
                })?;
        }

        tracing::info!(
            "{}Migration for {} completed. Please review changes.",
            options.log_prefix(),
            repo.name
        );
        Ok(report)
    }
}
