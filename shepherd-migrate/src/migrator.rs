//! Single-target workflow migration.
//!
//! ## `migrate` — 5-step protocol
//!
//! 1. Create a temporary workspace owned by this call.
//! 2. Clone the source workflow repository into it (skipped in dry-run).
//! 3. Delete every removal-set entry present in the target.
//! 4. Copy every copy-set entry present in the workspace into the target.
//! 5. Drop the workspace (kept and reported in dry-run).
//!
//! The safety gate runs before step 1. A clone failure stops the migration
//! before anything is deleted.

use std::path::{Path, PathBuf};

use shepherd_core::{MigrationPlan, RunOptions};
use tempfile::TempDir;

use crate::error::{MigrateError, PathFailure};
use crate::fsops::{copy_entry, entry_exists, remove_entry, resolve_entry};
use crate::safety::check_repository_root;
use crate::vcs::VersionControl;

const WORKSPACE_PREFIX: &str = "workflow-migration-";

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What a migration touched. In dry-run, what it would have touched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationReport {
    pub removed: Vec<String>,
    pub copied: Vec<String>,
    /// Retained workspace; only set in dry-run.
    pub workspace: Option<PathBuf>,
    pub dry_run: bool,
}

impl MigrationReport {
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "would remove {}, would copy {}",
                self.removed.len(),
                self.copied.len()
            )
        } else {
            format!("removed {}, copied {}", self.removed.len(), self.copied.len())
        }
    }
}

// ---------------------------------------------------------------------------
// Migrator
// ---------------------------------------------------------------------------

/// Applies a [`MigrationPlan`] to one target directory.
pub struct Migrator<'a> {
    vcs: &'a dyn VersionControl,
    temp_root: Option<PathBuf>,
}

impl<'a> Migrator<'a> {
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self {
            vcs,
            temp_root: None,
        }
    }

    /// Create workspaces under `root` instead of the OS temp directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    fn create_workspace(&self) -> Result<TempDir, MigrateError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(MigrateError::Workspace)
    }

    /// Migrate `target` according to `plan`.
    ///
    /// `options.source_override`, when set, replaces `plan.source`.
    pub fn migrate(
        &self,
        target: &Path,
        plan: &MigrationPlan,
        options: &RunOptions,
    ) -> Result<MigrationReport, MigrateError> {
        let prefix = options.log_prefix();
        let source = options
            .source_override
            .as_deref()
            .unwrap_or(plan.source.as_str());

        // Validate every entry before touching anything.
        let removals = plan
            .remove
            .iter()
            .map(|entry| resolve_entry(target, entry).map(|path| (entry.as_str(), path)))
            .collect::<Result<Vec<_>, MigrateError>>()?;
        for entry in &plan.copy {
            resolve_entry(target, entry)?;
        }

        check_repository_root(target, options.force)?;

        // Step 1 + 2: workspace and clone.
        let workspace = self.create_workspace()?;
        tracing::info!(
            "Cloning source workflow repo to temporary directory: {}",
            workspace.path().display()
        );
        if options.dry_run {
            tracing::info!("[dry-run] git clone {source} {}", workspace.path().display());
        } else {
            self.vcs
                .clone_repo(source, workspace.path())
                .map_err(|e| MigrateError::Clone {
                    url: source.to_string(),
                    source: e,
                })?;
        }

        let mut report = MigrationReport {
            dry_run: options.dry_run,
            ..MigrationReport::default()
        };

        // Step 3: removals. Every entry is attempted; failures are collected.
        tracing::info!("Removing old workflow files and folders...");
        let mut failures = Vec::new();
        for (entry, path) in removals {
            if !entry_exists(&path) {
                tracing::debug!("not present, skipping: {entry}");
                continue;
            }
            if options.dry_run {
                tracing::info!("{prefix}Would remove: {entry}");
                report.removed.push(entry.to_string());
                continue;
            }
            match remove_entry(&path) {
                Ok(()) => {
                    tracing::info!("Removed: {entry}");
                    report.removed.push(entry.to_string());
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to remove: {entry}");
                    failures.push(PathFailure {
                        path: entry.to_string(),
                        source: e,
                    });
                }
            }
        }
        if !failures.is_empty() {
            return Err(MigrateError::Remove {
                failures,
                removed: report.removed,
            });
        }

        // Step 4: copies.
        tracing::info!("Copying new workflow files and folders...");
        for entry in &plan.copy {
            if options.dry_run {
                tracing::info!("{prefix}Would copy: {entry}");
                report.copied.push(entry.clone());
                continue;
            }
            let src = resolve_entry(workspace.path(), entry)?;
            if !entry_exists(&src) {
                tracing::debug!("not in source repository, skipping: {entry}");
                continue;
            }
            let dst = resolve_entry(target, entry)?;
            copy_entry(&src, &dst).map_err(|e| MigrateError::Copy {
                path: entry.clone(),
                source: e,
            })?;
            tracing::info!("Copied: {entry}");
            report.copied.push(entry.clone());
        }

        // Step 5: workspace.
        if options.dry_run {
            let kept = workspace.keep();
            tracing::info!(
                "[dry-run] Skipping cleanup (temp dir retained for inspection): {}",
                kept.display()
            );
            report.workspace = Some(kept);
            tracing::info!("Dry run completed.");
        } else {
            tracing::info!("Cleaning up temporary directory...");
            let path = workspace.path().to_path_buf();
            if let Err(e) = workspace.close() {
                tracing::warn!(path = %path.display(), error = %e, "temporary directory cleanup failed");
            }
            tracing::info!("Migration completed successfully.");
        }

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
