//! Error types for shepherd-migrate.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use shepherd_remote::RemoteError;

/// A `git` invocation that could not be started or did not succeed.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run `git {args}` in {dir}")]
    Spawn {
        args: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {args}` in {dir} exited with {status}")]
    Failed {
        args: String,
        dir: PathBuf,
        status: String,
    },
}

/// One path that could not be removed.
#[derive(Debug)]
pub struct PathFailure {
    pub path: String,
    pub source: std::io::Error,
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.source)
    }
}

/// `err` and each of its causes, joined with `": "`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        cause = inner.source();
    }
    out
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "nothing".to_string();
    }
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// All errors that can arise from migrating one target directory.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The target does not look like a repository root and `force` is off.
    #[error(
        "safety check failed: {dir} contains none of {indicators}; run this from the root of the target repository or pass --force"
    )]
    SafetyCheck { dir: PathBuf, indicators: String },

    /// A plan entry is absolute or climbs out of the target with `..`.
    #[error("plan path '{path}' must be relative and stay inside the target directory")]
    InvalidPlanPath { path: String },

    #[error("could not create temporary workspace")]
    Workspace(#[source] std::io::Error),

    /// Cloning the source workflow repository failed; nothing was removed.
    #[error("failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        source: VcsError,
    },

    /// Some removals failed after others succeeded.
    #[error(
        "failed to remove {}; target left in a mixed state (already removed: {})",
        join_display(.failures),
        join_display(.removed)
    )]
    Remove {
        failures: Vec<PathFailure>,
        removed: Vec<String>,
    },

    /// A copy failed after removals were applied.
    #[error("failed to copy {path}; removals were already applied, target left in a mixed state")]
    Copy {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl MigrateError {
    pub fn is_safety_check(&self) -> bool {
        matches!(self, MigrateError::SafetyCheck { .. })
    }
}

/// Why a single fleet candidate could not be migrated.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("could not create temporary clone directory")]
    Workspace(#[source] std::io::Error),

    #[error("{step} failed")]
    Git {
        step: &'static str,
        #[source]
        source: VcsError,
    },

    #[error(transparent)]
    Migrate(#[from] MigrateError),
}

/// Errors that abort a whole fleet run.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("repository scan failed")]
    Scan(#[from] RemoteError),
}
