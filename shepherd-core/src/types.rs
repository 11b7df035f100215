//! Domain types shared by the lister, the migrator and the fleet runner.
//!
//! Everything here lives for a single run; nothing is persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Canonical repository the workflow files are copied from.
pub const DEFAULT_SOURCE_REPO: &str = "git@github.com:gdcorp-crm/crm-jwt-client-dotnet.git";

/// Paths deleted from the target before the new workflow files land.
pub const DEFAULT_REMOVE: &[&str] = &[
    ".github/",
    "docker/",
    "scripts/",
    ".gitignore",
    "Dockerfile",
    "Jenkinsfile",
    "nuget.config",
];

/// Paths copied from the source workflow repository into the target.
pub const DEFAULT_COPY: &[&str] = &[".github/", ".dockerignore", ".gitignore", ".runsettings"];

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// A repository as reported by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>, archived: bool) -> Self {
        Self {
            name: name.into(),
            archived,
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Repositories that matched the listing filter and passed the content probe.
pub type CandidateSet = Vec<RepositoryRef>;

/// Which repositories of an organization are considered at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoFilter {
    pub org: String,
    /// Required name suffix; empty matches every name.
    pub suffix: String,
    /// Exact names never returned.
    pub exclude_names: Vec<String>,
    /// Names containing this substring are never returned.
    pub exclude_substring: Option<String>,
    pub include_archived: bool,
}

impl RepoFilter {
    pub fn matches(&self, repo: &RepositoryRef) -> bool {
        if !repo.name.ends_with(&self.suffix) {
            return false;
        }
        if self.exclude_names.iter().any(|n| *n == repo.name) {
            return false;
        }
        if let Some(needle) = self.exclude_substring.as_deref() {
            if !needle.is_empty() && repo.name.contains(needle) {
                return false;
            }
        }
        self.include_archived || !repo.archived
    }
}

/// Test applied to the decoded content of a probed file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProbePredicate {
    /// The file merely has to exist.
    #[default]
    Exists,
    /// The file has to contain this literal marker.
    Contains(String),
}

impl ProbePredicate {
    pub fn matches(&self, content: &str) -> bool {
        match self {
            ProbePredicate::Exists => true,
            ProbePredicate::Contains(marker) => content.contains(marker.as_str()),
        }
    }
}

impl fmt::Display for ProbePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbePredicate::Exists => write!(f, "exists"),
            ProbePredicate::Contains(marker) => write!(f, "contains '{marker}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Migration inputs
// ---------------------------------------------------------------------------

/// What a migration deletes, what it copies, and where it copies from.
///
/// `remove` and `copy` may name the same path: it is deleted first and then
/// replaced from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationPlan {
    pub source: String,
    pub remove: Vec<String>,
    pub copy: Vec<String>,
}

impl Default for MigrationPlan {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_REPO.to_string(),
            remove: DEFAULT_REMOVE.iter().map(|s| s.to_string()).collect(),
            copy: DEFAULT_COPY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MigrationPlan {
    /// Returns the plan with `source` replaced when an override is given.
    pub fn with_source_override(mut self, source: Option<&str>) -> Self {
        if let Some(url) = source {
            self.source = url.to_string();
        }
        self
    }
}

/// Flags for one run, fixed once the command line is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub force: bool,
    pub source_override: Option<String>,
}

impl RunOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// `"[dry-run] "` in dry-run mode, empty otherwise.
    pub fn log_prefix(&self) -> &'static str {
        if self.dry_run {
            "[dry-run] "
        } else {
            ""
        }
    }
}

// ---------------------------------------------------------------------------
// Fleet outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Success => write!(f, "success"),
            OutcomeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of migrating one repository during a fleet run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerRepoOutcome {
    pub repo: String,
    pub status: OutcomeStatus,
    pub detail: String,
}

impl PerRepoOutcome {
    pub fn success(repo: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            status: OutcomeStatus::Success,
            detail: detail.into(),
        }
    }

    pub fn failed(repo: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            status: OutcomeStatus::Failed,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Everything a fleet run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub outcomes: Vec<PerRepoOutcome>,
}

impl FleetReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
