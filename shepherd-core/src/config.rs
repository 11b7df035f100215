//! Fleet configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.shepherd/
//!   fleet.yaml   (optional — every field falls back to a built-in default)
//! ```
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{MigrationPlan, ProbePredicate, RepoFilter};

/// Which file is fetched from each repository and what it must contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub path: String,
    /// Literal marker the file must contain; `None` means existence is enough.
    pub contains: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            path: "Jenkinsfile".to_string(),
            contains: None,
        }
    }
}

impl ProbeConfig {
    pub fn predicate(&self) -> ProbePredicate {
        match self.contains.as_deref() {
            Some(marker) if !marker.is_empty() => ProbePredicate::Contains(marker.to_string()),
            _ => ProbePredicate::Exists,
        }
    }
}

/// Settings for scanning an organization and migrating its repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub org: String,
    pub repo_suffix: String,
    pub exclude_names: Vec<String>,
    pub exclude_substring: Option<String>,
    pub include_archived: bool,
    pub probe: ProbeConfig,
    pub branch: String,
    pub commit_message: String,
    /// Clone URL with `{org}` and `{repo}` placeholders.
    pub clone_url_template: String,
    pub http_timeout_secs: u64,
    pub plan: MigrationPlan,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            org: "gdcorp-crm".to_string(),
            repo_suffix: "-dotnet".to_string(),
            exclude_names: Vec::new(),
            exclude_substring: None,
            include_archived: false,
            probe: ProbeConfig::default(),
            branch: "migrate-workflows".to_string(),
            commit_message: "Migrate .NET workflows to GHA".to_string(),
            clone_url_template: "git@github.com:{org}/{repo}.git".to_string(),
            http_timeout_secs: 30,
            plan: MigrationPlan::default(),
        }
    }
}

impl FleetConfig {
    pub fn repo_filter(&self) -> RepoFilter {
        RepoFilter {
            org: self.org.clone(),
            suffix: self.repo_suffix.clone(),
            exclude_names: self.exclude_names.clone(),
            exclude_substring: self.exclude_substring.clone(),
            include_archived: self.include_archived,
        }
    }

    pub fn clone_url(&self, repo: &str) -> String {
        self.clone_url_template
            .replace("{org}", &self.org)
            .replace("{repo}", repo)
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// `<home>/.shepherd/fleet.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".shepherd").join("fleet.yaml")
}

/// Load a config file.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load(path: &Path) -> Result<FleetConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    // An empty file is a valid "all defaults" document.
    if contents.trim().is_empty() {
        return Ok(FleetConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pick the config for this run.
///
/// An explicit path must exist. Without one, `<home>/.shepherd/fleet.yaml` is
/// used when present, and the built-in defaults otherwise.
pub fn resolve_at(home: &Path, explicit: Option<&Path>) -> Result<FleetConfig, ConfigError> {
    if let Some(path) = explicit {
        return load(path);
    }
    let path = config_path_at(home);
    if path.exists() {
        load(&path)
    } else {
        Ok(FleetConfig::default())
    }
}

/// `resolve_at` convenience wrapper; falls back to defaults when no home
/// directory can be determined.
pub fn resolve(explicit: Option<&Path>) -> Result<FleetConfig, ConfigError> {
    match dirs::home_dir() {
        Some(home) => resolve_at(&home, explicit),
        None => match explicit {
            Some(path) => load(path),
            None => Ok(FleetConfig::default()),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clone_url_substitutes_placeholders() {
        let cfg = FleetConfig::default();
        assert_eq!(
            cfg.clone_url("billing-dotnet"),
            "git@github.com:gdcorp-crm/billing-dotnet.git"
        );
    }

    #[test]
    fn probe_without_marker_is_existence() {
        assert_eq!(ProbeConfig::default().predicate(), ProbePredicate::Exists);
        let empty = ProbeConfig {
            contains: Some(String::new()),
            ..ProbeConfig::default()
        };
        assert_eq!(empty.predicate(), ProbePredicate::Exists);
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let home = TempDir::new().unwrap();
        let cfg = resolve_at(home.path(), None).expect("resolve");
        assert_eq!(cfg, FleetConfig::default());
    }

    #[test]
    fn resolve_reads_home_config() {
        let home = TempDir::new().unwrap();
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "org: acme\nrepo_suffix: -svc\n").unwrap();

        let cfg = resolve_at(home.path(), None).expect("resolve");
        assert_eq!(cfg.org, "acme");
        assert_eq!(cfg.repo_suffix, "-svc");
        assert_eq!(cfg.branch, "migrate-workflows");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(load(&path).expect("load"), FleetConfig::default());
    }
}
