//! In-memory [`VersionControl`] for tests.
//!
//! A "clone" writes the registered file tree plus an empty `.git/` directory
//! into the destination, so cloned targets pass the safety gate the way real
//! clones do. Every call is recorded.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::VcsError;
use crate::vcs::VersionControl;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Clone { url: String, dest: PathBuf },
    CreateBranch { dir: PathBuf, name: String },
    CommitAll { dir: PathBuf, message: String },
    Push { dir: PathBuf, branch: String },
}

#[derive(Debug, Default)]
pub struct FakeVcs {
    trees: HashMap<String, Vec<(String, String)>>,
    failing_clones: HashSet<String>,
    /// url -> 1-based clone attempt that fails.
    failing_clone_attempts: HashMap<String, usize>,
    failing_pushes: HashSet<String>,
    calls: Mutex<Vec<VcsCall>>,
    origins: Mutex<HashMap<PathBuf, String>>,
}

fn fake_failure(args: String, dir: &Path) -> VcsError {
    VcsError::Failed {
        args,
        dir: dir.to_path_buf(),
        status: "exit status: 128".to_string(),
    }
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the files a clone of `url` produces (relative path, content).
    pub fn with_tree(mut self, url: &str, files: &[(&str, &str)]) -> Self {
        self.trees.insert(
            url.to_string(),
            files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    /// Every clone of `url` fails.
    pub fn fail_clone(mut self, url: &str) -> Self {
        self.failing_clones.insert(url.to_string());
        self
    }

    /// Only the `attempt`-th clone (1-based) of `url` fails.
    pub fn fail_clone_attempt(mut self, url: &str, attempt: usize) -> Self {
        self.failing_clone_attempts.insert(url.to_string(), attempt);
        self
    }

    /// Pushes from a clone of `url` fail.
    pub fn fail_push(mut self, url: &str) -> Self {
        self.failing_pushes.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cloned_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::Clone { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn origin_of(&self, dir: &Path) -> Option<String> {
        self.origins.lock().unwrap().get(dir).cloned()
    }
}

impl VersionControl for FakeVcs {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
        self.record(VcsCall::Clone {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        });
        let attempt = self
            .cloned_urls()
            .iter()
            .filter(|u| u.as_str() == url)
            .count();
        let args = format!("clone {url} {}", dest.display());

        if self.failing_clones.contains(url)
            || self.failing_clone_attempts.get(url) == Some(&attempt)
        {
            return Err(fake_failure(args, dest));
        }
        let Some(files) = self.trees.get(url) else {
            return Err(fake_failure(args, dest));
        };

        let io = |e: std::io::Error| VcsError::Spawn {
            args: args.clone(),
            dir: dest.to_path_buf(),
            source: e,
        };
        fs::create_dir_all(dest.join(".git")).map_err(io)?;
        for (relative, content) in files {
            let path = dest.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io)?;
            }
            fs::write(&path, content).map_err(io)?;
        }
        self.origins
            .lock()
            .unwrap()
            .insert(dest.to_path_buf(), url.to_string());
        Ok(())
    }

    fn create_branch(&self, dir: &Path, name: &str) -> Result<(), VcsError> {
        self.record(VcsCall::CreateBranch {
            dir: dir.to_path_buf(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn commit_all(&self, dir: &Path, message: &str) -> Result<(), VcsError> {
        self.record(VcsCall::CommitAll {
            dir: dir.to_path_buf(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.record(VcsCall::Push {
            dir: dir.to_path_buf(),
            branch: branch.to_string(),
        });
        match self.origin_of(dir) {
            Some(url) if self.failing_pushes.contains(&url) => Err(fake_failure(
                format!("push --set-upstream origin {branch}"),
                dir,
            )),
            _ => Ok(()),
        }
    }
}
