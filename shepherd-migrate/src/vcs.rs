//! Version-control operations used by the migrator and the fleet runner.
//!
//! Every call names its working directory explicitly; the process working
//! directory is never changed.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::error::VcsError;

/// The handful of `git` operations a migration needs.
pub trait VersionControl {
    /// Clone `url` into `dest` (which may exist but must be empty).
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError>;

    /// Create branch `name` in `dir` and check it out.
    fn create_branch(&self, dir: &Path, name: &str) -> Result<(), VcsError>;

    /// Stage everything in `dir` and commit it with `message`.
    fn commit_all(&self, dir: &Path, message: &str) -> Result<(), VcsError>;

    /// Push `branch` to `origin`, setting it as upstream.
    fn push(&self, dir: &Path, branch: &str) -> Result<(), VcsError>;
}

/// Anchor a relative local repository path to `base`.
///
/// Clones run from a temporary directory, so `./workflows` must be made
/// absolute first. Remote URLs and paths that do not exist under `base` are
/// returned unchanged.
pub fn resolve_local_source<'a>(base: &Path, source: &'a str) -> Cow<'a, str> {
    let path = Path::new(source);
    if source.contains("://") || path.is_absolute() {
        return Cow::Borrowed(source);
    }
    let anchored = base.join(path);
    if anchored.exists() {
        Cow::Owned(anchored.to_string_lossy().into_owned())
    } else {
        Cow::Borrowed(source)
    }
}

/// Shells out to the `git` binary with inherited stdio, so the operator sees
/// clone and push progress live.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `git` executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<(), VcsError> {
        let rendered = args.join(" ");
        tracing::debug!(dir = %dir.display(), "git {rendered}");
        let status = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .status()
            .map_err(|e| VcsError::Spawn {
                args: rendered.clone(),
                dir: dir.to_path_buf(),
                source: e,
            })?;
        if !status.success() {
            return Err(VcsError::Failed {
                args: rendered,
                dir: dir.to_path_buf(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl VersionControl for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
        let parent = dest.parent().unwrap_or(dest);
        let dest_arg = dest.to_string_lossy();
        self.run(parent, &["clone", url, dest_arg.as_ref()])
    }

    fn create_branch(&self, dir: &Path, name: &str) -> Result<(), VcsError> {
        self.run(dir, &["checkout", "-b", name])
    }

    fn commit_all(&self, dir: &Path, message: &str) -> Result<(), VcsError> {
        self.run(dir, &["add", "."])?;
        self.run(dir, &["commit", "-m", message])
    }

    fn push(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.run(dir, &["push", "--set-upstream", "origin", branch])
    }
}
