//! Recursive delete and merge-copy for plan entries.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::MigrateError;

/// Resolve a plan entry (`".github/"`, `"Jenkinsfile"`) under `root`.
///
/// Trailing slashes are cosmetic. Absolute entries and entries containing
/// `..` are rejected.
pub(crate) fn resolve_entry(root: &Path, entry: &str) -> Result<PathBuf, MigrateError> {
    let trimmed = entry.trim_end_matches('/');
    let relative = Path::new(trimmed);
    let escapes = relative.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if trimmed.is_empty() || escapes {
        return Err(MigrateError::InvalidPlanPath {
            path: entry.to_string(),
        });
    }
    Ok(root.join(relative))
}

/// True for anything at `path`, including a dangling symlink.
pub(crate) fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Delete a file, symlink, or directory tree.
pub(crate) fn remove_entry(path: &Path) -> io::Result<()> {
    let meta = path.symlink_metadata()?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Copy `src` onto `dst`.
///
/// Directories are merged: files already at the destination are overwritten,
/// files only at the destination are kept. Missing parents are created.
/// Symlinks are recreated as symlinks, dangling ones included.
pub(crate) fn copy_entry(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src)?;
    if meta.is_dir() {
        fs::create_dir_all(dst)?;
        let mut entries: Vec<_> = fs::read_dir(src)?.collect::<io::Result<_>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            copy_entry(&entry.path(), &dst.join(entry.file_name()))?;
        }
        return Ok(());
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    // Never write through an existing link at the destination.
    if fs::symlink_metadata(dst).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(dst)?;
    }
    if meta.file_type().is_symlink() {
        return copy_link(src, dst);
    }
    fs::copy(src, dst)?;
    Ok(())
}

#[cfg(unix)]
fn copy_link(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    if entry_exists(dst) {
        remove_entry(dst)?;
    }
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_link(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::metadata(src) {
        Ok(_) => fs::copy(src, dst).map(|_| ()),
        Err(e) => {
            tracing::warn!(path = %src.display(), error = %e, "skipping dangling symlink");
            Ok(())
        }
    }
}
