//! Repository-root safety gate.
//!
//! The removal set deletes whole directories, so a migration only runs in a
//! directory that carries at least one of [`ROOT_INDICATORS`] unless forced.

use std::path::Path;

use crate::error::MigrateError;

/// Files or folders whose presence marks a repository root.
pub const ROOT_INDICATORS: &[&str] = &["package.json", "global.json", "README.md", ".git"];

/// The indicators present in `dir`, in [`ROOT_INDICATORS`] order.
pub fn found_indicators(dir: &Path) -> Vec<&'static str> {
    ROOT_INDICATORS
        .iter()
        .copied()
        .filter(|name| dir.join(name).symlink_metadata().is_ok())
        .collect()
}

/// Refuse to proceed unless `dir` looks like a repository root or `force` is set.
pub fn check_repository_root(dir: &Path, force: bool) -> Result<(), MigrateError> {
    if force {
        tracing::warn!(dir = %dir.display(), "safety check skipped (--force)");
        return Ok(());
    }
    let found = found_indicators(dir);
    if found.is_empty() {
        return Err(MigrateError::SafetyCheck {
            dir: dir.to_path_buf(),
            indicators: ROOT_INDICATORS.join(", "),
        });
    }
    tracing::debug!(dir = %dir.display(), indicators = ?found, "safety check passed");
    Ok(())
}
