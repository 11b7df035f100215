//! # shepherd-migrate
//!
//! Workflow migration for one target directory, and for a whole fleet.
//!
//! [`Migrator::migrate`] swaps a target repository's CI files for the ones in
//! a source workflow repository. [`FleetOrchestrator::run`] scans an
//! organization and migrates every candidate in its own temporary clone.
//! All `git` work goes through the [`VersionControl`] trait; [`GitCli`] is
//! the production implementation.

pub mod error;
pub mod fakes;
pub mod fleet;
mod fsops;
pub mod migrator;
pub mod safety;
pub mod vcs;

pub use error::{error_chain, CandidateError, FleetError, MigrateError, PathFailure, VcsError};
pub use fleet::FleetOrchestrator;
pub use migrator::{MigrationReport, Migrator};
pub use safety::{check_repository_root, found_indicators, ROOT_INDICATORS};
pub use vcs::{resolve_local_source, GitCli, VersionControl};
