//! Shepherd core library — domain types, fleet configuration, errors.
//!
//! - [`types`] — repository refs, migration plan, run options, outcomes
//! - [`config`] — YAML fleet configuration with built-in defaults
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{FleetConfig, ProbeConfig};
pub use error::ConfigError;
pub use types::{
    CandidateSet, FleetReport, MigrationPlan, OutcomeStatus, PerRepoOutcome, ProbePredicate,
    RepoFilter, RepositoryRef, RunOptions,
};
