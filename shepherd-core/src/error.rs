//! Error types for shepherd-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading fleet configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },
}
