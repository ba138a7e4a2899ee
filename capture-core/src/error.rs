//! Error types

use std::path::PathBuf;

/// Errors that abort a single decision
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A feature was emitted that the weight table does not know
    #[error("feature `{feature}` has no weight in the {role} weight table")]
    UnweightedFeature { feature: String, role: &'static str },

    #[error("agent {0} asked to act before initialize()")]
    Uninitialized(usize),
}

/// Errors while loading or validating agent configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
