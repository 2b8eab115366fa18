//! Error hierarchy for the adaptive coupled-map crate.

use thiserror::Error;

/// Root error type for configuration, network construction and result I/O.
///
/// Numerical divergence of the dynamics is not an error: non-finite states
/// are a legitimate outcome of the map and flow through unchanged.
#[derive(Error, Debug)]
pub enum CmlError {
    /// Configuration value out of its admissible range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Adjacency/state arrays that cannot form a network.
    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    /// Malformed persisted matrix or state file.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Community detection could not produce a partition.
    #[error("community detection failed: {0}")]
    Community(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CmlResult<T> = Result<T, CmlError>;
