//! Error types for index construction and cluster lookups.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    /// Options that would produce meaningless clusters
    #[error("Invalid cluster options: {0}")]
    InvalidOptions(String),

    /// Point records that cannot be indexed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cluster id that does not belong to this index
    #[error("No cluster with id {0}")]
    UnknownCluster(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
