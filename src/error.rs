//! Error types for index building, configuration and cluster navigation.

use crate::feature::ClusterId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldmapError>;

#[derive(Debug, Error)]
pub enum FieldmapError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Organization '{name}' has invalid coordinates ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        name: String,
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("No cluster with id {0}")]
    UnknownCluster(ClusterId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
