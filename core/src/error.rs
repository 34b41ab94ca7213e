use thiserror::Error;

use crate::location::LocationId;

/// Failures reported by the graph engine.
///
/// Every variant is deterministic: retrying the same call against the same
/// state yields the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("location {id} not found ({count} locations loaded)")]
    NotFound { id: LocationId, count: usize },

    #[error("no path from location {from} to location {to}")]
    Unreachable { from: LocationId, to: LocationId },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
