//! Error types for edna-id
//!
//! Normalization failures are fatal to a single analysis run; the caller
//! decides whether to substitute fallback data or surface the failure.

use thiserror::Error;

/// Raised when a prediction-service payload matches no accepted shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Neither a flat array of records nor an object with a `species` array
    #[error("Unrecognized payload shape: {found}")]
    UnrecognizedShape {
        /// Human-readable description of what was found instead
        found: String,
    },
}

/// Curation proposal errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurationError {
    /// Proposal already accepted or rejected
    #[error("Proposal {proposal_id} already {status}")]
    AlreadyDecided { proposal_id: String, status: String },

    /// Proposed replacement species name is empty
    #[error("Proposed species name must not be empty")]
    EmptyTarget,
}
