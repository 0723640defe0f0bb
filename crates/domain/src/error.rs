//! Error types for the domain layer.

use thiserror::Error;

/// Failure to turn a wire payload into a collection (or back).
///
/// Always a caller problem: the payload is rejected unchanged and never retried.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid collection payload: {0}")]
    Decode(String),

    #[error("Failed to encode collection: {0}")]
    Encode(String),
}

impl CodecError {
    pub fn decode(message: impl ToString) -> Self {
        Self::Decode(message.to_string())
    }

    pub fn encode(message: impl ToString) -> Self {
        Self::Encode(message.to_string())
    }
}

/// Invalid kind registry configuration, detected at process start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KindRegistryError {
    #[error("Duplicate collection kind: {0}")]
    DuplicateName(String),

    #[error("Duplicate collection path: {0}")]
    DuplicatePath(String),

    #[error("Collection kind {0} declares no labels")]
    NoLabels(String),
}
