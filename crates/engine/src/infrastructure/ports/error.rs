//! Error types for port operations.

/// Graph store failures, classified so callers never inspect driver errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store rejected a statement because of a schema constraint
    /// (uniqueness, or a node that still has relationships).
    #[error("Constraint violation in {operation}: {message}")]
    Conflict {
        operation: &'static str,
        message: String,
    },

    /// Connectivity, protocol or internal store failure.
    #[error("Database error in {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// The batch did not finish in time. Whether any of it applied is unknown.
    #[error("Timed out in {operation} after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// A result row could not be decoded into the declared shape.
    #[error("Failed to decode {operation} result: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Conflict,
    Unavailable,
    Timeout,
    Decode,
}

impl StoreError {
    pub fn conflict(operation: &'static str, message: impl ToString) -> Self {
        Self::Conflict {
            operation,
            message: message.to_string(),
        }
    }

    pub fn unavailable(operation: &'static str, message: impl ToString) -> Self {
        Self::Unavailable {
            operation,
            message: message.to_string(),
        }
    }

    pub fn timeout(operation: &'static str, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            operation,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn decode(operation: &'static str, message: impl ToString) -> Self {
        Self::Decode {
            operation,
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Conflict { .. } => StoreErrorKind::Conflict,
            Self::Unavailable { .. } => StoreErrorKind::Unavailable,
            Self::Timeout { .. } => StoreErrorKind::Timeout,
            Self::Decode { .. } => StoreErrorKind::Decode,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
