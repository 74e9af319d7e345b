//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request lacks valid credentials.
    ///
    /// All credential failures (unknown email, wrong password, inactive
    /// account, missing/invalid token) collapse into this variant so callers
    /// cannot enumerate accounts; the specific cause is logged at the point
    /// of detection.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// External message (never names the specific cause).
        message: String,
    },

    /// A uniqueness rule was violated (email already registered).
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The token is malformed, has a bad signature, or has expired.
    #[error("Invalid token")]
    InvalidToken,

    /// The input failed validation before reaching business logic.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the invalid input.
        message: String,
    },

    /// The storage layer failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// Credential hashing failed.
    #[error("Credential error: {message}")]
    Credential {
        /// Description of the hashing failure.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Credential` error.
    #[must_use]
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    /// Returns `true` if this failure maps to a 401 response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_predicate() {
        assert!(AuthError::unauthorized("Invalid credentials").is_unauthorized());
        assert!(AuthError::InvalidToken.is_unauthorized());
        assert!(!AuthError::conflict("taken").is_unauthorized());
        assert!(!AuthError::storage("down").is_unauthorized());
    }

    #[test]
    fn test_display_never_leaks_cause_for_token_errors() {
        // Single message regardless of why the token failed.
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
    }
}
