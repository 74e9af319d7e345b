use thiserror::Error;

/// Core error types for userhub operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("User conflict: {message}")]
    UserConflict { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new UserNotFound error
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    /// Create a new UserConflict error
    pub fn user_conflict(message: impl Into<String>) -> Self {
        Self::UserConflict {
            message: message.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UserNotFound { .. }
                | Self::UserConflict { .. }
                | Self::JsonError(_)
                | Self::UuidError(_)
        )
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        if self.is_client_error() {
            ErrorCategory::Client
        } else {
            ErrorCategory::Server
        }
    }
}

/// Broad error categories used when mapping to HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller supplied bad input or referenced missing data (4xx).
    Client,
    /// The service itself failed (5xx).
    Server,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        let err = CoreError::validation("name must not be empty");
        assert!(matches!(err, CoreError::Validation(_)));

        let err = CoreError::user_not_found("abc");
        assert_eq!(err.to_string(), "User not found: abc");

        let err = CoreError::user_conflict("email already registered");
        assert_eq!(err.to_string(), "User conflict: email already registered");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            CoreError::validation("x").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            CoreError::user_not_found("x").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            CoreError::configuration("x").category(),
            ErrorCategory::Server
        );
        assert!(CoreError::user_conflict("x").is_client_error());
        assert!(!CoreError::user_conflict("x").is_server_error());
    }
}
