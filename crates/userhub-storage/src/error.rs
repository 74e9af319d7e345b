use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The referenced record does not exist.
    #[error("Record not found: {id}")]
    NotFound {
        /// Identifier of the missing record.
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the violated constraint.
        message: String,
    },

    /// The underlying database failed.
    #[error("Database error: {message}")]
    Database {
        /// Description of the database failure.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Database` error.
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a uniqueness conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if the record was simply absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
