//! User storage trait.
//!
//! Defines the interface for user persistence operations.
//! Implementations are provided by storage backends (PostgreSQL in
//! production, in-memory for tests).

use async_trait::async_trait;
use uuid::Uuid;

use userhub_core::User;

use crate::StorageResult;

/// Storage operations for users.
///
/// This trait defines the interface for persisting and retrieving users.
/// Implementations handle the actual database operations; callers inject the
/// implementation rather than extending a database client.
///
/// # Example
///
/// ```ignore
/// use userhub_storage::UserStorage;
///
/// async fn example(storage: &dyn UserStorage) {
///     if let Some(user) = storage.find_by_email("ann@x.com").await? {
///         println!("Found user: {}", user.name);
///     }
/// }
/// ```
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Find a user by their unique ID.
    ///
    /// Returns `None` if the user doesn't exist. No active-status filtering
    /// happens here; callers that need it filter themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Find a user by their email address (exact, case-sensitive match).
    ///
    /// Returns `None` if no user has this email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// List all users ordered by name ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list(&self) -> StorageResult<Vec<User>>;

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a user with the same email already
    /// exists, or `StorageError::Database` if the operation fails.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Replace an existing user record (matched by `user.id`).
    ///
    /// Last write wins; there is no versioning or compare-and-swap.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist,
    /// `StorageError::Conflict` if the new email collides with another user,
    /// or `StorageError::Database` if the operation fails.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Hard-delete a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist, or
    /// `StorageError::Database` if the operation fails.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}
