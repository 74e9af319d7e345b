//! The user record and its public projection.
//!
//! [`User`] is the persistence-layer shape and carries the password hash; it
//! deliberately does not implement `Serialize` so it can never leak into an
//! HTTP response by accident. [`PublicUser`] is the outward shape.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::CoreError;

// =============================================================================
// User Record
// =============================================================================

/// A user account.
///
/// Users authenticate with email + password and are gated by the `active`
/// flag: inactive accounts cannot log in and are invisible to the route
/// guard, though CRUD reads still return them.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique identifier, server-assigned at creation.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Email address. Unique (case-sensitive as stored); uniqueness is
    /// enforced by the persistence layer and violations surface as conflicts.
    pub email: String,

    /// Argon2 password hash. Never exposed outward.
    pub password_hash: String,

    /// Whether the account is active. Inactive users cannot authenticate.
    pub active: bool,

    /// When the user was created.
    pub created_at: OffsetDateTime,

    /// When the user was last updated.
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a new active user with a fresh UUID and current timestamps.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new user builder.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> UserBuilder {
        UserBuilder::new(name, email, password_hash)
    }

    /// Returns `true` if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the public projection of this user.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// =============================================================================
// User Builder
// =============================================================================

/// Builder for creating `User` instances.
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            user: User::new(name, email, password_hash),
        }
    }

    /// Sets the user ID.
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.user.id = id;
        self
    }

    /// Sets whether the user is active.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.user.active = active;
        self
    }

    /// Sets the creation and update timestamps to the same instant.
    #[must_use]
    pub fn timestamps(mut self, at: OffsetDateTime) -> Self {
        self.user.created_at = at;
        self.user.updated_at = at;
        self
    }

    /// Builds the user.
    #[must_use]
    pub fn build(self) -> User {
        self.user
    }
}

// =============================================================================
// Public Projection
// =============================================================================

/// The password-stripped view of a user returned by every API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        user.to_public()
    }
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        user.to_public()
    }
}

// =============================================================================
// Input Validation
// =============================================================================

/// Validates a display name: must be non-empty after trimming.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name must not be empty"));
    }
    Ok(())
}

/// Validates an email address.
///
/// A deliberately shallow check (`local@domain` with a dot in the domain);
/// real deliverability is the mail system's problem, the unique index catches
/// duplicates.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(CoreError::validation("email must be a valid address"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(CoreError::validation("email must be a valid address"));
    }
    Ok(())
}

/// Validates a plaintext password: at least 6 characters.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.len() < 6 {
        return Err(CoreError::validation(
            "password must be at least 6 characters long",
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new("Ann", "ann@x.com", "hash");
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@x.com");
        assert!(user.active);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_user_builder() {
        let id = Uuid::new_v4();
        let user = User::builder("Ann", "ann@x.com", "hash")
            .id(id)
            .active(false)
            .build();

        assert_eq!(user.id, id);
        assert!(!user.is_active());
    }

    #[test]
    fn test_public_projection_strips_password_hash() {
        let user = User::new("Ann", "ann@x.com", "secret-hash");
        let public = user.to_public();

        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("ann@x.com"));
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_public_user_round_trip() {
        let user = User::new("Ann", "ann@x.com", "hash");
        let public = PublicUser::from(&user);

        let json = serde_json::to_string(&public).unwrap();
        let parsed: PublicUser = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, public);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ann").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ann@x.com").is_ok());
        assert!(validate_email("a.b@sub.domain.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("ann@").is_err());
        assert!(validate_email("ann@nodot").is_err());
        assert!(validate_email("a nn@x.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }
}
