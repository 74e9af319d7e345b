//! Authentication flow orchestration.
//!
//! [`AuthService`] ties the pieces together: it looks records up through the
//! storage seam, checks credentials, and issues tokens. Every login failure
//! branch is logged with its actual cause but surfaces the same generic
//! unauthorized error, so responses cannot be used to enumerate accounts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use userhub_core::{PublicUser, User, validate_email, validate_name, validate_password};
use userhub_storage::UserStorage;

use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::token::{TokenClaims, TokenService};
use crate::AuthResult;

/// External message for every credential failure.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Validates the request before it reaches business logic.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` describing the first failing field.
    pub fn validate(&self) -> AuthResult<()> {
        validate_name(&self.name).map_err(|e| AuthError::validation(e.to_string()))?;
        validate_email(&self.email).map_err(|e| AuthError::validation(e.to_string()))?;
        validate_password(&self.password).map_err(|e| AuthError::validation(e.to_string()))?;
        Ok(())
    }
}

/// Successful login/registration payload: the token plus the public identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: PublicUser,
}

// =============================================================================
// Auth Service
// =============================================================================

/// Orchestrates login, registration, and token/subject validation.
pub struct AuthService {
    storage: Arc<dyn UserStorage>,
    tokens: TokenService,
}

impl AuthService {
    /// Creates a new auth service over the given storage and token service.
    #[must_use]
    pub fn new(storage: Arc<dyn UserStorage>, tokens: TokenService) -> Self {
        Self { storage, tokens }
    }

    /// Returns the token service (used by the route guard).
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticates a user by email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` with a uniform message when the
    /// email is unknown, the password doesn't match, or the account is
    /// inactive; `AuthError::Storage` when the lookup itself fails.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
        let user = self
            .storage
            .find_by_email(&request.email)
            .await
            .map_err(|e| {
                warn!(error = %e, "Login failed: storage error during lookup");
                AuthError::storage(e.to_string())
            })?;

        let Some(user) = user else {
            warn!(email = %request.email, "Login attempt failed: email not found");
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(email = %request.email, "Login attempt failed: invalid password");
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.active {
            warn!(
                email = %request.email,
                user_id = %user.id,
                "Login attempt failed: user is inactive"
            );
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id, "User logged in successfully");
        self.issue_response(&user)
    }

    /// Registers a new user and logs them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for bad input, `AuthError::Conflict`
    /// if the email is already registered, `AuthError::Storage` on
    /// persistence failure.
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse> {
        request.validate()?;

        let existing = self
            .storage
            .find_by_email(&request.email)
            .await
            .map_err(|e| AuthError::storage(e.to_string()))?;
        if existing.is_some() {
            return Err(AuthError::conflict("Email already registered"));
        }

        let user = User::new(
            request.name.clone(),
            request.email.clone(),
            hash_password(&request.password)?,
        );

        self.storage.create(&user).await.map_err(|e| {
            // A concurrent registration can still lose the race to the unique
            // index; surface it as the same conflict the pre-check reports.
            if e.is_conflict() {
                AuthError::conflict("Email already registered")
            } else {
                warn!(error = %e, email = %request.email, "Registration failed: storage error");
                AuthError::storage(e.to_string())
            }
        })?;

        info!(user_id = %user.id, "User registered successfully");
        self.issue_response(&user)
    }

    /// Validates a token, translating failure into the bad-request class.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation("Invalid token")` for any token
    /// failure.
    pub fn validate_token(&self, token: &str) -> AuthResult<TokenClaims> {
        self.tokens
            .validate(token)
            .map_err(|_| AuthError::validation("Invalid token"))
    }

    /// Looks up a user by id for the route guard.
    ///
    /// Returns `None` (not an error) when the user is absent OR inactive:
    /// both cases fail closed at the guard.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` when the lookup fails.
    pub async fn validate_user_by_id(&self, id: Uuid) -> AuthResult<Option<PublicUser>> {
        let user = self
            .storage
            .find_by_id(id)
            .await
            .map_err(|e| AuthError::storage(e.to_string()))?;

        Ok(user.filter(User::is_active).map(|u| u.to_public()))
    }

    fn issue_response(&self, user: &User) -> AuthResult<AuthResponse> {
        let access_token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthResponse {
            access_token,
            user: user.to_public(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
