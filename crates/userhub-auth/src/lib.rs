//! # userhub-auth
//!
//! Authentication module for the userhub server.
//!
//! This crate provides:
//! - Password hashing and verification (Argon2id)
//! - Signed, time-limited access tokens (HS256 JWTs with a server secret)
//! - The authentication flow: login, registration, token validation
//! - The route guard middleware protecting authenticated endpoints
//!
//! ## Overview
//!
//! Tokens are stateless: validity is purely a function of signature and
//! expiry, there is no server-side session record and no revocation before
//! expiry. The guard re-checks the subject against storage on every request,
//! so deactivating a user locks them out immediately even while their token
//! is still cryptographically valid.
//!
//! ## Modules
//!
//! - [`password`] - Credential hashing and verification
//! - [`token`] - Token issuing and validation
//! - [`service`] - Login/registration flow orchestration
//! - [`middleware`] - HTTP guard for protected routes

pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use middleware::{AuthState, CurrentUser, authentication_middleware};
pub use password::{hash_password, verify_password};
pub use service::{AuthResponse, AuthService, LoginRequest, RegisterRequest};
pub use token::{TokenClaims, TokenService};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
