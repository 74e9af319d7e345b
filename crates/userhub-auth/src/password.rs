//! Password hashing and verification.
//!
//! Uses Argon2id (hybrid mode) with:
//! - Cryptographically secure random salt (OsRng)
//! - Default parameters (memory cost, time cost, parallelism)
//! - PHC string format for storage
//!
//! Plaintext passwords are never logged anywhere in this crate.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AuthError;
use crate::AuthResult;

/// Hash a password for secure storage.
///
/// Each call generates a fresh salt, so hashing the same password twice
/// yields different PHC strings.
///
/// # Errors
///
/// Returns `AuthError::Credential` if hashing fails (rare).
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::credential(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it doesn't.
///
/// # Errors
///
/// Returns `AuthError::Credential` only if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::credential(e.to_string()))?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}
