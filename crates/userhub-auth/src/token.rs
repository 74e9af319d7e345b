//! Access token issuing and validation.
//!
//! Tokens are HS256 JWTs signed with the server secret from configuration.
//! Claims carry the subject id, email, issue time, and a fixed expiry window
//! (issue time + configured TTL). Validation deliberately reports a single
//! [`AuthError::InvalidToken`] for every failure mode — callers cannot tell
//! "expired" apart from "malformed" or "bad signature".

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AuthError;
use crate::AuthResult;

/// Claims carried in every access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Subject (user ID).
    pub sub: Uuid,

    /// Email of the subject at issue time.
    pub email: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Service for issuing and validating access tokens.
///
/// Thread-safe (`Send + Sync`); one instance is shared across the server.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Creates a new token service from the server secret and token TTL.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a signed token for the given subject.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn issue(&self, user_id: Uuid, email: &str) -> AuthResult<String> {
        self.issue_with_ttl(user_id, email, self.ttl.as_secs() as i64)
    }

    /// Issues a token with an explicit TTL in seconds (may be negative, which
    /// produces an already-expired token; used by expiry tests).
    pub(crate) fn issue_with_ttl(
        &self,
        user_id: Uuid,
        email: &str,
        ttl_secs: i64,
    ) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = TokenClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + ttl_secs,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to encode access token");
            AuthError::credential(e.to_string())
        })
    }

    /// Decodes and validates a token, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the signature check fails, the
    /// token is malformed, or the expiry has passed.
    pub fn validate(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token validation failed");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "ann@x.com").unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let token = service
            .issue_with_ttl(Uuid::new_v4(), "ann@x.com", -3600)
            .unwrap();

        let err = service.validate(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", Duration::from_secs(3600));
        let verifier = TokenService::new("secret-b", Duration::from_secs(3600));

        let token = issuer.issue(Uuid::new_v4(), "ann@x.com").unwrap();
        let err = verifier.validate(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = service();
        assert!(matches!(
            service.validate("not.a.token").unwrap_err(),
            AuthError::InvalidToken
        ));
        assert!(matches!(
            service.validate("").unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = service();
        let token = service.issue(Uuid::new_v4(), "ann@x.com").unwrap();

        // Swap the payload segment for a different (validly encoded) one.
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = service.issue(Uuid::new_v4(), "mallory@x.com").unwrap();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let tampered = parts.join(".");

        assert!(matches!(
            service.validate(&tampered).unwrap_err(),
            AuthError::InvalidToken
        ));
    }
}
