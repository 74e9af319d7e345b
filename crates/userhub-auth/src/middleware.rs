//! Route guard middleware.
//!
//! Validates Bearer tokens on every protected request and attaches the
//! resolved identity to the request extensions. There are exactly two
//! outcomes: the request is rejected with 401 before any handler runs, or it
//! proceeds with a [`CurrentUser`] attached. Nothing is cached across
//! requests.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{
    body::Body,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use userhub_api::ApiError;
use userhub_core::PublicUser;

use crate::service::AuthService;

/// State required by the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Shared auth service.
    pub auth: Arc<AuthService>,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

/// The authenticated identity attached to a request by the guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

/// Authentication middleware that validates Bearer tokens.
///
/// This middleware:
/// 1. Checks if the path is public (auth endpoints, health)
/// 2. Extracts and validates the Bearer token
/// 3. Confirms the subject still exists and is active (fail closed)
/// 4. Stores the [`CurrentUser`] in request extensions for handlers
///
/// Any failure short-circuits with 401; the request never reaches a
/// protected handler unauthenticated.
pub async fn authentication_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if should_skip_authentication(req.uri().path()) {
        return next.run(req).await;
    }

    let auth_header = match req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(header) => header,
        None => {
            tracing::debug!(path = %req.uri().path(), "No Authorization header");
            return unauthorized_response("Authentication required");
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) if !t.is_empty() => t,
        _ => {
            return unauthorized_response("Invalid Authorization header format");
        }
    };

    let claims = match state.auth.tokens().validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Token validation failed");
            return unauthorized_response("Invalid token");
        }
    };

    // The token may be cryptographically valid while the subject has since
    // been deleted or deactivated; both fail closed here.
    match state.auth.validate_user_by_id(claims.sub).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.id, "Request authenticated");
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(None) => {
            tracing::debug!(subject = %claims.sub, "Token subject unknown or inactive");
            unauthorized_response("Invalid token")
        }
        Err(e) => {
            tracing::error!(error = %e, "Guard lookup failed");
            ApiError::internal(e.to_string()).into_response()
        }
    }
}

/// Check if a request path should skip authentication.
fn should_skip_authentication(path: &str) -> bool {
    let public_paths = ["/", "/health", "/auth/login", "/auth/register"];
    public_paths.contains(&path)
}

/// Create an unauthorized (401) response.
fn unauthorized_response(message: &str) -> Response {
    ApiError::unauthorized(message).into_response()
}
