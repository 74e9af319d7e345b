//! Authentication handlers: login, registration, profile.

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use userhub_api::ApiError;
use userhub_auth::{AuthError, CurrentUser, LoginRequest, RegisterRequest};

use crate::state::AppState;

/// POST /auth/login - Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .auth_state
        .auth
        .login(&request)
        .await
        .map_err(map_auth_error)?;
    Ok(Json(response))
}

/// POST /auth/register - Create an account and log in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .auth_state
        .auth
        .register(&request)
        .await
        .map_err(map_auth_error)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /auth/profile - Return the identity the guard resolved.
pub async fn profile(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    Json(json!({ "user": current.0 }))
}

/// Maps auth-flow failures onto the HTTP error taxonomy.
fn map_auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::Unauthorized { message } => ApiError::unauthorized(message),
        AuthError::Conflict { message } => ApiError::conflict(message),
        AuthError::Validation { message } => ApiError::bad_request(message),
        AuthError::InvalidToken => ApiError::unauthorized("Invalid token"),
        AuthError::Storage { message } | AuthError::Credential { message } => {
            ApiError::internal(message)
        }
    }
}
