//! User CRUD handlers.
//!
//! Thin HTTP shims over [`UserService`]; the route guard has already
//! authenticated the request by the time these run.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use userhub_api::ApiError;

use super::service::{CreateUserRequest, UpdateUserRequest};
use crate::state::AppState;

/// POST /users - Create a new user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.create(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users - List all users ordered by name.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.find_all().await?;
    Ok(Json(users))
}

/// GET /users/{id} - Read a single user.
pub async fn read_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let user = state.users.find_one(id).await?;
    Ok(Json(user))
}

/// PUT /users/{id} - Apply a partial update.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let user = state.users.update(id, &request).await?;
    Ok(Json(user))
}

/// DELETE /users/{id} - Hard-delete a user.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid UUID format"))
}
