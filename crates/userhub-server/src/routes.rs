//! Router wiring.

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use userhub_auth::authentication_middleware;

use crate::auth;
use crate::state::AppState;
use crate::users::handlers as users;

/// Builds the application router.
///
/// Every route passes through the authentication guard; the guard itself
/// skips the public paths (auth endpoints, health, root).
pub fn build_router(state: AppState) -> Router {
    let auth_state = state.auth_state.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/profile", get(auth::profile))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::read_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(middleware::from_fn_with_state(
            auth_state,
            authentication_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "userhub",
        "status": "ok"
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
