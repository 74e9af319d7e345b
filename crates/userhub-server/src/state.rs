//! Shared application state.

use std::sync::Arc;

use userhub_auth::AuthState;

use crate::users::UserService;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Cached user CRUD service.
    pub users: Arc<UserService>,
    /// Auth service + guard state.
    pub auth_state: AuthState,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(users: Arc<UserService>, auth_state: AuthState) -> Self {
        Self { users, auth_state }
    }
}
