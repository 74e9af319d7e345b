//! User CRUD: the cached record store and its HTTP handlers.

pub mod handlers;
pub mod service;

pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
