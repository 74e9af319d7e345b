//! # userhub-core
//!
//! Core types for the userhub user-management service.
//!
//! This crate provides:
//! - The [`User`] record and its builder
//! - The [`PublicUser`] projection returned over the API (never carries the
//!   password hash)
//! - The [`CoreError`] type and input validation helpers
//!
//! Everything else in the workspace builds on these types: storage backends
//! persist [`User`] values, the auth layer verifies credentials against them,
//! and HTTP handlers only ever serialize [`PublicUser`].

pub mod error;
pub mod user;

pub use error::{CoreError, ErrorCategory};
pub use user::{PublicUser, User, UserBuilder, validate_email, validate_name, validate_password};

/// Type alias for core operation results.
pub type Result<T> = std::result::Result<T, CoreError>;
