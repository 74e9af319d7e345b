//! # userhub-server
//!
//! HTTP server for userhub: REST endpoints for authentication and user CRUD,
//! the cache-aside layer over the persistent store, configuration loading,
//! and process bootstrap.
//!
//! The request path is guard → handler → cached service → storage; every
//! request runs its own async call chain on the tokio runtime, with no
//! cross-request ordering guarantees (concurrent updates to the same record
//! are last-write-wins at the persistence layer).

pub mod auth;
pub mod cache;
pub mod config;
pub mod observability;
pub mod routes;
pub mod state;
pub mod users;

pub use cache::CacheBackend;
pub use config::{AppConfig, ConfigError, RuntimeEnv};
pub use routes::build_router;
pub use state::AppState;
