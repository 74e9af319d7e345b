//! PostgreSQL storage backend for userhub
//!
//! Provides the production implementation of
//! [`userhub_storage::UserStorage`] on top of a PostgreSQL connection pool,
//! plus pool construction and schema bootstrap.
//!
//! # Example
//!
//! ```ignore
//! use userhub_postgres::{PostgresUserStorage, create_pool, ensure_schema};
//!
//! let pool = create_pool("postgres://localhost/userhub", 10).await?;
//! ensure_schema(&pool).await?;
//! let storage = PostgresUserStorage::new(pool);
//! ```

pub mod pool;
pub mod user;

use sqlx_core::pool::Pool;
use sqlx_postgres::Postgres;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

pub use pool::{create_pool, ensure_schema, mask_password};
pub use user::PostgresUserStorage;
