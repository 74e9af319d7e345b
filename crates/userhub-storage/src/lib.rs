//! # userhub-storage
//!
//! Storage abstraction for userhub.
//!
//! The [`UserStorage`] trait is the persistence seam: services hold an
//! `Arc<dyn UserStorage>` and never talk to a database driver directly.
//! Backends:
//!
//! - `userhub-postgres` — the production PostgreSQL implementation
//! - [`MemoryUserStorage`] — an in-process implementation with the same
//!   semantics (including email uniqueness), used by unit and integration
//!   tests

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StorageError;
pub use memory::MemoryUserStorage;
pub use traits::UserStorage;

/// Type alias for storage operation results.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
