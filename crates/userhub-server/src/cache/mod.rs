//! Read-through cache for user lookups.

mod backend;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
