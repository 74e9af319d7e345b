//! In-memory user storage.
//!
//! Backs tests and single-process experiments with the same observable
//! semantics as the PostgreSQL backend: email uniqueness yields conflicts,
//! missing ids yield not-found, listing is ordered by name ascending.

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use userhub_core::User;

use crate::error::StorageError;
use crate::traits::UserStorage;
use crate::StorageResult;

/// In-memory user storage backend using a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryUserStorage {
    users: DashMap<Uuid, User>,
}

impl MemoryUserStorage {
    /// Creates a new empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn email_taken_by_other(&self, email: &str, id: Uuid) -> bool {
        self.users
            .iter()
            .any(|entry| entry.email == email && entry.id != id)
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.clone()))
    }

    async fn list(&self) -> StorageResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|entry| entry.clone()).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn create(&self, user: &User) -> StorageResult<()> {
        if self.email_taken_by_other(&user.email, user.id) {
            return Err(StorageError::conflict(format!(
                "email {} already exists",
                user.email
            )));
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        if !self.users.contains_key(&user.id) {
            return Err(StorageError::not_found(user.id.to_string()));
        }
        if self.email_taken_by_other(&user.email, user.id) {
            return Err(StorageError::conflict(format!(
                "email {} already exists",
                user.email
            )));
        }
        let mut updated = user.clone();
        updated.updated_at = OffsetDateTime::now_utc();
        self.users.insert(user.id, updated);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        match self.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(id.to_string())),
        }
    }
}
