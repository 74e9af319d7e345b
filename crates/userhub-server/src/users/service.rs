//! Cached user CRUD service.
//!
//! Wraps the persistent store with a read-through / write-invalidate cache:
//! reads populate `"users"` (the collection) or `"user-<id>"` lazily on a
//! miss, every mutation deletes the affected keys and lets the next read
//! repopulate them. Persistence failures are logged with the operation name
//! and identifier, then propagated unmodified.
//!
//! Note the asymmetry with the auth layer: `find_one` returns inactive users
//! (admin tooling needs to see them), while the route guard's
//! `validate_user_by_id` filters them out. Intentional; do not unify.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use userhub_api::ApiError;
use userhub_auth::hash_password;
use userhub_core::{
    PublicUser, User, validate_email, validate_name, validate_password,
};
use userhub_storage::{StorageError, UserStorage};

use crate::cache::CacheBackend;

/// Cache key for the full user listing.
const USERS_CACHE_KEY: &str = "users";

/// Cache key for a single user.
fn user_cache_key(id: Uuid) -> String {
    format!("user-{id}")
}

// =============================================================================
// Request Types
// =============================================================================

/// Body for `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    /// Validates the request before it reaches business logic.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_name(&self.name).map_err(|e| ApiError::bad_request(e.to_string()))?;
        validate_email(&self.email).map_err(|e| ApiError::bad_request(e.to_string()))?;
        validate_password(&self.password).map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(())
    }
}

/// Body for `PUT /users/{id}`. All fields optional; omitted fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
}

impl UpdateUserRequest {
    /// Validates the provided fields.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref name) = self.name {
            validate_name(name).map_err(|e| ApiError::bad_request(e.to_string()))?;
        }
        if let Some(ref email) = self.email {
            validate_email(email).map_err(|e| ApiError::bad_request(e.to_string()))?;
        }
        if let Some(ref password) = self.password {
            validate_password(password).map_err(|e| ApiError::bad_request(e.to_string()))?;
        }
        Ok(())
    }
}

// =============================================================================
// User Service
// =============================================================================

/// CRUD operations over user records with the cache-aside layer.
pub struct UserService {
    storage: Arc<dyn UserStorage>,
    cache: CacheBackend,
    cache_ttl: Duration,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(storage: Arc<dyn UserStorage>, cache: CacheBackend, cache_ttl: Duration) -> Self {
        Self {
            storage,
            cache,
            cache_ttl,
        }
    }

    /// Creates a user (active by default) and invalidates the collection key.
    pub async fn create(&self, request: &CreateUserRequest) -> Result<PublicUser, ApiError> {
        request.validate()?;

        info!(email = %request.email, "Creating new user");

        if self
            .storage
            .find_by_email(&request.email)
            .await
            .map_err(|e| self.storage_failure("create", &request.email, e))?
            .is_some()
        {
            return Err(ApiError::conflict("User with this email already exists"));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        let user = User::new(request.name.clone(), request.email.clone(), password_hash);

        self.storage.create(&user).await.map_err(|e| {
            if e.is_conflict() {
                ApiError::conflict("User with this email already exists")
            } else {
                self.storage_failure("create", &request.email, e)
            }
        })?;

        self.cache.invalidate(USERS_CACHE_KEY).await;
        info!(user_id = %user.id, "User created successfully");

        Ok(user.to_public())
    }

    /// Lists all users ordered by name ascending, read-through on `"users"`.
    pub async fn find_all(&self) -> Result<Vec<PublicUser>, ApiError> {
        if let Some(cached) = self.cache.get(USERS_CACHE_KEY).await
            && let Ok(users) = serde_json::from_slice::<Vec<PublicUser>>(&cached)
        {
            return Ok(users);
        }

        let users: Vec<PublicUser> = self
            .storage
            .list()
            .await
            .map_err(|e| self.storage_failure("findAll", "-", e))?
            .iter()
            .map(PublicUser::from)
            .collect();

        if let Ok(bytes) = serde_json::to_vec(&users) {
            self.cache.set(USERS_CACHE_KEY, bytes, self.cache_ttl).await;
        }

        Ok(users)
    }

    /// Fetches one user by id, read-through on `"user-<id>"`.
    ///
    /// Does not filter on the active flag.
    pub async fn find_one(&self, id: Uuid) -> Result<PublicUser, ApiError> {
        let key = user_cache_key(id);

        if let Some(cached) = self.cache.get(&key).await
            && let Ok(user) = serde_json::from_slice::<PublicUser>(&cached)
        {
            return Ok(user);
        }

        let user = self
            .storage
            .find_by_id(id)
            .await
            .map_err(|e| self.storage_failure("findOne", &id.to_string(), e))?
            .ok_or_else(|| ApiError::not_found(format!("User with ID {id} not found")))?;

        let public = user.to_public();
        if let Ok(bytes) = serde_json::to_vec(&public) {
            self.cache.set(&key, bytes, self.cache_ttl).await;
        }

        Ok(public)
    }

    /// Applies a partial update, invalidating both cache keys.
    ///
    /// Existence is confirmed first via `find_one`, whose not-found failure
    /// propagates as-is.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateUserRequest,
    ) -> Result<PublicUser, ApiError> {
        request.validate()?;
        self.find_one(id).await?;

        let mut user = self
            .storage
            .find_by_id(id)
            .await
            .map_err(|e| self.storage_failure("update", &id.to_string(), e))?
            .ok_or_else(|| ApiError::not_found(format!("User with ID {id} not found")))?;

        if let Some(ref email) = request.email
            && email != &user.email
        {
            let taken = self
                .storage
                .find_by_email(email)
                .await
                .map_err(|e| self.storage_failure("update", &id.to_string(), e))?
                .is_some();
            if taken {
                return Err(ApiError::conflict("User with this email already exists"));
            }
            user.email = email.clone();
        }
        if let Some(ref name) = request.name {
            user.name = name.clone();
        }
        if let Some(ref password) = request.password {
            user.password_hash =
                hash_password(password).map_err(|e| ApiError::internal(e.to_string()))?;
        }
        if let Some(active) = request.active {
            user.active = active;
        }

        self.storage.update(&user).await.map_err(|e| {
            if e.is_conflict() {
                ApiError::conflict("User with this email already exists")
            } else {
                self.storage_failure("update", &id.to_string(), e)
            }
        })?;

        self.cache.invalidate(&user_cache_key(id)).await;
        self.cache.invalidate(USERS_CACHE_KEY).await;
        info!(user_id = %id, "User updated successfully");

        // Re-read so the response carries the storage-assigned update time.
        let updated = self
            .storage
            .find_by_id(id)
            .await
            .map_err(|e| self.storage_failure("update", &id.to_string(), e))?
            .ok_or_else(|| ApiError::not_found(format!("User with ID {id} not found")))?;

        Ok(updated.to_public())
    }

    /// Hard-deletes a user, invalidating both cache keys.
    ///
    /// Fails with not-found on the first and every repeated attempt.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.find_one(id).await?;

        self.storage.delete(id).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::not_found(format!("User with ID {id} not found"))
            } else {
                self.storage_failure("delete", &id.to_string(), e)
            }
        })?;

        self.cache.invalidate(&user_cache_key(id)).await;
        self.cache.invalidate(USERS_CACHE_KEY).await;
        info!(user_id = %id, "User deleted successfully");

        Ok(())
    }

    fn storage_failure(&self, operation: &str, identifier: &str, e: StorageError) -> ApiError {
        match e {
            StorageError::NotFound { ref id } => {
                warn!(operation, identifier, "Record vanished mid-operation");
                ApiError::not_found(format!("User with ID {id} not found"))
            }
            other => {
                error!(operation, identifier, error = %other, "Storage operation failed");
                ApiError::internal(other.to_string())
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use userhub_storage::MemoryUserStorage;

    fn service() -> (UserService, Arc<MemoryUserStorage>) {
        let storage = Arc::new(MemoryUserStorage::new());
        let service = UserService::new(
            storage.clone(),
            CacheBackend::new_local(),
            Duration::from_secs(120),
        );
        (service, storage)
    }

    fn create_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_defaults_active() {
        let (service, storage) = service();

        let public = service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();
        assert!(public.active);

        let stored = storage.find_by_id(public.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let (service, _) = service();
        service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();

        let err = service
            .create(&create_request("Other", "ann@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let (service, storage) = service();

        let mut bad = create_request("", "ann@x.com");
        assert!(matches!(
            service.create(&bad).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));

        bad = create_request("Ann", "nope");
        assert!(matches!(
            service.create(&bad).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));

        bad = create_request("Ann", "ann@x.com");
        bad.password = "short".to_string();
        assert!(matches!(
            service.create(&bad).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));

        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_find_one_returns_inactive_users() {
        let (service, _) = service();
        let public = service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();

        service
            .update(
                public.id,
                &UpdateUserRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The CRUD read still sees the deactivated account.
        let found = service.find_one(public.id).await.unwrap();
        assert!(!found.active);
    }

    #[tokio::test]
    async fn test_find_one_missing_not_found() {
        let (service, _) = service();
        let err = service.find_one(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_all_populates_and_serves_from_cache() {
        let (service, storage) = service();
        service
            .create(&create_request("Bob", "bob@x.com"))
            .await
            .unwrap();
        service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();

        let listed = service.find_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Ann");
        assert_eq!(listed[1].name, "Bob");

        // Bypass the service to mutate storage directly: the cached listing
        // must keep serving until something invalidates it.
        let sneaky = storage.find_by_email("bob@x.com").await.unwrap().unwrap();
        storage.delete(sneaky.id).await.unwrap();
        assert_eq!(service.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_invalidates_both_keys() {
        let (service, _) = service();
        let ann = service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();

        // Warm both cache keys.
        service.find_all().await.unwrap();
        service.find_one(ann.id).await.unwrap();

        let updated = service
            .update(
                ann.id,
                &UpdateUserRequest {
                    name: Some("Ann Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ann Renamed");

        // No stale reads after the mutation.
        assert_eq!(service.find_one(ann.id).await.unwrap().name, "Ann Renamed");
        let listed = service.find_all().await.unwrap();
        assert_eq!(listed[0].name, "Ann Renamed");
    }

    #[tokio::test]
    async fn test_update_missing_user_not_found() {
        let (service, _) = service();
        let err = service
            .update(
                Uuid::new_v4(),
                &UpdateUserRequest {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let (service, _) = service();
        service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();
        let bob = service
            .create(&create_request("Bob", "bob@x.com"))
            .await
            .unwrap();

        let err = service
            .update(
                bob.id,
                &UpdateUserRequest {
                    email: Some("ann@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_then_reads_miss() {
        let (service, _) = service();
        let ann = service
            .create(&create_request("Ann", "ann@x.com"))
            .await
            .unwrap();
        service.find_one(ann.id).await.unwrap();
        service.find_all().await.unwrap();

        service.delete(ann.id).await.unwrap();

        assert!(matches!(
            service.find_one(ann.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_not_found_repeatedly() {
        let (service, _) = service();
        let id = Uuid::new_v4();

        for _ in 0..2 {
            let err = service.delete(id).await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)));
        }
    }
}
