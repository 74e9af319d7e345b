//! User storage.
//!
//! Persists user accounts in the `users` table. Email uniqueness is enforced
//! by a unique index; violations surface as `StorageError::Conflict`.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use userhub_core::User;
use userhub_storage::{StorageError, StorageResult, UserStorage};

use crate::PgPool;

/// Row tuple as selected from the `users` table.
type UserTuple = (
    Uuid,
    String,
    String,
    String,
    bool,
    OffsetDateTime,
    OffsetDateTime,
);

fn user_from_tuple(row: UserTuple) -> User {
    User {
        id: row.0,
        name: row.1,
        email: row.2,
        password_hash: row.3,
        active: row.4,
        created_at: row.5,
        updated_at: row.6,
    }
}

/// PostgreSQL user storage.
#[derive(Clone)]
pub struct PostgresUserStorage {
    pool: PgPool,
}

impl PostgresUserStorage {
    /// Create a new user storage backed by the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_db_error(e: sqlx_core::Error, email: &str) -> StorageError {
        if let sqlx_core::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return StorageError::conflict(format!("email {} already exists", email));
        }
        StorageError::database(e.to_string())
    }
}

#[async_trait]
impl UserStorage for PostgresUserStorage {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let row: Option<UserTuple> = query_as(
            r#"
            SELECT id, name, email, password_hash, active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::database(e.to_string()))?;

        Ok(row.map(user_from_tuple))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let row: Option<UserTuple> = query_as(
            r#"
            SELECT id, name, email, password_hash, active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::database(e.to_string()))?;

        Ok(row.map(user_from_tuple))
    }

    async fn list(&self) -> StorageResult<Vec<User>> {
        let rows: Vec<UserTuple> = query_as(
            r#"
            SELECT id, name, email, password_hash, active, created_at, updated_at
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::database(e.to_string()))?;

        Ok(rows.into_iter().map(user_from_tuple).collect())
    }

    async fn create(&self, user: &User) -> StorageResult<()> {
        query(
            r#"
            INSERT INTO users (id, name, email, password_hash, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_db_error(e, &user.email))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let result = query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password_hash = $4,
                active = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_db_error(e, &user.email))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(user.id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(id.to_string()));
        }

        Ok(())
    }
}
