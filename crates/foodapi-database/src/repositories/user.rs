//! PostgreSQL user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use foodapi_core::error::{AppError, ErrorKind};
use foodapi_core::result::AppResult;
use foodapi_core::traits::UserRepository;
use foodapi_core::types::User;

const SELECT_USER_BY_EMAIL: &str = r#"SELECT id::text AS id, names, last_names, email, "password", created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at FROM "user" WHERE email = $1"#;

const SELECT_USER_BY_ID: &str = r#"SELECT id::text AS id, names, last_names, email, "password", created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at FROM "user" WHERE id::text = $1"#;

/// Row shape of the `"user"` table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    names: String,
    last_names: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            names: row.names,
            last_names: row.last_names,
            email: row.email,
            password_hash: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user lookups against PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(SELECT_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(User::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(User::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
