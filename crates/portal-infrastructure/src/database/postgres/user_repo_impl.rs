// ============================================================================
// Portal Infrastructure - PostgreSQL User Repository
// File: crates/portal-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use portal_core::domain::User;
use portal_core::error::DomainError;
use portal_core::repositories::UserRepository;
use portal_shared::utils::mask_email;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // Exact match: emails are unique as stored, not case-folded.
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by email: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating user with email: {}", mask_email(&user.email));

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, created_at
            "#
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                warn!("Duplicate email rejected by constraint {:?}", db_err.constraint());
                DomainError::DuplicateEmail(user.email.clone())
            }
            _ => {
                error!("Database error creating user: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        info!("User created successfully: {}", row.id);
        Ok(row.into())
    }
}
