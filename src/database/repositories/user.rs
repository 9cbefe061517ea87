//! User repository implementation

use crate::models::user::{User, UserRole};
use crate::utils::errors::EventFlowError;
use chrono::Utc;
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_banned, banned_at, \
     ban_reason, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
        role: UserRole,
    ) -> Result<User, EventFlowError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, EventFlowError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, EventFlowError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Set or clear a user's ban
    pub async fn set_ban_status(
        &self,
        id: i64,
        is_banned: bool,
        reason: Option<&str>,
    ) -> Result<User, EventFlowError> {
        let banned_at = is_banned.then(Utc::now);
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_banned = $2, banned_at = $3, ban_reason = $4, updated_at = $5
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_banned)
        .bind(banned_at)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

}
