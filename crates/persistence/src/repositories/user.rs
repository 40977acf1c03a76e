//! User repository for database operations.

use domain::models::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, USER_COLUMNS};
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a user by email address (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All accounts ordered by email.
    pub async fn list(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let sql = format!("SELECT {} FROM users ORDER BY email", USER_COLUMNS);
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Create a new user account.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
        display_name: Option<&str>,
        department: Option<&str>,
        role: UserRole,
        account_type: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let sql = format!(
            r#"
            INSERT INTO users (email, password_hash, display_name, department, role, account_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(email.trim())
            .bind(password_hash)
            .bind(display_name)
            .bind(department)
            .bind(role.as_str())
            .bind(account_type)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Update administrative fields. `None` leaves a column unchanged.
    pub async fn update_user(
        &self,
        id: Uuid,
        display_name: Option<&str>,
        department: Option<&str>,
        role: Option<UserRole>,
        account_type: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let sql = format!(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                department = COALESCE($3, department),
                role = COALESCE($4, role),
                account_type = COALESCE($5, account_type),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(id)
            .bind(display_name)
            .bind(department)
            .bind(role.map(|r| r.as_str()))
            .bind(account_type)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Update the caller's own profile fields.
    pub async fn update_profile(
        &self,
        id: Uuid,
        display_name: Option<&str>,
        department: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        self.update_user(id, display_name, department, None, None, None)
            .await
    }

    /// Update the user's last login timestamp.
    pub async fn update_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result?;
        Ok(())
    }

    /// Replace the stored password hash. Returns false for unknown users.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
