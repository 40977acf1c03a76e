//! Authentication service for login and session tokens.

use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use domain::models::User;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".to_string()),
            AuthError::DatabaseError(db_err) => ApiError::from(db_err),
            AuthError::TokenError(e) => {
                tracing::error!(error = %e, "Failed to issue session token");
                ApiError::Internal("Failed to issue session token".to_string())
            }
            AuthError::PasswordError(e) => {
                tracing::error!(error = %e, "Stored password hash is unusable");
                ApiError::Internal("Failed to verify credentials".to_string())
            }
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

/// Verifies credentials and issues session tokens.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Authenticate with email and password.
    ///
    /// Unknown emails and wrong passwords fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user: User = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id).await?;

        let issued = self
            .jwt
            .issue(user.id, &user.email, user.role.as_str())?;

        Ok(AuthResult {
            user,
            access_token: issued.token,
            expires_in: issued.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::UserDisabled),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::TokenError(JwtError::InvalidToken)),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::DatabaseError(sqlx::Error::RowNotFound)),
            ApiError::NotFound(_)
        ));
    }
}
