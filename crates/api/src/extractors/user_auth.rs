//! Session authentication extractor.
//!
//! Provides an Axum extractor for the caller of a protected route plus the
//! role checks handlers run before any write.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::UserRole;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuthData;

/// Authenticated user information from the session token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the token subject claim.
    pub user_id: Uuid,
    /// Login email, used as the actor on audit fields.
    pub email: String,
    pub role: UserRole,
    /// Token ID (jti) for session tracking.
    pub jti: String,
    /// Token expiry as a Unix timestamp.
    pub expires_at: i64,
}

impl From<UserAuthData> for UserAuth {
    fn from(data: UserAuthData) -> Self {
        Self {
            user_id: data.user_id,
            email: data.email,
            role: data.role,
            jti: data.jti,
            expires_at: data.expires_at,
        }
    }
}

impl UserAuth {
    /// Name stamped on created_by/updated_by and history rows.
    pub fn actor(&self) -> &str {
        &self.email
    }

    /// Fails with 403 unless the caller's role passes `allowed`.
    pub fn require(&self, allowed: fn(&UserRole) -> bool, message: &str) -> Result<(), ApiError> {
        if allowed(&self.role) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                role = self.role.as_str(),
                "Role check failed: {}",
                message
            );
            Err(ApiError::Forbidden(message.to_string()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Inserted by require_user_auth on protected routes
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(auth.clone().into());
        }

        UserAuthData::from_headers(&state.jwt, &parts.headers).map(Into::into)
    }
}
