//! Session token authentication middleware.
//!
//! Protected routes run behind [`require_user_auth`], which validates the
//! Bearer token and stores the caller in the request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::UserRole;
use shared::jwt::JwtConfig;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller extracted from a session token.
#[derive(Debug, Clone)]
pub struct UserAuthData {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub jti: String,
    pub expires_at: i64,
}

impl UserAuthData {
    /// Validates a session token and returns the caller it names.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, ApiError> {
        let claims = jwt_config.validate(token)?;
        let user_id = claims.user_id()?;
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;

        Ok(Self {
            user_id,
            email: claims.email,
            role,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }

    /// Reads and validates the `Authorization: Bearer` header.
    pub fn from_headers(
        jwt_config: &JwtConfig,
        headers: &axum::http::HeaderMap,
    ) -> Result<Self, ApiError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                ApiError::Unauthorized("Invalid Authorization header format".into())
            })?;
        Self::validate(jwt_config, token.trim())
    }
}

/// Middleware that requires a valid session token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match UserAuthData::from_headers(&state.jwt, req.headers()) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Session token rejected");
            e.into_response()
        }
    }
}
