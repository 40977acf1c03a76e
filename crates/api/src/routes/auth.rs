//! Authentication routes: login, current session, profile and logout.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{LoginRequest, LoginResponse, SessionResponse, UpdateProfileRequest, User};
use persistence::repositories::UserRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::auth::AuthService;

/// Login with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "Login rejected");
            ApiError::from(e)
        })?;

    info!(user_id = %result.user.id, role = result.user.role.as_str(), "User logged in");

    Ok(Json(LoginResponse {
        access_token: result.access_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
        user: result.user,
    }))
}

async fn current_user(state: &AppState, user_auth: &UserAuth) -> Result<User, ApiError> {
    let user: User = UserRepository::new(state.pool.clone())
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?
        .into();

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is disabled".to_string()));
    }
    Ok(user)
}

/// Current session's user.
///
/// GET /api/v1/auth/session
pub async fn session(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = current_user(&state, &user_auth).await?;
    Ok(Json(SessionResponse {
        user,
        expires_at: user_auth.expires_at,
    }))
}

/// Update the caller's display name and department.
///
/// PATCH /api/v1/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;
    current_user(&state, &user_auth).await?;

    let user: User = UserRepository::new(state.pool.clone())
        .update_profile(
            user_auth.user_id,
            request.display_name.as_deref().map(str::trim),
            request.department.as_deref().map(str::trim),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    info!(user_id = %user.id, "Profile updated");
    Ok(Json(user))
}

/// Logout. Tokens are stateless, so the client discards its copy.
///
/// POST /api/v1/auth/logout
pub async fn logout(user_auth: UserAuth) -> StatusCode {
    info!(user_id = %user_auth.user_id, jti = %user_auth.jti, "User logged out");
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let no_password = LoginRequest {
            email: "ops@example.com".to_string(),
            password: String::new(),
        };
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn test_login_validation_maps_to_bad_request() {
        let request = LoginRequest {
            email: "nope".to_string(),
            password: String::new(),
        };
        let err: ApiError = request.validate().unwrap_err().into();
        assert!(matches!(err, ApiError::InvalidFields(_, ref details) if details.len() == 2));
    }
}
