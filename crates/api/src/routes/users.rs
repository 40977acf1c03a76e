//! Account administration routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateUserRequest, UpdateUserRequest, User, UserRole};
use persistence::repositories::UserRepository;
use shared::password::{check_password_policy, hash_password};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

const MANAGE_USERS: &str = "Only super admins can manage users";

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Vec<User>>, ApiError> {
    user_auth.require(|r| r.has_at_least(UserRole::Admin), "Only admins can list users")?;

    let users = UserRepository::new(state.pool.clone()).list().await?;
    Ok(Json(users.into_iter().map(User::from).collect()))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    user_auth.require(UserRole::can_manage_users, MANAGE_USERS)?;
    request.validate()?;
    check_password_policy(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let user: User = UserRepository::new(state.pool.clone())
        .create_user(
            request.email.trim(),
            Some(&password_hash),
            trimmed(&request.display_name),
            trimmed(&request.department),
            request.role,
            trimmed(&request.account_type),
        )
        .await?
        .into();

    info!(
        id = %user.id,
        role = user.role.as_str(),
        created_by = %user_auth.user_id,
        "User created"
    );
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    user_auth.require(UserRole::can_manage_users, MANAGE_USERS)?;
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    if let Some(password) = &request.password {
        check_password_policy(password)?;
        let password_hash = hash_password(password)?;
        if !repo.update_password(id, &password_hash).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
    }

    let user: User = repo
        .update_user(
            id,
            trimmed(&request.display_name),
            trimmed(&request.department),
            request.role,
            trimmed(&request.account_type),
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    info!(
        id = %id,
        password_changed = request.password.is_some(),
        updated_by = %user_auth.user_id,
        "User updated"
    );
    Ok(Json(user))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user_auth.require(UserRole::can_manage_users, MANAGE_USERS)?;
    if id == user_auth.user_id {
        return Err(ApiError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !UserRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(id = %id, deleted_by = %user_auth.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed(&Some("  IT ".to_string())), Some("IT"));
        assert_eq!(trimmed(&None), None);
    }

    #[test]
    fn test_create_request_defaults_to_user_role() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"email":"new@example.com","password":"long-enough-1","display_name":"New"}"#,
        )
        .unwrap();
        assert_eq!(request.role, UserRole::User);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let request: CreateUserRequest =
            serde_json::from_str(r#"{"email":"new@example.com","password":"short"}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
