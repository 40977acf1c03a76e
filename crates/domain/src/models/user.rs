//! Application accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Application role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    User,
}

impl UserRole {
    /// Hierarchy: SuperAdmin > Admin > User
    pub fn has_at_least(&self, required: UserRole) -> bool {
        self.priority() >= required.priority()
    }

    fn priority(&self) -> u8 {
        match self {
            UserRole::SuperAdmin => 100,
            UserRole::Admin => 80,
            UserRole::User => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Admins apply assign/return directly; users go through pending requests.
    pub fn applies_directly(&self) -> bool {
        self.has_at_least(UserRole::Admin)
    }

    pub fn can_delete_assets(&self) -> bool {
        self.has_at_least(UserRole::Admin)
    }

    pub fn can_import(&self) -> bool {
        self.has_at_least(UserRole::Admin)
    }

    pub fn can_review_requests(&self) -> bool {
        self.has_at_least(UserRole::Admin)
    }

    pub fn can_delete_employees(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "super_admin" | "superadmin" => Ok(UserRole::SuperAdmin),
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An application account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub department: Option<String>,
    pub role: UserRole,
    pub account_type: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name used for `created_by`/`updated_by` stamps.
    pub fn actor(&self) -> &str {
        &self.email
    }
}

/// Request payload for login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response payload for a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

/// Response payload for the current session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub expires_at: i64,
}

/// Request payload for editing one's own profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
}

/// Request payload for creating an account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
    pub department: Option<String>,
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub account_type: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::User
}

/// Request payload for updating an account.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
    pub department: Option<String>,
    pub role: Option<UserRole>,
    pub account_type: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,
}
