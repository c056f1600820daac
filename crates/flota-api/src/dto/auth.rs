//! Authentication DTOs

use chrono::{DateTime, Utc};
use flota_core::models::UserInfo;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    /// Account password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Successful login payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type, always "Bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// Authenticated account
    pub user: UserInfo,
}

impl LoginResponse {
    /// Build a login payload around a freshly issued token
    pub fn new(access_token: String, expires_in: i64, user: UserInfo) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Self-service signup payload
///
/// Accounts created through this endpoint always get the COMMON_USER role;
/// staff accounts are provisioned out of band.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Account email, also links the customer profile
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    /// Initial password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Current session payload
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Authenticated account
    pub user: UserInfo,
    /// When the presented token expires
    pub token_expires_at: DateTime<Utc>,
}

/// Password change payload
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Password currently on file
    #[validate(length(min = 1, message = "Current password must not be empty"))]
    pub current_password: String,

    /// Replacement password
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}
