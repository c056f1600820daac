//! JWT Claims structure
//!
//! Defines the claims structure used in JWT tokens for authentication.

use chrono::{Duration, Utc};
use flota_core::models::{LoggedUser, UserRole};
use serde::{Deserialize, Serialize};

/// JWT Claims
///
/// Standard claims used in JWT tokens for user authentication. The subject
/// is the user's numeric id rendered as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Login email
    pub email: String,

    /// User role
    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims for the given user identity
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::Claims;
    /// use flota_core::models::UserRole;
    ///
    /// let claims = Claims::new(7, "Ana", "ana@example.com", UserRole::Admin);
    /// assert_eq!(claims.sub, "7");
    /// assert_eq!(claims.role, UserRole::Admin);
    /// ```
    pub fn new(user_id: i32, name: &str, email: &str, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: 0, // Will be set by JwtService
        }
    }

    /// Create new claims with custom expiration duration
    pub fn with_expiration(
        user_id: i32,
        name: &str,
        email: &str,
        role: UserRole,
        expires_in_secs: i64,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_secs);

        Self {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        self.exp <= now
    }

    /// Numeric user id from the subject claim
    pub fn user_id(&self) -> i32 {
        self.sub.parse().unwrap_or(0)
    }

    /// Get the user role
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if user has back-office privileges
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Build the request principal these claims represent
    pub fn to_logged_user(&self) -> LoggedUser {
        LoggedUser::new(self.user_id(), &self.name, &self.email, self.role)
    }
}
