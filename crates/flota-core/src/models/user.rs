//! User and principal models
//!
//! Represents back-office users for authentication and the authenticated
//! principal consumed by the business services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User role enumeration
///
/// Roles travel on the wire as upper-case strings ("ADMIN", "EMPLOYEE",
/// "COMMON_USER") and are parsed case-insensitively at the boundary; inside
/// the application they are always compared by enum equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full administrative access
    Admin,
    /// Back-office staff: fleet, customers, damage reports
    Employee,
    /// Regular customer account
    #[default]
    CommonUser,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Employee => write!(f, "EMPLOYEE"),
            UserRole::CommonUser => write!(f, "COMMON_USER"),
        }
    }
}

impl UserRole {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(UserRole::Admin),
            "EMPLOYEE" => Some(UserRole::Employee),
            "COMMON_USER" => Some(UserRole::CommonUser),
            _ => None,
        }
    }

    /// Check if role carries back-office privileges
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Employee)
    }
}

/// User entity
///
/// Represents a back-office or customer login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i32,

    /// Display name
    pub name: String,

    /// Email address (unique, used for login and the customer bridge)
    pub email: String,

    /// Password hash (never expose in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// User role
    pub role: UserRole,

    /// Whether user is active
    pub active: bool,

    /// Last login timestamp
    pub last_login: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user is active and can login
    pub fn can_login(&self) -> bool {
        self.active
    }

    /// Check if user can perform staff actions
    pub fn is_staff(&self) -> bool {
        self.active && self.role.is_staff()
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            role: UserRole::CommonUser,
            active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User info for API responses (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            active: user.active,
            last_login: user.last_login,
        }
    }
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            active: user.active,
            last_login: user.last_login,
        }
    }
}

/// The authenticated principal attached to a request.
///
/// Produced by the auth layer (an absent or invalid token yields the
/// anonymous sentinel) and consumed, never mutated, by the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedUser {
    /// User id (0 for the anonymous sentinel)
    pub id: i32,

    /// Display name
    pub name: String,

    /// Email address (the customer-record bridge)
    pub email: String,

    /// Whether the caller presented a valid token
    pub authenticated: bool,

    /// Roles granted to the caller
    pub roles: Vec<UserRole>,
}

impl LoggedUser {
    /// The non-authenticated sentinel
    pub fn anonymous() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            authenticated: false,
            roles: Vec::new(),
        }
    }

    /// Build an authenticated principal
    pub fn new(id: i32, name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            authenticated: true,
            roles: vec![role],
        }
    }

    /// True iff the caller holds the named role.
    ///
    /// The name is parsed case-insensitively; unknown names never match.
    pub fn has_role(&self, role: &str) -> bool {
        match UserRole::from_str(role) {
            Some(parsed) => self.roles.contains(&parsed),
            None => false,
        }
    }

    /// True iff the caller holds any of the named roles
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// True iff the token was valid and at least one role was granted
    pub fn is_authenticated(&self) -> bool {
        self.authenticated && !self.roles.is_empty()
    }

    /// Caller holds the ADMIN role
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&UserRole::Admin)
    }

    /// Caller holds the EMPLOYEE role
    pub fn is_employee(&self) -> bool {
        self.roles.contains(&UserRole::Employee)
    }

    /// Caller holds the COMMON_USER role
    pub fn is_common_user(&self) -> bool {
        self.roles.contains(&UserRole::CommonUser)
    }

    /// Caller holds a back-office role (ADMIN or EMPLOYEE)
    pub fn is_staff(&self) -> bool {
        self.is_admin() || self.is_employee()
    }
}

impl Default for LoggedUser {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(UserRole::from_str("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("Employee"), Some(UserRole::Employee));
        assert_eq!(
            UserRole::from_str("common_user"),
            Some(UserRole::CommonUser)
        );
        assert_eq!(UserRole::from_str("superuser"), None);
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&UserRole::CommonUser).unwrap();
        assert_eq!(json, "\"COMMON_USER\"");

        let role: UserRole = serde_json::from_str("\"EMPLOYEE\"").unwrap();
        assert_eq!(role, UserRole::Employee);
    }

    #[test]
    fn test_has_role_matches_any_casing() {
        let user = LoggedUser::new(1, "Ana", "ana@flota.test", UserRole::Admin);

        assert_eq!(user.has_role("ADMIN"), user.has_role("admin"));
        assert!(user.has_role("AdMiN"));
        assert!(!user.has_role("EMPLOYEE"));
        assert!(!user.has_role("no-such-role"));
    }

    #[test]
    fn test_has_any_role() {
        let user = LoggedUser::new(2, "Luis", "luis@flota.test", UserRole::Employee);

        assert!(user.has_any_role(&["ADMIN", "EMPLOYEE"]));
        assert!(user.has_any_role(&["employee"]));
        assert!(!user.has_any_role(&["ADMIN", "COMMON_USER"]));
        assert!(!user.has_any_role(&[]));
    }

    #[test]
    fn test_is_authenticated_requires_roles() {
        assert!(!LoggedUser::anonymous().is_authenticated());

        let mut user = LoggedUser::new(3, "Eva", "eva@flota.test", UserRole::CommonUser);
        assert!(user.is_authenticated());

        user.roles.clear();
        assert!(!user.is_authenticated());
    }

    #[test]
    fn test_staff_predicates() {
        let admin = LoggedUser::new(1, "a", "a@flota.test", UserRole::Admin);
        let employee = LoggedUser::new(2, "e", "e@flota.test", UserRole::Employee);
        let common = LoggedUser::new(3, "c", "c@flota.test", UserRole::CommonUser);

        assert!(admin.is_staff());
        assert!(employee.is_staff());
        assert!(!common.is_staff());

        assert!(admin.is_admin() && !admin.is_employee());
        assert!(employee.is_employee() && !employee.is_admin());
        assert!(common.is_common_user());
    }

    #[test]
    fn test_user_can_login() {
        let active_user = User {
            active: true,
            ..Default::default()
        };
        assert!(active_user.can_login());

        let inactive_user = User {
            active: false,
            ..Default::default()
        };
        assert!(!inactive_user.can_login());
        assert!(!inactive_user.is_staff());
    }
}
