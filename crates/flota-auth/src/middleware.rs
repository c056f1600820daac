//! Actix-web authentication middleware and request extractors
//!
//! Provides extractors for the request principal with role-based access
//! control. `CurrentUser` never fails: requests without a valid token carry
//! the anonymous principal and authorization is decided downstream. The
//! other extractors reject the request with a 401 envelope before the
//! handler runs.

use crate::jwt::JwtService;
use crate::Claims;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use flota_core::error::AppError;
use flota_core::models::{LoggedUser, UserRole};
use futures::future::{ready, Ready};
use std::sync::Arc;
use tracing::{debug, warn};

/// Extract JWT token from request
///
/// Checks for token in the following order:
/// 1. Authorization header (Bearer token)
/// 2. Cookie named "token"
fn extract_token_from_request(req: &HttpRequest) -> Option<String> {
    // Try Authorization header first
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if auth_str.starts_with("Bearer ") {
                return Some(auth_str[7..].to_string());
            }
        }
    }

    // Try cookie
    if let Some(cookie) = req.cookie("token") {
        return Some(cookie.value().to_string());
    }

    None
}

/// Resolve the principal for a request, falling back to anonymous
fn resolve_logged_user(req: &HttpRequest) -> LoggedUser {
    let jwt_service = match req.app_data::<web::Data<Arc<JwtService>>>() {
        Some(service) => service.get_ref().clone(),
        None => {
            warn!("JwtService not found in app data");
            return LoggedUser::anonymous();
        }
    };

    let token = match extract_token_from_request(req) {
        Some(t) => t,
        None => {
            debug!("No authentication token found in request");
            return LoggedUser::anonymous();
        }
    };

    match jwt_service.validate_token(&token) {
        Ok(claims) => claims.to_logged_user(),
        Err(e) => {
            debug!(error = %e, "Token rejected, request treated as anonymous");
            LoggedUser::anonymous()
        }
    }
}

/// Current principal extractor
///
/// Always succeeds: requests without a usable token resolve to the anonymous
/// principal. Use this for endpoints where the business flow itself decides
/// whether the caller is allowed in.
///
/// # Examples
///
/// ```no_run
/// use actix_web::HttpResponse;
/// use flota_auth::middleware::CurrentUser;
///
/// async fn booking_handler(user: CurrentUser) -> HttpResponse {
///     if !user.is_authenticated() {
///         // rejected by the service layer
///     }
///     HttpResponse::Ok().finish()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub LoggedUser);

impl CurrentUser {
    /// Consume the extractor, yielding the principal
    pub fn into_inner(self) -> LoggedUser {
        self.0
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = LoggedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(CurrentUser(resolve_logged_user(req))))
    }
}

/// Authenticated user extractor
///
/// Extracts and validates the JWT token, rejecting the request with a 401
/// envelope when no valid token is present.
///
/// # Examples
///
/// ```no_run
/// use actix_web::HttpResponse;
/// use flota_auth::middleware::AuthenticatedUser;
///
/// async fn protected_handler(user: AuthenticatedUser) -> HttpResponse {
///     HttpResponse::Ok().json(serde_json::json!({
///         "name": user.name,
///         "email": user.email
///     }))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The authenticated principal
    pub user: LoggedUser,

    /// Full claims from the JWT token
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Get the user's role
    pub fn role(&self) -> UserRole {
        self.claims.role
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.claims.is_admin()
    }

    /// Check if user has back-office privileges
    pub fn is_staff(&self) -> bool {
        self.claims.is_staff()
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = LoggedUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Extract JWT service from app data
        let jwt_service = match req.app_data::<web::Data<Arc<JwtService>>>() {
            Some(service) => service.get_ref().clone(),
            None => {
                warn!("JwtService not found in app data");
                return ready(Err(AppError::Unauthorized(
                    "Authentication service not configured".to_string(),
                )
                .into()));
            }
        };

        // Extract token from request
        let token = match extract_token_from_request(req) {
            Some(t) => t,
            None => {
                debug!("No authentication token found in request");
                return ready(Err(AppError::Unauthorized(
                    "No authentication token provided".to_string(),
                )
                .into()));
            }
        };

        // Validate token and extract claims
        match jwt_service.validate_token(&token) {
            Ok(claims) => {
                debug!(
                    user_id = %claims.sub,
                    role = ?claims.role,
                    "User authenticated successfully"
                );

                ready(Ok(AuthenticatedUser {
                    user: claims.to_logged_user(),
                    claims,
                }))
            }
            Err(e) => {
                warn!(error = %e, "Token validation failed");
                ready(Err(e.into()))
            }
        }
    }
}

/// Staff user extractor
///
/// Requires the user to have the ADMIN or EMPLOYEE role. Returns a 401
/// envelope otherwise.
///
/// # Examples
///
/// ```no_run
/// use actix_web::HttpResponse;
/// use flota_auth::middleware::StaffUser;
///
/// async fn report_handler(staff: StaffUser) -> HttpResponse {
///     HttpResponse::Ok().json(serde_json::json!({
///         "message": "Staff access granted",
///         "name": staff.name
///     }))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthenticatedUser);

impl std::ops::Deref for StaffUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for StaffUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth_user = match AuthenticatedUser::from_request(req, payload).into_inner() {
            Ok(user) => user,
            Err(e) => return ready(Err(e)),
        };

        // Check if user has back-office privileges
        if !auth_user.is_staff() {
            warn!(
                user_id = %auth_user.claims.sub,
                role = ?auth_user.claims.role,
                "User attempted staff access without privileges"
            );
            return ready(Err(AppError::Unauthorized(
                "User does not have the required role".to_string(),
            )
            .into()));
        }

        debug!(
            user_id = %auth_user.claims.sub,
            role = ?auth_user.claims.role,
            "Staff access granted"
        );

        ready(Ok(StaffUser(auth_user)))
    }
}

/// Admin user extractor
///
/// Requires the user to have the ADMIN role. Returns a 401 envelope
/// otherwise.
///
/// # Examples
///
/// ```no_run
/// use actix_web::HttpResponse;
/// use flota_auth::middleware::AdminUser;
///
/// async fn admin_handler(admin: AdminUser) -> HttpResponse {
///     HttpResponse::Ok().json(serde_json::json!({
///         "message": "Admin access granted",
///         "name": admin.name
///     }))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl std::ops::Deref for AdminUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth_user = match AuthenticatedUser::from_request(req, payload).into_inner() {
            Ok(user) => user,
            Err(e) => return ready(Err(e)),
        };

        // Check if user has admin privileges
        if !auth_user.is_admin() {
            warn!(
                user_id = %auth_user.claims.sub,
                role = ?auth_user.claims.role,
                "User attempted admin access without privileges"
            );
            return ready(Err(AppError::Unauthorized(
                "User does not have the required role".to_string(),
            )
            .into()));
        }

        debug!(
            user_id = %auth_user.claims.sub,
            role = ?auth_user.claims.role,
            "Admin access granted"
        );

        ready(Ok(AdminUser(auth_user)))
    }
}
