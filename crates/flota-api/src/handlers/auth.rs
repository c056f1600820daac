//! Authentication handlers
//!
//! HTTP handlers for authentication endpoints.

use crate::dto::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, RegisterRequest,
};
use crate::dto::ApiEnvelope;
use actix_web::{cookie::Cookie, web, HttpResponse};
use chrono::{DateTime, Utc};
use flota_auth::{AuthenticatedUser, JwtService, PasswordService};
use flota_core::models::{User, UserInfo, UserRole};
use flota_core::traits::{Repository, UserRepository};
use flota_core::AppError;
use flota_db::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

/// Login endpoint
///
/// POST /api/auth/login
#[instrument(skip(pool, jwt_service, password_service, req))]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_service: web::Data<Arc<JwtService>>,
    password_service: web::Data<Arc<PasswordService>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Login validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let email = req.email.trim();
    let password = &req.password;

    debug!(email = %email, "Processing login request");

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let user = user_repo.find_by_email(email).await?.ok_or_else(|| {
        info!(email = %email, "Login failed: user not found");
        AppError::InvalidCredentials
    })?;

    if !user.can_login() {
        warn!(email = %email, "Login failed: user is inactive");
        return Err(AppError::InvalidCredentials);
    }

    let password_valid = password_service
        .verify_password(password, &user.password_hash)
        .map_err(|e| {
            error!("Password verification error: {}", e);
            AppError::Internal("Password verification failed".to_string())
        })?;

    if !password_valid {
        info!(email = %email, "Login failed: invalid password");
        return Err(AppError::InvalidCredentials);
    }

    // Best effort, a failed timestamp must not block the login
    if let Err(e) = user_repo.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    let token = jwt_service.create_token_for_user(&user)?;
    let expires_in = jwt_service.expiration_secs();

    info!(email = %email, role = %user.role, "Login successful");

    let user_info = UserInfo::from(&user);
    let response = LoginResponse::new(token.clone(), expires_in, user_info);

    let cookie = Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(actix_web::cookie::time::Duration::seconds(expires_in))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiEnvelope::ok(response, "Login successful")))
}

/// Logout endpoint
///
/// POST /api/auth/logout
///
/// Tokens are stateless, so logout only clears the cookie and leaves an
/// audit trail in the logs.
#[instrument(skip(user))]
pub async fn logout(user: AuthenticatedUser) -> HttpResponse {
    info!(email = %user.email, "User logged out");

    let cookie = Cookie::build("token", "")
        .path("/")
        .http_only(true)
        .max_age(actix_web::cookie::time::Duration::seconds(0))
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiEnvelope::ok_message("Logged out successfully"))
}

/// Get current user info
///
/// GET /api/auth/me
#[instrument(skip(pool, user))]
pub async fn me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!(email = %user.email, "Getting current user info");

    // Fresh read so role or status changes show up immediately
    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let db_user = user_repo
        .find_by_email(&user.email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(user.email.clone()))?;

    let response = MeResponse {
        user: UserInfo::from(&db_user),
        token_expires_at: DateTime::from_timestamp(user.claims.exp, 0).unwrap_or_default(),
    };

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(response, "OK")))
}

/// Register a new account
///
/// POST /api/auth/register
///
/// Open self-service signup. The role is always COMMON_USER; staff accounts
/// are provisioned directly by administrators.
#[instrument(skip(pool, password_service, req))]
pub async fn register(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Register validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let email = req.email.trim();
    debug!(email = %email, "Processing registration request");

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    if user_repo.find_by_email(email).await?.is_some() {
        warn!(email = %email, "Registration rejected: email already taken");
        return Err(AppError::AlreadyExists(format!(
            "A user with email {} already exists",
            email
        )));
    }

    let password_hash = password_service.hash_password(&req.password)?;

    let new_user = User {
        id: 0, // Will be set by database
        name: req.name.clone(),
        email: email.to_string(),
        password_hash,
        role: UserRole::CommonUser,
        active: true,
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created_user = user_repo.create(&new_user).await?;

    info!(
        email = %created_user.email,
        id = %created_user.id,
        "User registered successfully"
    );

    let user_info = UserInfo::from(&created_user);
    Ok(HttpResponse::Created().json(ApiEnvelope::created(
        user_info,
        "User registered successfully",
    )))
}

/// Change password
///
/// POST /api/auth/change-password
#[instrument(skip(pool, password_service, user, req))]
pub async fn change_password(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    user: AuthenticatedUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Change password validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(email = %user.email, "Processing password change request");

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let mut db_user = user_repo
        .find_by_email(&user.email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(user.email.clone()))?;

    let current_valid =
        password_service.verify_password(&req.current_password, &db_user.password_hash)?;

    if !current_valid {
        warn!(email = %user.email, "Change password failed: invalid current password");
        return Err(AppError::InvalidCredentials);
    }

    db_user.password_hash = password_service.hash_password(&req.new_password)?;
    db_user.updated_at = Utc::now();

    user_repo.update(&db_user).await?;

    info!(email = %user.email, "Password changed successfully");

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok_message("Password changed successfully")))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me))
            .route("/register", web::post().to(register))
            .route("/change-password", web::post().to(change_password)),
    );
}
