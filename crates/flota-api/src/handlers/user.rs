//! User administration handlers
//!
//! Account listing and role counters, restricted to administrators.

use crate::dto::{ApiEnvelope, PaginationParams};
use actix_web::{web, HttpResponse};
use flota_auth::AdminUser;
use flota_core::models::UserInfo;
use flota_core::traits::{Repository, UserRepository};
use flota_core::AppError;
use flota_db::PgUserRepository;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// List user accounts
///
/// GET /api/users
#[instrument(skip(pool, admin, params))]
pub async fn list_users(
    pool: web::Data<PgPool>,
    admin: AdminUser,
    params: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    params.validate().map_err(|e| {
        warn!("User list validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(email = %admin.email, page = params.page, "Listing users");

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let (users, total) = futures::try_join!(
        repo.find_all(params.limit(), params.offset()),
        repo.count()
    )?;

    let users: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(params.paginate(users, total), "OK")))
}

/// Account counters by role
///
/// GET /api/users/stats
#[instrument(skip(pool, admin))]
pub async fn user_stats(
    pool: web::Data<PgPool>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    debug!(email = %admin.email, "Computing user stats");

    let repo = PgUserRepository::new(pool.get_ref().clone());
    let stats = repo.get_stats().await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(stats, "OK")))
}

/// Configure user administration routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/stats", web::get().to(user_stats)),
    );
}
