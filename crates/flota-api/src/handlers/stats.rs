//! Statistics handlers
//!
//! Revenue reports and the back-office dashboard. All endpoints require a
//! staff account.

use crate::dto::stats::DashboardStats;
use crate::dto::ApiEnvelope;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use flota_auth::StaffUser;
use flota_core::traits::{ReservationRepository, UserRepository};
use flota_core::AppError;
use flota_db::{PgReservationRepository, PgUserRepository};
use flota_services::RevenueService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Wire the revenue service to the live reservation repository
fn revenue_service(pool: &PgPool) -> RevenueService<PgReservationRepository> {
    RevenueService::new(Arc::new(PgReservationRepository::new(pool.clone())))
}

/// Months arrive as raw integers; negatives collapse to 0 so the range
/// check downstream rejects them as out of range instead of a routing 404.
fn month_param(raw: i32) -> u32 {
    u32::try_from(raw).unwrap_or(0)
}

/// Revenue summary for one month
///
/// GET /api/statistics/revenue/{year}/{month}
#[instrument(skip(pool, staff))]
pub async fn monthly_revenue(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (year, month) = path.into_inner();
    debug!(email = %staff.email, year, month, "Computing monthly revenue");

    let report = revenue_service(pool.get_ref())
        .monthly_revenue(year, month_param(month))
        .await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(report, "OK")))
}

/// Revenue for one month broken down by charge type
///
/// GET /api/statistics/revenue/{year}/{month}/detailed
#[instrument(skip(pool, staff))]
pub async fn monthly_revenue_detailed(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (year, month) = path.into_inner();
    debug!(email = %staff.email, year, month, "Computing detailed monthly revenue");

    let report = revenue_service(pool.get_ref())
        .monthly_revenue_detailed(year, month_param(month))
        .await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(report, "OK")))
}

/// Revenue for all twelve months of a year
///
/// GET /api/statistics/revenue/{year}
#[instrument(skip(pool, staff))]
pub async fn yearly_revenue(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let year = path.into_inner();
    debug!(email = %staff.email, year, "Computing yearly revenue");

    let report = revenue_service(pool.get_ref()).yearly_breakdown(year).await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(report, "OK")))
}

/// Fleet-wide counters for the dashboard
///
/// GET /api/statistics/dashboard
#[instrument(skip(pool, staff))]
pub async fn dashboard(
    pool: web::Data<PgPool>,
    staff: StaffUser,
) -> Result<HttpResponse, AppError> {
    debug!(email = %staff.email, "Computing dashboard stats");

    let (total_vehicles, available_vehicles): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE reserved = FALSE) FROM vehicles")
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

    let (total_customers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let (total_reservations, active_reservations): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE return_date >= CURRENT_DATE) FROM reservations",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let users = user_repo.get_stats().await?;

    let reservation_repo = PgReservationRepository::new(pool.get_ref().clone());
    let year_revenue = reservation_repo
        .year_revenue_sum(Utc::now().year())
        .await?;

    let stats = DashboardStats {
        total_vehicles,
        available_vehicles,
        total_customers,
        total_reservations,
        active_reservations,
        year_revenue,
        users,
    };

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(stats, "OK")))
}

/// Configure statistics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statistics")
            .route("/dashboard", web::get().to(dashboard))
            .route("/revenue/{year}", web::get().to(yearly_revenue))
            .route("/revenue/{year}/{month}", web::get().to(monthly_revenue))
            .route(
                "/revenue/{year}/{month}/detailed",
                web::get().to(monthly_revenue_detailed),
            ),
    );
}
