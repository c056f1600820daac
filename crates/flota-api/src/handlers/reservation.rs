//! Reservation handlers
//!
//! Thin HTTP adapters over [`ReservationService`]. The service owns every
//! authorization and booking rule; handlers only translate between JSON and
//! service calls, so anonymous requests reach the service as an anonymous
//! [`flota_core::models::LoggedUser`] and come back as 401 envelopes.

use crate::dto::reservation::{
    DamageRequest, ReservationCreateRequest, ReservationResponse, ReservationUpdateRequest,
};
use crate::dto::{ApiEnvelope, PaginationParams};
use actix_web::{web, HttpResponse};
use flota_auth::CurrentUser;
use flota_core::AppError;
use flota_db::{PgCustomerRepository, PgReservationRepository, PgVehicleRepository};
use flota_services::ReservationService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use validator::Validate;

type PgReservationService =
    ReservationService<PgVehicleRepository, PgCustomerRepository, PgReservationRepository>;

/// Wire the booking service to the live repositories
fn booking_service(pool: &PgPool) -> PgReservationService {
    ReservationService::new(
        Arc::new(PgVehicleRepository::new(pool.clone())),
        Arc::new(PgCustomerRepository::new(pool.clone())),
        Arc::new(PgReservationRepository::new(pool.clone())),
    )
}

/// Book a vehicle for the calling user
///
/// POST /api/reservations
#[instrument(skip(pool, user, req))]
pub async fn create_reservation(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    req: web::Json<ReservationCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Reservation create validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(vehicle_id = req.vehicle_id, "Processing booking request");

    let service = booking_service(pool.get_ref());
    let created = service
        .create_reservation(&user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(ApiEnvelope::created(
        ReservationResponse::from(created),
        "Reservation created successfully",
    )))
}

/// Cancel a reservation by its public number
///
/// DELETE /api/reservations/{number}
#[instrument(skip(pool, user))]
pub async fn cancel_reservation(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let number = path.into_inner();
    debug!(reservation_number = number, "Processing cancellation");

    let service = booking_service(pool.get_ref());
    service.cancel_reservation(&user, number).await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok_message("Reservation cancelled successfully")))
}

/// Record damage against a reservation
///
/// PUT /api/reservations/{number}/damage
#[instrument(skip(pool, user, req))]
pub async fn register_damage(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<i32>,
    req: web::Json<DamageRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Damage report validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let number = path.into_inner();
    debug!(reservation_number = number, "Processing damage report");

    let service = booking_service(pool.get_ref());
    let updated = service
        .register_damage(&user, number, &req.description)
        .await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        ReservationResponse::from(updated),
        "Damage registered successfully",
    )))
}

/// Rental history for a customer, newest first
///
/// GET /api/reservations/history/{customer_id}
#[instrument(skip(pool, user))]
pub async fn reservation_history(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    debug!(customer_id, "Fetching reservation history");

    let service = booking_service(pool.get_ref());
    let history: Vec<ReservationResponse> = service
        .reservation_history(&user, customer_id)
        .await?
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(history, "OK")))
}

/// List reservations across all customers
///
/// GET /api/reservations
#[instrument(skip(pool, user, params))]
pub async fn list_reservations(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    params: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    params.validate().map_err(|e| {
        warn!("Reservation list validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = params.page, "Listing reservations");

    let service = booking_service(pool.get_ref());
    let reservations: Vec<ReservationResponse> = service
        .list_reservations(&user, params.limit(), params.offset())
        .await?
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(reservations, "OK")))
}

/// Amend a reservation by its public number
///
/// PUT /api/reservations/{number}
#[instrument(skip(pool, user, req))]
pub async fn update_reservation(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<i32>,
    req: web::Json<ReservationUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Reservation update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let number = path.into_inner();
    debug!(reservation_number = number, "Processing reservation update");

    let service = booking_service(pool.get_ref());
    let updated = service
        .update_reservation(&user, number, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        ReservationResponse::from(updated),
        "Reservation updated successfully",
    )))
}

/// Configure reservation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reservations")
            .route("", web::get().to(list_reservations))
            .route("", web::post().to(create_reservation))
            .route("/history/{customer_id}", web::get().to(reservation_history))
            .route("/{number}", web::delete().to(cancel_reservation))
            .route("/{number}", web::put().to(update_reservation))
            .route("/{number}/damage", web::put().to(register_damage)),
    );
}
