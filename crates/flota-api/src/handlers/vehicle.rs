//! Vehicle handlers
//!
//! HTTP handlers for fleet management endpoints.

use crate::dto::vehicle::{VehicleCreateRequest, VehicleResponse, VehicleUpdateRequest};
use crate::dto::{ApiEnvelope, PaginationParams};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use flota_auth::{AdminUser, AuthenticatedUser, StaffUser};
use flota_core::models::Vehicle;
use flota_core::traits::{Repository, VehicleRepository};
use flota_core::AppError;
use flota_db::PgVehicleRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List vehicles currently free to book
///
/// GET /api/vehicles
#[instrument(skip(pool, user))]
pub async fn list_available(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!(email = %user.email, "Listing available vehicles");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    let vehicles: Vec<VehicleResponse> = repo
        .find_available()
        .await?
        .into_iter()
        .map(VehicleResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(vehicles, "OK")))
}

/// List the whole fleet, reserved vehicles included
///
/// GET /api/vehicles/all
#[instrument(skip(pool, staff, params))]
pub async fn list_all(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    params: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    params.validate().map_err(|e| {
        warn!("Vehicle list validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(email = %staff.email, page = params.page, "Listing full fleet");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    let (vehicles, total) = futures::try_join!(
        repo.find_all(params.limit(), params.offset()),
        repo.count()
    )?;

    let vehicles: Vec<VehicleResponse> = vehicles.into_iter().map(VehicleResponse::from).collect();

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(params.paginate(vehicles, total), "OK")))
}

/// Fetch a single vehicle
///
/// GET /api/vehicles/{id}
#[instrument(skip(pool, user))]
pub async fn get_vehicle(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    debug!(email = %user.email, vehicle_id = id, "Fetching vehicle");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    let vehicle = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::VehicleNotFound(id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(VehicleResponse::from(vehicle), "OK")))
}

/// Register a vehicle in the fleet
///
/// POST /api/vehicles
#[instrument(skip(pool, staff, req))]
pub async fn create_vehicle(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    req: web::Json<VehicleCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Vehicle create validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(email = %staff.email, plate = %req.license_plate, "Registering vehicle");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    if repo.find_by_plate(&req.license_plate).await?.is_some() {
        warn!(plate = %req.license_plate, "Vehicle create rejected: plate already registered");
        return Err(AppError::AlreadyExists(format!(
            "A vehicle with plate {} already exists",
            req.license_plate
        )));
    }

    let new_vehicle = Vehicle {
        id: 0, // Will be set by database
        brand: req.brand.clone(),
        model: req.model.clone(),
        year: req.year,
        license_plate: req.license_plate.clone(),
        daily_rate: req.daily_rate,
        reserved: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = repo.create(&new_vehicle).await?;

    info!(
        vehicle_id = created.id,
        plate = %created.license_plate,
        email = %staff.email,
        "Vehicle registered successfully"
    );

    Ok(HttpResponse::Created().json(ApiEnvelope::created(
        VehicleResponse::from(created),
        "Vehicle registered successfully",
    )))
}

/// Update a vehicle
///
/// PUT /api/vehicles/{id}
#[instrument(skip(pool, staff, req))]
pub async fn update_vehicle(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    path: web::Path<i32>,
    req: web::Json<VehicleUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Vehicle update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let id = path.into_inner();
    debug!(email = %staff.email, vehicle_id = id, "Updating vehicle");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    let mut vehicle = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::VehicleNotFound(id.to_string()))?;

    let changes = req.into_inner();
    if let Some(brand) = changes.brand {
        vehicle.brand = brand;
    }
    if let Some(model) = changes.model {
        vehicle.model = model;
    }
    if let Some(year) = changes.year {
        vehicle.year = year;
    }
    if let Some(license_plate) = changes.license_plate {
        if license_plate != vehicle.license_plate
            && repo.find_by_plate(&license_plate).await?.is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "A vehicle with plate {} already exists",
                license_plate
            )));
        }
        vehicle.license_plate = license_plate;
    }
    if let Some(daily_rate) = changes.daily_rate {
        vehicle.daily_rate = Some(daily_rate);
    }
    if let Some(reserved) = changes.reserved {
        vehicle.reserved = reserved;
    }
    vehicle.updated_at = Utc::now();

    let updated = repo.update(&vehicle).await?;

    info!(vehicle_id = updated.id, email = %staff.email, "Vehicle updated successfully");

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        VehicleResponse::from(updated),
        "Vehicle updated successfully",
    )))
}

/// Remove a vehicle from the fleet
///
/// DELETE /api/vehicles/{id}
#[instrument(skip(pool, admin))]
pub async fn delete_vehicle(
    pool: web::Data<PgPool>,
    admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    debug!(email = %admin.email, vehicle_id = id, "Deleting vehicle");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    if !repo.delete(id).await? {
        return Err(AppError::VehicleNotFound(id.to_string()));
    }

    info!(vehicle_id = id, email = %admin.email, "Vehicle deleted successfully");

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok_message("Vehicle deleted successfully")))
}

/// Configure vehicle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .route("", web::get().to(list_available))
            .route("", web::post().to(create_vehicle))
            .route("/all", web::get().to(list_all))
            .route("/{id}", web::get().to(get_vehicle))
            .route("/{id}", web::put().to(update_vehicle))
            .route("/{id}", web::delete().to(delete_vehicle)),
    );
}
