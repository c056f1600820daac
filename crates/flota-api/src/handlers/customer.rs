//! Customer handlers
//!
//! HTTP handlers for customer profile management. All endpoints are staff
//! facing; customers themselves interact through the reservation endpoints.

use crate::dto::customer::{CustomerCreateRequest, CustomerResponse, CustomerUpdateRequest};
use crate::dto::{ApiEnvelope, PaginationParams};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use flota_auth::{AdminUser, StaffUser};
use flota_core::models::Customer;
use flota_core::traits::{CustomerRepository, Repository};
use flota_core::AppError;
use flota_db::PgCustomerRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List customer profiles
///
/// GET /api/customers
#[instrument(skip(pool, staff, params))]
pub async fn list_customers(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    params: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    params.validate().map_err(|e| {
        warn!("Customer list validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(email = %staff.email, page = params.page, "Listing customers");

    let repo = PgCustomerRepository::new(pool.get_ref().clone());
    let (customers, total) = futures::try_join!(
        repo.find_all(params.limit(), params.offset()),
        repo.count()
    )?;

    let customers: Vec<CustomerResponse> =
        customers.into_iter().map(CustomerResponse::from).collect();

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(params.paginate(customers, total), "OK")))
}

/// Fetch a single customer profile
///
/// GET /api/customers/{id}
#[instrument(skip(pool, staff))]
pub async fn get_customer(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    debug!(email = %staff.email, customer_id = id, "Fetching customer");

    let repo = PgCustomerRepository::new(pool.get_ref().clone());
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(CustomerResponse::from(customer), "OK")))
}

/// Register a customer profile
///
/// POST /api/customers
#[instrument(skip(pool, staff, req))]
pub async fn create_customer(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    req: web::Json<CustomerCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Customer create validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let email = req.email.trim();
    debug!(email = %staff.email, customer_email = %email, "Registering customer");

    let repo = PgCustomerRepository::new(pool.get_ref().clone());
    if repo.find_by_email(email).await?.is_some() {
        warn!(customer_email = %email, "Customer create rejected: email already registered");
        return Err(AppError::AlreadyExists(format!(
            "A customer with email {} already exists",
            email
        )));
    }

    let new_customer = Customer {
        id: 0, // Will be set by database
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        email: email.to_string(),
        phone: req.phone.clone(),
        document_number: req.document_number.clone(),
        address: req.address.clone(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = repo.create(&new_customer).await?;

    info!(
        customer_id = created.id,
        customer_email = %created.email,
        email = %staff.email,
        "Customer registered successfully"
    );

    Ok(HttpResponse::Created().json(ApiEnvelope::created(
        CustomerResponse::from(created),
        "Customer registered successfully",
    )))
}

/// Update a customer profile
///
/// PUT /api/customers/{id}
#[instrument(skip(pool, staff, req))]
pub async fn update_customer(
    pool: web::Data<PgPool>,
    staff: StaffUser,
    path: web::Path<i32>,
    req: web::Json<CustomerUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Customer update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let id = path.into_inner();
    debug!(email = %staff.email, customer_id = id, "Updating customer");

    let repo = PgCustomerRepository::new(pool.get_ref().clone());
    let mut customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;

    let changes = req.into_inner();
    if let Some(first_name) = changes.first_name {
        customer.first_name = first_name;
    }
    if let Some(last_name) = changes.last_name {
        customer.last_name = last_name;
    }
    if let Some(email) = changes.email {
        let email = email.trim().to_string();
        if email != customer.email && repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "A customer with email {} already exists",
                email
            )));
        }
        customer.email = email;
    }
    if let Some(phone) = changes.phone {
        customer.phone = Some(phone);
    }
    if let Some(document_number) = changes.document_number {
        customer.document_number = Some(document_number);
    }
    if let Some(address) = changes.address {
        customer.address = Some(address);
    }
    customer.updated_at = Utc::now();

    let updated = repo.update(&customer).await?;

    info!(customer_id = updated.id, email = %staff.email, "Customer updated successfully");

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok(
        CustomerResponse::from(updated),
        "Customer updated successfully",
    )))
}

/// Remove a customer profile
///
/// DELETE /api/customers/{id}
#[instrument(skip(pool, admin))]
pub async fn delete_customer(
    pool: web::Data<PgPool>,
    admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    debug!(email = %admin.email, customer_id = id, "Deleting customer");

    let repo = PgCustomerRepository::new(pool.get_ref().clone());
    if !repo.delete(id).await? {
        return Err(AppError::CustomerNotFound(id.to_string()));
    }

    info!(customer_id = id, email = %admin.email, "Customer deleted successfully");

    Ok(HttpResponse::Ok().json(ApiEnvelope::ok_message("Customer deleted successfully")))
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}
