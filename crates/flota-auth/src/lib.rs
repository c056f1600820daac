//! Authentication and authorization for FlotaRental
//!
//! This crate provides JWT-based authentication, password hashing with Argon2,
//! and Actix-web extractors for role-based access control.
//!
//! # Features
//!
//! - JWT token creation and validation
//! - Argon2 password hashing and verification
//! - Request extractors for the current principal, including an infallible
//!   variant that resolves to the anonymous principal
//! - Role-based access control (RBAC)
//!
//! # Examples
//!
//! ## Creating a JWT token
//!
//! ```no_run
//! use flota_auth::{Claims, JwtService};
//! use flota_core::models::UserRole;
//!
//! let jwt_service = JwtService::new("your-secret-key", 1800);
//! let claims = Claims::new(1, "Admin", "admin@example.com", UserRole::Admin);
//! let token = jwt_service.create_token(&claims)?;
//! # Ok::<(), flota_core::error::AppError>(())
//! ```
//!
//! ## Password hashing
//!
//! ```no_run
//! use flota_auth::PasswordService;
//!
//! let password_service = PasswordService::new();
//! let hash = password_service.hash_password("secure_password")?;
//! let is_valid = password_service.verify_password("secure_password", &hash)?;
//! assert!(is_valid);
//! # Ok::<(), flota_core::error::AppError>(())
//! ```
//!
//! ## Using extractors in Actix-web
//!
//! ```no_run
//! use actix_web::HttpResponse;
//! use flota_auth::middleware::{CurrentUser, StaffUser};
//!
//! async fn booking_route(user: CurrentUser) -> HttpResponse {
//!     // `user` may be anonymous; the service layer decides access
//!     HttpResponse::Ok().finish()
//! }
//!
//! async fn staff_route(staff: StaffUser) -> HttpResponse {
//!     HttpResponse::Ok().json(serde_json::json!({
//!         "message": "Staff access granted"
//!     }))
//! }
//! ```

pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthenticatedUser, CurrentUser, StaffUser};
pub use password::PasswordService;
