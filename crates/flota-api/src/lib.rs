//! FlotaRental HTTP API
//!
//! Actix-web handlers and DTOs for the car rental back office. Routes are
//! grouped per domain under `/api`:
//!
//! - `/auth` login, logout, registration and password management
//! - `/vehicles` fleet management
//! - `/customers` customer profiles
//! - `/reservations` the booking lifecycle
//! - `/statistics` revenue reports and the dashboard
//! - `/users` account administration
//!
//! Every endpoint answers with the `{code, message, data}` envelope from
//! [`dto::ApiEnvelope`]; errors render the same shape through
//! [`flota_core::AppError`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod handlers;

pub use dto::{ApiEnvelope, PaginationParams};
pub use handlers::{
    configure_auth, configure_customers, configure_reservations, configure_stats,
    configure_users, configure_vehicles,
};
