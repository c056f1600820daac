//! HTTP request handlers
//!
//! Each module owns one URL scope and exposes a `configure` function that
//! the server mounts under `/api`.

pub mod auth;
pub mod customer;
pub mod reservation;
pub mod stats;
pub mod user;
pub mod vehicle;

pub use auth::configure as configure_auth;
pub use customer::configure as configure_customers;
pub use reservation::configure as configure_reservations;
pub use stats::configure as configure_stats;
pub use user::configure as configure_users;
pub use vehicle::configure as configure_vehicles;
