//! Repository implementations
//!
//! This module contains concrete implementations of all repository traits
//! defined in flota-core, using sqlx for PostgreSQL access.

pub mod customer_repo;
pub mod reservation_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use customer_repo::PgCustomerRepository;
pub use reservation_repo::PgReservationRepository;
pub use user_repo::PgUserRepository;
pub use vehicle_repo::PgVehicleRepository;
