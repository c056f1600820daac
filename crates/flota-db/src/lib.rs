//! FlotaRental Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the FlotaRental system. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for all domain entities
//! - Atomic conditional updates for vehicle availability
//! - Store-side revenue aggregation queries

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use flota_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
