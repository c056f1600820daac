//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic.

use crate::error::AppError;
use crate::models::{Customer, Reservation, ReservationWithRate, User, UserStats, Vehicle};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Vehicle repository trait with specialized methods
#[async_trait]
pub trait VehicleRepository: Repository<Vehicle, i32> {
    /// Find vehicle by license plate
    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError>;

    /// List vehicles that are not currently reserved
    async fn find_available(&self) -> Result<Vec<Vehicle>, AppError>;

    /// Count vehicles that are not currently reserved
    async fn count_available(&self) -> Result<i64, AppError>;

    /// Mark a vehicle as reserved, but only if it is currently unreserved.
    ///
    /// Returns `false` when the vehicle was already reserved (or does not
    /// exist), so two concurrent bookings cannot both claim the same vehicle.
    async fn mark_reserved(&self, id: i32) -> Result<bool, AppError>;

    /// Clear the reserved flag. Returns `false` when no row changed.
    async fn release(&self, id: i32) -> Result<bool, AppError>;
}

/// Customer repository trait with specialized methods
#[async_trait]
pub trait CustomerRepository: Repository<Customer, i32> {
    /// Find customer by email (the bridge from an authenticated user)
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError>;
}

/// Reservation repository trait with specialized methods
#[async_trait]
pub trait ReservationRepository: Repository<Reservation, i32> {
    /// Find reservation by its public booking number
    async fn find_by_number(&self, number: i32) -> Result<Option<Reservation>, AppError>;

    /// Delete reservation by booking number. Returns `false` when no row matched.
    async fn delete_by_number(&self, number: i32) -> Result<bool, AppError>;

    /// Set the damage description on a reservation, by booking number.
    /// Returns `None` when no reservation matched.
    async fn update_damage(
        &self,
        number: i32,
        description: &str,
    ) -> Result<Option<Reservation>, AppError>;

    /// Rental history for one customer, ordered by rental date descending
    async fn find_history(&self, customer_id: i32) -> Result<Vec<Reservation>, AppError>;

    /// Reservations whose rental date falls in the given month, joined with
    /// the vehicle's daily rate for pricing fallback
    async fn find_by_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<ReservationWithRate>, AppError>;

    /// Pre-aggregated revenue total for one month, computed store-side with
    /// the same day-floor and rate-fallback rules as the pricing model
    async fn monthly_revenue_sum(&self, year: i32, month: u32) -> Result<Decimal, AppError>;

    /// Pre-aggregated revenue total for a whole year
    async fn year_revenue_sum(&self, year: i32) -> Result<Decimal, AppError>;
}

/// User repository trait with specialized methods
#[async_trait]
pub trait UserRepository: Repository<User, i32> {
    /// Find user by email (the login identity)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Update last login timestamp
    async fn update_last_login(&self, id: i32) -> Result<(), AppError>;

    /// Aggregated user statistics (totals, active, per-role) in one query
    async fn get_stats(&self) -> Result<UserStats, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(3, 20);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(0, 10); // page 0 becomes 1
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 2000); // per_page capped at 1000
        assert_eq!(p.per_page, 1000);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(95, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(100, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(101, 1, 10);
        assert_eq!(meta.total_pages, 11);
    }
}
