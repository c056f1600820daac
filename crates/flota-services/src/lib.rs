//! Business logic services for FlotaRental
//!
//! This crate contains the business logic that orchestrates the rental
//! operations: the reservation lifecycle and revenue reporting.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service is generic over the repository traits it depends on
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `ReservationService` - Booking, cancellation, damage reports and history
//! - `RevenueService` - Monthly and yearly revenue reports

pub mod reservation;
pub mod revenue;

pub use reservation::{BookingRequest, BookingUpdate, ReservationService};
pub use revenue::RevenueService;

/// Business logic constants
pub mod constants {
    /// Lowest reservation number handed out to new bookings
    pub const RESERVATION_NUMBER_MIN: i32 = 100_000;

    /// Highest reservation number handed out to new bookings
    pub const RESERVATION_NUMBER_MAX: i32 = 999_999;

    /// How many inserts to attempt when generated reservation numbers
    /// collide with existing bookings
    pub const NUMBER_RETRY_ATTEMPTS: u32 = 3;
}
