//! Data transfer objects for the HTTP API

pub mod auth;
pub mod common;
pub mod customer;
pub mod reservation;
pub mod stats;
pub mod vehicle;

pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, RegisterRequest};
pub use common::{ApiEnvelope, PaginationParams};
pub use customer::{CustomerCreateRequest, CustomerResponse, CustomerUpdateRequest};
pub use reservation::{
    DamageRequest, ReservationCreateRequest, ReservationResponse, ReservationUpdateRequest,
};
pub use stats::DashboardStats;
pub use vehicle::{VehicleCreateRequest, VehicleResponse, VehicleUpdateRequest};
