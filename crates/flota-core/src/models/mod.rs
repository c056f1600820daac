//! Domain models for the rental system

pub mod customer;
pub mod reservation;
pub mod revenue;
pub mod user;
pub mod vehicle;

pub use customer::Customer;
pub use reservation::{CostBreakdown, Reservation, ReservationWithRate};
pub use revenue::{month_name, MonthlyRevenue, MonthlyRevenueDetailed, UserStats, YearlyRevenue};
pub use user::{LoggedUser, User, UserInfo, UserRole};
pub use vehicle::Vehicle;
