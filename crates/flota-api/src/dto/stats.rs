//! Statistics DTOs

use flota_core::models::UserStats;
use rust_decimal::Decimal;
use serde::Serialize;

/// Fleet-wide counters for the back-office dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Vehicles registered in the fleet
    pub total_vehicles: i64,
    /// Vehicles currently free to book
    pub available_vehicles: i64,
    /// Customer profiles on file
    pub total_customers: i64,
    /// Reservations ever recorded
    pub total_reservations: i64,
    /// Reservations whose return date has not passed yet
    pub active_reservations: i64,
    /// Revenue booked in the current calendar year
    pub year_revenue: Decimal,
    /// Account counters by role
    pub users: UserStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_stats_serializes() {
        let stats = DashboardStats {
            total_vehicles: 12,
            available_vehicles: 9,
            total_customers: 40,
            total_reservations: 310,
            active_reservations: 3,
            year_revenue: Decimal::new(152050, 2),
            users: UserStats::default(),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_vehicles"], 12);
        assert_eq!(json["available_vehicles"], 9);
        assert_eq!(json["users"]["total_users"], 0);
    }
}
