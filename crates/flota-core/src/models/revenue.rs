//! Revenue report models
//!
//! Aggregated shapes produced by the statistics endpoints. Monthly summaries
//! come from store-side sums; detailed reports are recomputed per reservation
//! so the cost buckets stay consistent with the pricing rules.

use chrono::Month;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// English month name for a 1-based month number
///
/// Returns an empty string outside [1, 12]; callers validate the month before
/// building reports.
pub fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

/// Revenue summary for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub total_revenue: Decimal,
    pub total_reservations: i64,
    pub average_per_reservation: Decimal,
}

impl MonthlyRevenue {
    /// Build a summary from a reservation count and pre-aggregated total.
    ///
    /// The average divides total by count; an empty month averages zero.
    pub fn new(year: i32, month: u32, total_revenue: Decimal, total_reservations: i64) -> Self {
        let average_per_reservation = if total_reservations > 0 {
            total_revenue / Decimal::from(total_reservations)
        } else {
            Decimal::ZERO
        };

        Self {
            year,
            month,
            month_name: month_name(month),
            total_revenue,
            total_reservations,
            average_per_reservation,
        }
    }
}

/// Itemized revenue for one month, split into pricing buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenueDetailed {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub base_revenue: Decimal,
    pub insurance_revenue: Decimal,
    pub tax_revenue: Decimal,
    pub total_revenue: Decimal,
    pub total_reservations: i64,
    pub average_per_reservation: Decimal,
}

impl MonthlyRevenueDetailed {
    /// Build an itemized report from the three revenue buckets.
    ///
    /// The total is the sum of the buckets; an empty month averages zero.
    pub fn new(
        year: i32,
        month: u32,
        base_revenue: Decimal,
        insurance_revenue: Decimal,
        tax_revenue: Decimal,
        total_reservations: i64,
    ) -> Self {
        let total_revenue = base_revenue + insurance_revenue + tax_revenue;
        let average_per_reservation = if total_reservations > 0 {
            total_revenue / Decimal::from(total_reservations)
        } else {
            Decimal::ZERO
        };

        Self {
            year,
            month,
            month_name: month_name(month),
            base_revenue,
            insurance_revenue,
            tax_revenue,
            total_revenue,
            total_reservations,
            average_per_reservation,
        }
    }
}

/// Twelve-month revenue breakdown for one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyRevenue {
    pub year: i32,
    pub months: Vec<MonthlyRevenue>,
    pub total_revenue: Decimal,
}

/// User population counters, aggregated by role in a single pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub admins: i64,
    pub employees: i64,
    pub common_users: i64,
}
