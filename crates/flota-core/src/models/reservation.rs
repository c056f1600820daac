//! Reservation model and pricing rules
//!
//! A reservation books one vehicle for one customer between two dates. The
//! pricing rules live here so every consumer (booking flow, revenue reports,
//! store-side aggregates) charges the same way.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reservation entity
///
/// `reservation_number` is the human-facing booking identifier, distinct from
/// the primary key; it is generated at creation time in [100000, 999999].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier
    pub id: i32,

    /// Public booking number (unique)
    pub reservation_number: i32,

    /// Customer who booked
    pub customer_id: i32,

    /// Booked vehicle
    pub vehicle_id: i32,

    /// First rental day
    pub rental_date: NaiveDate,

    /// Scheduled return day
    pub return_date: NaiveDate,

    /// Billed-days override; when absent the date difference is used
    pub rental_days: Option<i32>,

    /// Daily-rate override; when absent the vehicle's rate applies
    pub daily_rate: Option<Decimal>,

    /// Rate label (e.g. "DAILY", "WEEKEND")
    pub rate_type: Option<String>,

    /// Vehicle-damage insurance amount
    pub insurance_vehicle: Option<Decimal>,

    /// Third-party insurance amount
    pub insurance_third_party: Option<Decimal>,

    /// Tax amount
    pub tax_amount: Option<Decimal>,

    /// Damage notes, set by staff after the rental
    pub damage_description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Itemized cost of one reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    /// Billed days (never less than 1)
    pub days: i64,
    /// days × effective daily rate
    pub base: Decimal,
    /// Vehicle-damage plus third-party insurance
    pub insurance: Decimal,
    /// Tax amount
    pub tax: Decimal,
    /// base + insurance + tax
    pub total: Decimal,
}

impl Reservation {
    /// Create a new unsaved reservation for the given booking window
    pub fn new(
        customer_id: i32,
        vehicle_id: i32,
        rental_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            reservation_number: 0,
            customer_id,
            vehicle_id,
            rental_date,
            return_date,
            rental_days: None,
            daily_rate: None,
            rate_type: None,
            insurance_vehicle: None,
            insurance_third_party: None,
            tax_amount: None,
            damage_description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of days this reservation bills for.
    ///
    /// Uses the explicit override when present, otherwise the calendar
    /// difference between return and rental date. Every reservation bills at
    /// least one day, including same-day and inverted date ranges.
    #[inline]
    pub fn billable_days(&self) -> i64 {
        let days = match self.rental_days {
            Some(days) => i64::from(days),
            None => (self.return_date - self.rental_date).num_days(),
        };
        days.max(1)
    }

    /// Daily rate applied to this reservation.
    ///
    /// The reservation's own rate wins over the vehicle's rate; with neither
    /// present the rate is zero.
    #[inline]
    pub fn effective_rate(&self, vehicle_rate: Option<Decimal>) -> Decimal {
        self.daily_rate.or(vehicle_rate).unwrap_or(Decimal::ZERO)
    }

    /// Itemized cost: base (days × rate), insurance, tax and their sum.
    ///
    /// Absent optional amounts count as zero, never as errors.
    pub fn cost_breakdown(&self, vehicle_rate: Option<Decimal>) -> CostBreakdown {
        let days = self.billable_days();
        let base = Decimal::from(days) * self.effective_rate(vehicle_rate);
        let insurance = self.insurance_vehicle.unwrap_or(Decimal::ZERO)
            + self.insurance_third_party.unwrap_or(Decimal::ZERO);
        let tax = self.tax_amount.unwrap_or(Decimal::ZERO);

        CostBreakdown {
            days,
            base,
            insurance,
            tax,
            total: base + insurance + tax,
        }
    }

    /// Total cost of this reservation
    #[inline]
    pub fn total_cost(&self, vehicle_rate: Option<Decimal>) -> Decimal {
        self.cost_breakdown(vehicle_rate).total
    }
}

impl Default for Reservation {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self::new(0, 0, today, today)
    }
}

/// Reservation joined with its vehicle's daily rate.
///
/// Month queries return this shape so revenue reports can apply the
/// vehicle-rate fallback without a second lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationWithRate {
    pub reservation: Reservation,
    pub vehicle_rate: Option<Decimal>,
}

impl ReservationWithRate {
    /// Itemized cost using the joined vehicle rate as fallback
    pub fn cost_breakdown(&self) -> CostBreakdown {
        self.reservation.cost_breakdown(self.vehicle_rate)
    }
}
