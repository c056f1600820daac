//! Vehicle model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vehicle entity
///
/// A rentable unit of the fleet. The `reserved` flag is the single source of
/// truth for availability and is flipped atomically when a booking claims the
/// vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier
    pub id: i32,

    /// Manufacturer (e.g. "Toyota")
    pub brand: String,

    /// Model name (e.g. "Corolla")
    pub model: String,

    /// Model year
    pub year: i32,

    /// License plate (unique)
    pub license_plate: String,

    /// Standard daily rate; reservations may override it
    pub daily_rate: Option<Decimal>,

    /// Whether an active reservation holds this vehicle
    pub reserved: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Check if the vehicle can be booked
    #[inline]
    pub fn is_available(&self) -> bool {
        !self.reserved
    }

    /// Human-readable label, e.g. "Toyota Corolla (2022)"
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.year)
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            id: 0,
            brand: String::new(),
            model: String::new(),
            year: 0,
            license_plate: String::new(),
            daily_rate: None,
            reserved: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
