//! Vehicle DTOs

use chrono::{DateTime, Utc};
use flota_core::models::Vehicle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for registering a vehicle in the fleet
#[derive(Debug, Deserialize, Validate)]
pub struct VehicleCreateRequest {
    /// Manufacturer
    #[validate(length(min = 1, max = 50, message = "Brand must be 1-50 characters"))]
    pub brand: String,

    /// Model name
    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: String,

    /// Model year
    #[validate(range(min = 1950, max = 2100, message = "Year must be between 1950 and 2100"))]
    pub year: i32,

    /// License plate, unique across the fleet
    #[validate(length(min = 1, max = 20, message = "License plate must be 1-20 characters"))]
    pub license_plate: String,

    /// Standard daily rate
    pub daily_rate: Option<Decimal>,
}

/// Payload for updating a vehicle; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct VehicleUpdateRequest {
    /// New manufacturer
    #[validate(length(min = 1, max = 50, message = "Brand must be 1-50 characters"))]
    pub brand: Option<String>,

    /// New model name
    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: Option<String>,

    /// New model year
    #[validate(range(min = 1950, max = 2100, message = "Year must be between 1950 and 2100"))]
    pub year: Option<i32>,

    /// New license plate, checked for uniqueness
    #[validate(length(min = 1, max = 20, message = "License plate must be 1-20 characters"))]
    pub license_plate: Option<String>,

    /// New standard daily rate
    pub daily_rate: Option<Decimal>,

    /// Manually flip the reserved flag, e.g. to free a vehicle after a return
    pub reserved: Option<bool>,
}

/// Vehicle as exposed by the API
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    /// Unique identifier
    pub id: i32,
    /// Manufacturer
    pub brand: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: i32,
    /// License plate
    pub license_plate: String,
    /// Standard daily rate
    pub daily_rate: Option<Decimal>,
    /// Whether an active reservation holds this vehicle
    pub reserved: bool,
    /// When the vehicle was registered
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            license_plate: vehicle.license_plate,
            daily_rate: vehicle.daily_rate,
            reserved: vehicle.reserved,
            created_at: vehicle.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_request_validation() {
        let valid = VehicleCreateRequest {
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2022,
            license_plate: "ABC-123".to_string(),
            daily_rate: Some(dec!(100)),
        };
        assert!(valid.validate().is_ok());

        let bad_year = VehicleCreateRequest {
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 1900,
            license_plate: "ABC-123".to_string(),
            daily_rate: None,
        };
        assert!(bad_year.validate().is_err());

        let empty_plate = VehicleCreateRequest {
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2022,
            license_plate: String::new(),
            daily_rate: None,
        };
        assert!(empty_plate.validate().is_err());
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let update = VehicleUpdateRequest::default();
        assert!(update.validate().is_ok());
        assert!(update.brand.is_none());
        assert!(update.reserved.is_none());
    }

    #[test]
    fn test_response_from_vehicle() {
        let vehicle = Vehicle {
            id: 3,
            brand: "Kia".to_string(),
            model: "Rio".to_string(),
            year: 2021,
            license_plate: "XYZ-987".to_string(),
            daily_rate: Some(dec!(80.5)),
            reserved: true,
            ..Vehicle::default()
        };

        let resp = VehicleResponse::from(vehicle);
        assert_eq!(resp.id, 3);
        assert_eq!(resp.license_plate, "XYZ-987");
        assert_eq!(resp.daily_rate, Some(dec!(80.5)));
        assert!(resp.reserved);
    }
}
