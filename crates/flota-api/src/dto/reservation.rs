//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use flota_core::models::Reservation;
use flota_services::{BookingRequest, BookingUpdate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for booking a vehicle
#[derive(Debug, Deserialize, Validate)]
pub struct ReservationCreateRequest {
    /// Vehicle to book
    #[validate(range(min = 1, message = "Vehicle id must be positive"))]
    pub vehicle_id: i32,

    /// First day of the rental
    pub rental_date: NaiveDate,

    /// Agreed return day
    pub return_date: NaiveDate,

    /// Explicit day count; when absent the date span is billed
    pub rental_days: Option<i32>,

    /// Negotiated rate overriding the vehicle's standard rate
    pub daily_rate: Option<Decimal>,

    /// Rate label, e.g. "WEEKEND" or "CORPORATE"
    #[validate(length(max = 20, message = "Rate type must be at most 20 characters"))]
    pub rate_type: Option<String>,

    /// Optional vehicle insurance charge
    pub insurance_vehicle: Option<Decimal>,

    /// Optional third-party insurance charge
    pub insurance_third_party: Option<Decimal>,

    /// Optional tax charge
    pub tax_amount: Option<Decimal>,
}

impl From<ReservationCreateRequest> for BookingRequest {
    fn from(req: ReservationCreateRequest) -> Self {
        Self {
            vehicle_id: req.vehicle_id,
            rental_date: req.rental_date,
            return_date: req.return_date,
            rental_days: req.rental_days,
            daily_rate: req.daily_rate,
            rate_type: req.rate_type,
            insurance_vehicle: req.insurance_vehicle,
            insurance_third_party: req.insurance_third_party,
            tax_amount: req.tax_amount,
        }
    }
}

/// Payload for amending a reservation; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReservationUpdateRequest {
    /// New first rental day
    pub rental_date: Option<NaiveDate>,
    /// New return day
    pub return_date: Option<NaiveDate>,
    /// New explicit day count
    pub rental_days: Option<i32>,
    /// New negotiated daily rate
    pub daily_rate: Option<Decimal>,

    /// New rate label
    #[validate(length(max = 20, message = "Rate type must be at most 20 characters"))]
    pub rate_type: Option<String>,

    /// New vehicle insurance charge
    pub insurance_vehicle: Option<Decimal>,
    /// New third-party insurance charge
    pub insurance_third_party: Option<Decimal>,
    /// New tax charge
    pub tax_amount: Option<Decimal>,

    /// New damage description
    #[validate(length(max = 500, message = "Damage description must be at most 500 characters"))]
    pub damage_description: Option<String>,
}

impl From<ReservationUpdateRequest> for BookingUpdate {
    fn from(req: ReservationUpdateRequest) -> Self {
        Self {
            rental_date: req.rental_date,
            return_date: req.return_date,
            rental_days: req.rental_days,
            daily_rate: req.daily_rate,
            rate_type: req.rate_type,
            insurance_vehicle: req.insurance_vehicle,
            insurance_third_party: req.insurance_third_party,
            tax_amount: req.tax_amount,
            damage_description: req.damage_description,
        }
    }
}

/// Payload for recording damage on a returned vehicle
#[derive(Debug, Deserialize, Validate)]
pub struct DamageRequest {
    /// What was damaged and how
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
}

/// Reservation as exposed by the API
#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    /// Internal row id
    pub id: i32,
    /// Public six-digit reservation number
    pub reservation_number: i32,
    /// Customer holding the booking
    pub customer_id: i32,
    /// Booked vehicle
    pub vehicle_id: i32,
    /// First day of the rental
    pub rental_date: NaiveDate,
    /// Agreed return day
    pub return_date: NaiveDate,
    /// Explicit day count, if one was agreed
    pub rental_days: Option<i32>,
    /// Negotiated daily rate, if it overrides the vehicle rate
    pub daily_rate: Option<Decimal>,
    /// Rate label
    pub rate_type: Option<String>,
    /// Vehicle insurance charge
    pub insurance_vehicle: Option<Decimal>,
    /// Third-party insurance charge
    pub insurance_third_party: Option<Decimal>,
    /// Tax charge
    pub tax_amount: Option<Decimal>,
    /// Damage recorded at return time
    pub damage_description: Option<String>,
    /// When the booking was taken
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            reservation_number: reservation.reservation_number,
            customer_id: reservation.customer_id,
            vehicle_id: reservation.vehicle_id,
            rental_date: reservation.rental_date,
            return_date: reservation.return_date,
            rental_days: reservation.rental_days,
            daily_rate: reservation.daily_rate,
            rate_type: reservation.rate_type,
            insurance_vehicle: reservation.insurance_vehicle,
            insurance_third_party: reservation.insurance_third_party,
            tax_amount: reservation.tax_amount,
            damage_description: reservation.damage_description,
            created_at: reservation.created_at,
        }
    }
}
