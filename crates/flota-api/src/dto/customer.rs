//! Customer DTOs

use chrono::{DateTime, Utc};
use flota_core::models::Customer;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload for registering a customer profile
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerCreateRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    /// Contact email; must match the login account for self-service bookings
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 30, message = "Document number must be at most 30 characters"))]
    pub document_number: Option<String>,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,
}

/// Payload for updating a customer; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerUpdateRequest {
    /// New first name
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,

    /// New last name
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,

    /// New contact email, checked for uniqueness
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    /// New contact phone
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    /// New document number
    #[validate(length(max = 30, message = "Document number must be at most 30 characters"))]
    pub document_number: Option<String>,

    /// New billing address
    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,
}

/// Customer as exposed by the API
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    /// Unique identifier
    pub id: i32,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// First and last name joined for display
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Government ID or passport number
    pub document_number: Option<String>,
    /// Billing address
    pub address: Option<String>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        let full_name = customer.full_name();
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            full_name,
            email: customer.email,
            phone: customer.phone,
            document_number: customer.document_number,
            address: customer.address,
            created_at: customer.created_at,
        }
    }
}
