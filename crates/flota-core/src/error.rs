//! Unified error handling for FlotaRental
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation
/// using the uniform `{code, message, data}` envelope.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Authentication Errors ====================
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    // ==================== Business Logic Errors ====================
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Vehicle not available: {0}")]
    VehicleUnavailable(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid month: {month} (expected 1-12)")]
    InvalidMonth { month: u32 },

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::VehicleUnavailable(_)
            | AppError::InvalidMonth { .. }
            | AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::MissingField(_)
            | AppError::AlreadyExists(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized (covers both missing identity and missing role)
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken(_)
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            AppError::VehicleNotFound(_)
            | AppError::CustomerNotFound(_)
            | AppError::ReservationNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the envelope code for API responses
    ///
    /// The wire format mirrors HTTP status codes as strings, so every error
    /// collapses into one of "400", "401", "404" or "500".
    pub fn error_code(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "400",
            StatusCode::UNAUTHORIZED => "401",
            StatusCode::NOT_FOUND => "404",
            _ => "500",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "data": null,
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::VehicleNotFound("7".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::VehicleUnavailable("already reserved".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidMonth { month: 13 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("connection refused".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_codes() {
        assert_eq!(AppError::InvalidCredentials.error_code(), "401");
        assert_eq!(
            AppError::Unauthorized("role required".to_string()).error_code(),
            "401"
        );
        assert_eq!(AppError::NotFound("x".to_string()).error_code(), "404");
        assert_eq!(
            AppError::AlreadyExists("plate".to_string()).error_code(),
            "400"
        );
        assert_eq!(AppError::Internal("boom".to_string()).error_code(), "500");
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let err = AppError::ReservationNotFound("123456".to_string());
        let body = json!({
            "code": err.error_code(),
            "message": err.to_string(),
            "data": null,
        });

        assert_eq!(body["code"], "404");
        assert!(body["data"].is_null());
        assert_eq!(body["message"], "Reservation not found: 123456");
    }
}
