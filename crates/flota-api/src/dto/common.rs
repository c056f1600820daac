//! Common DTOs used across the API

use flota_core::traits::{PaginatedResponse, PaginationMeta};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Standard response envelope
///
/// Every endpoint answers with `{code, message, data}`. The `code` field
/// mirrors the HTTP status as a string and `data` is `null` whenever the
/// request did not produce a payload. Error responses use the same shape,
/// rendered by [`flota_core::AppError`].
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope<T> {
    /// Status code as a string ("200", "201", ...)
    pub code: String,
    /// Human-readable outcome message
    pub message: String,
    /// Response payload, `null` when absent
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Create a 200 envelope with data
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            code: "200".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a 201 envelope with data
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            code: "201".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiEnvelope<()> {
    /// Create a 200 envelope without payload
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            code: "200".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page", deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1))]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_per_page", deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1, max = 1000))]
    pub per_page: i64,
}

/// Deserialize a number from either a string or a number
fn deserialize_number_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct I64OrStringVisitor;

    impl<'de> Visitor<'de> for I64OrStringVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<i64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<i64, E>
        where
            E: de::Error,
        {
            Ok(value as i64)
        }

        fn visit_str<E>(self, value: &str) -> Result<i64, E>
        where
            E: de::Error,
        {
            value.parse::<i64>().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(I64OrStringVisitor)
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Calculate offset for database query
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Get limit for database query
    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Create pagination metadata
    pub fn metadata(&self, total: i64) -> PaginationMeta {
        PaginationMeta::new(total, self.page, self.per_page)
    }

    /// Create paginated response
    pub fn paginate<T>(&self, data: Vec<T>, total: i64) -> PaginatedResponse<T> {
        PaginatedResponse {
            data,
            pagination: self.metadata(total),
        }
    }
}
