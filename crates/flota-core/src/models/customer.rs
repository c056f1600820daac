//! Customer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Customers are the renters on record. They are matched to logged-in users
/// by email when a booking is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: i32,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Contact email (unique, used to link the login account)
    pub email: String,

    /// Contact phone
    pub phone: Option<String>,

    /// Government ID or passport number
    pub document_number: Option<String>,

    /// Billing address
    pub address: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: None,
            document_number: None,
            address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
