//! Customer repository implementation

use flota_core::{
    models::Customer,
    traits::{CustomerRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of CustomerRepository
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Customer, i32> for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>> {
        debug!("Finding customer by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, CustomerRow>(
            r#"
            SELECT
                id, first_name, last_name, email,
                phone, document_number, address,
                created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer {}: {}", id, e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(|row| row.into()))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Customer>> {
        debug!(
            "Finding all customers with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, CustomerRow>(
            r#"
            SELECT
                id, first_name, last_name, email,
                phone, document_number, address,
                created_at, updated_at
            FROM customers
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customers: {}", e);
            AppError::Database(format!("Failed to fetch customers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting customers: {}", e);
                AppError::Database(format!("Failed to count customers: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Creating customer: {}", entity.email);

        let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(
            r#"
            INSERT INTO customers (
                first_name, last_name, email, phone, document_number, address
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, first_name, last_name, email,
                phone, document_number, address,
                created_at, updated_at
            "#,
        )
        .bind(&entity.first_name)
        .bind(&entity.last_name)
        .bind(&entity.email)
        .bind(&entity.phone)
        .bind(&entity.document_number)
        .bind(&entity.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating customer: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!("Customer {} already exists", entity.email))
            } else {
                AppError::Database(format!("Failed to create customer: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Updating customer: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(
            r#"
            UPDATE customers
            SET first_name = $2,
                last_name = $3,
                email = $4,
                phone = $5,
                document_number = $6,
                address = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, first_name, last_name, email,
                phone, document_number, address,
                created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.first_name)
        .bind(&entity.last_name)
        .bind(&entity.email)
        .bind(&entity.phone)
        .bind(&entity.document_number)
        .bind(&entity.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating customer {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update customer: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting customer: {}", id);

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting customer {}: {}", id, e);
                AppError::Database(format!("Failed to delete customer: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        debug!("Finding customer by email: {}", email);

        let result = sqlx::query_as::<sqlx::Postgres, CustomerRow>(
            r#"
            SELECT
                id, first_name, last_name, email,
                phone, document_number, address,
                created_at, updated_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer by email: {}", e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    document_number: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            document_number: row.document_number,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
