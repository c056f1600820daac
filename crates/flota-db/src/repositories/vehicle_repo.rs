//! Vehicle repository implementation
//!
//! Provides PostgreSQL-backed storage for the fleet, including the atomic
//! conditional update used to claim a vehicle for a booking.

use flota_core::{
    models::Vehicle,
    traits::{Repository, VehicleRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of VehicleRepository
pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    /// Create a new vehicle repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Vehicle, i32> for PgVehicleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        debug!("Finding vehicle by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, brand, model, year, license_plate,
                daily_rate, reserved,
                created_at, updated_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicle {}: {}", id, e);
            AppError::Database(format!("Failed to find vehicle: {}", e))
        })?;

        Ok(result.map(|row| row.into()))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Vehicle>> {
        debug!(
            "Finding all vehicles with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, brand, model, year, license_plate,
                daily_rate, reserved,
                created_at, updated_at
            FROM vehicles
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicles: {}", e);
            AppError::Database(format!("Failed to fetch vehicles: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting vehicles: {}", e);
                AppError::Database(format!("Failed to count vehicles: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        debug!("Creating vehicle: {}", entity.license_plate);

        let row = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            INSERT INTO vehicles (
                brand, model, year, license_plate, daily_rate, reserved
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, brand, model, year, license_plate,
                daily_rate, reserved,
                created_at, updated_at
            "#,
        )
        .bind(&entity.brand)
        .bind(&entity.model)
        .bind(entity.year)
        .bind(&entity.license_plate)
        .bind(entity.daily_rate)
        .bind(entity.reserved)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating vehicle: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!(
                    "Vehicle with plate {} already exists",
                    entity.license_plate
                ))
            } else {
                AppError::Database(format!("Failed to create vehicle: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        debug!("Updating vehicle: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            UPDATE vehicles
            SET brand = $2,
                model = $3,
                year = $4,
                license_plate = $5,
                daily_rate = $6,
                reserved = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, brand, model, year, license_plate,
                daily_rate, reserved,
                created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.brand)
        .bind(&entity.model)
        .bind(entity.year)
        .bind(&entity.license_plate)
        .bind(entity.daily_rate)
        .bind(entity.reserved)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating vehicle {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update vehicle: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting vehicle: {}", id);

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting vehicle {}: {}", id, e);
                AppError::Database(format!("Failed to delete vehicle: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    #[instrument(skip(self))]
    async fn find_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>> {
        debug!("Finding vehicle by plate: {}", plate);

        let result = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, brand, model, year, license_plate,
                daily_rate, reserved,
                created_at, updated_at
            FROM vehicles
            WHERE license_plate = $1
            "#,
        )
        .bind(plate)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicle by plate: {}", e);
            AppError::Database(format!("Failed to find vehicle: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_available(&self) -> AppResult<Vec<Vehicle>> {
        debug!("Finding available vehicles");

        let rows = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, brand, model, year, license_plate,
                daily_rate, reserved,
                created_at, updated_at
            FROM vehicles
            WHERE reserved = FALSE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding available vehicles: {}", e);
            AppError::Database(format!("Failed to fetch available vehicles: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count_available(&self) -> AppResult<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE reserved = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error counting available vehicles: {}", e);
                    AppError::Database(format!("Failed to count available vehicles: {}", e))
                })?;

        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn mark_reserved(&self, id: i32) -> AppResult<bool> {
        debug!("Claiming vehicle: {}", id);

        // Conditional update: only one concurrent booking can win the claim.
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET reserved = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND reserved = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error claiming vehicle {}: {}", id, e);
            AppError::Database(format!("Failed to claim vehicle: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn release(&self, id: i32) -> AppResult<bool> {
        debug!("Releasing vehicle: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET reserved = FALSE,
                updated_at = NOW()
            WHERE id = $1 AND reserved = TRUE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error releasing vehicle {}: {}", id, e);
            AppError::Database(format!("Failed to release vehicle: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: i32,
    brand: String,
    model: String,
    year: i32,
    license_plate: String,
    daily_rate: Option<Decimal>,
    reserved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.id,
            brand: row.brand,
            model: row.model,
            year: row.year,
            license_plate: row.license_plate,
            daily_rate: row.daily_rate,
            reserved: row.reserved,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
