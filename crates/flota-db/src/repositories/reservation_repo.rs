//! Reservation repository implementation
//!
//! Provides PostgreSQL-backed storage for reservations, including booking
//! history lookups and the store-side revenue aggregation used by the
//! statistics reports. Revenue SQL mirrors the pricing rules: day floor of 1,
//! vehicle-rate fallback, and zero for absent optional amounts.

use flota_core::{
    models::{Reservation, ReservationWithRate},
    traits::{Repository, ReservationRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of ReservationRepository
pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    /// Create a new reservation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// First day of the month and first day of the following month
    fn month_range(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(AppError::InvalidMonth { month })?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(AppError::InvalidMonth { month })?;

        Ok((start, end))
    }
}

#[async_trait]
impl Repository<Reservation, i32> for PgReservationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>> {
        debug!("Finding reservation by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            SELECT
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding reservation {}: {}", id, e);
            AppError::Database(format!("Failed to find reservation: {}", e))
        })?;

        Ok(result.map(|row| row.into()))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Reservation>> {
        debug!(
            "Finding all reservations with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            SELECT
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            FROM reservations
            ORDER BY rental_date DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding reservations: {}", e);
            AppError::Database(format!("Failed to fetch reservations: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting reservations: {}", e);
                AppError::Database(format!("Failed to count reservations: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Reservation) -> AppResult<Reservation> {
        debug!("Creating reservation: {}", entity.reservation_number);

        let row = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            INSERT INTO reservations (
                reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            "#,
        )
        .bind(entity.reservation_number)
        .bind(entity.customer_id)
        .bind(entity.vehicle_id)
        .bind(entity.rental_date)
        .bind(entity.return_date)
        .bind(entity.rental_days)
        .bind(entity.daily_rate)
        .bind(&entity.rate_type)
        .bind(entity.insurance_vehicle)
        .bind(entity.insurance_third_party)
        .bind(entity.tax_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating reservation: {}", e);
            let msg = e.to_string();
            if msg.contains("unique constraint") && msg.contains("reservation_number") {
                AppError::AlreadyExists(format!(
                    "Reservation number {} already exists",
                    entity.reservation_number
                ))
            } else {
                AppError::Database(format!("Failed to create reservation: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Reservation) -> AppResult<Reservation> {
        debug!("Updating reservation: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            UPDATE reservations
            SET customer_id = $2,
                vehicle_id = $3,
                rental_date = $4,
                return_date = $5,
                rental_days = $6,
                daily_rate = $7,
                rate_type = $8,
                insurance_vehicle = $9,
                insurance_third_party = $10,
                tax_amount = $11,
                damage_description = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(entity.customer_id)
        .bind(entity.vehicle_id)
        .bind(entity.rental_date)
        .bind(entity.return_date)
        .bind(entity.rental_days)
        .bind(entity.daily_rate)
        .bind(&entity.rate_type)
        .bind(entity.insurance_vehicle)
        .bind(entity.insurance_third_party)
        .bind(entity.tax_amount)
        .bind(&entity.damage_description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating reservation {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update reservation: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting reservation: {}", id);

        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting reservation {}: {}", id, e);
                AppError::Database(format!("Failed to delete reservation: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    #[instrument(skip(self))]
    async fn find_by_number(&self, number: i32) -> AppResult<Option<Reservation>> {
        debug!("Finding reservation by number: {}", number);

        let result = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            SELECT
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            FROM reservations
            WHERE reservation_number = $1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding reservation by number: {}", e);
            AppError::Database(format!("Failed to find reservation: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn delete_by_number(&self, number: i32) -> AppResult<bool> {
        debug!("Deleting reservation by number: {}", number);

        let result = sqlx::query("DELETE FROM reservations WHERE reservation_number = $1")
            .bind(number)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting reservation {}: {}", number, e);
                AppError::Database(format!("Failed to delete reservation: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, description))]
    async fn update_damage(
        &self,
        number: i32,
        description: &str,
    ) -> AppResult<Option<Reservation>> {
        debug!("Registering damage for reservation: {}", number);

        let result = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            UPDATE reservations
            SET damage_description = $2,
                updated_at = NOW()
            WHERE reservation_number = $1
            RETURNING
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            "#,
        )
        .bind(number)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error registering damage for reservation {}: {}",
                number, e
            );
            AppError::Database(format!("Failed to register damage: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_history(&self, customer_id: i32) -> AppResult<Vec<Reservation>> {
        debug!("Finding reservation history for customer: {}", customer_id);

        let rows = sqlx::query_as::<sqlx::Postgres, ReservationRow>(
            r#"
            SELECT
                id, reservation_number, customer_id, vehicle_id,
                rental_date, return_date, rental_days,
                daily_rate, rate_type,
                insurance_vehicle, insurance_third_party, tax_amount,
                damage_description,
                created_at, updated_at
            FROM reservations
            WHERE customer_id = $1
            ORDER BY rental_date DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error fetching history for customer {}: {}",
                customer_id, e
            );
            AppError::Database(format!("Failed to fetch reservation history: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_month(&self, year: i32, month: u32) -> AppResult<Vec<ReservationWithRate>> {
        debug!("Finding reservations for {}-{:02}", year, month);

        let (start, end) = Self::month_range(year, month)?;

        let rows = sqlx::query_as::<sqlx::Postgres, ReservationWithRateRow>(
            r#"
            SELECT
                r.id, r.reservation_number, r.customer_id, r.vehicle_id,
                r.rental_date, r.return_date, r.rental_days,
                r.daily_rate, r.rate_type,
                r.insurance_vehicle, r.insurance_third_party, r.tax_amount,
                r.damage_description,
                r.created_at, r.updated_at,
                v.daily_rate AS vehicle_rate
            FROM reservations r
            LEFT JOIN vehicles v ON v.id = r.vehicle_id
            WHERE r.rental_date >= $1 AND r.rental_date < $2
            ORDER BY r.rental_date, r.id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error fetching reservations for {}-{:02}: {}",
                year, month, e
            );
            AppError::Database(format!("Failed to fetch reservations: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn monthly_revenue_sum(&self, year: i32, month: u32) -> AppResult<Decimal> {
        debug!("Aggregating revenue for {}-{:02}", year, month);

        let (start, end) = Self::month_range(year, month)?;

        let result: (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(
                GREATEST(1, COALESCE(r.rental_days, r.return_date - r.rental_date))
                    * COALESCE(r.daily_rate, v.daily_rate, 0)
                + COALESCE(r.insurance_vehicle, 0)
                + COALESCE(r.insurance_third_party, 0)
                + COALESCE(r.tax_amount, 0)
            ), 0)
            FROM reservations r
            LEFT JOIN vehicles v ON v.id = r.vehicle_id
            WHERE r.rental_date >= $1 AND r.rental_date < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error aggregating revenue for {}-{:02}: {}",
                year, month, e
            );
            AppError::Database(format!("Failed to aggregate monthly revenue: {}", e))
        })?;

        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn year_revenue_sum(&self, year: i32) -> AppResult<Decimal> {
        debug!("Aggregating revenue for year {}", year);

        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid year: {}", year)))?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid year: {}", year)))?;

        let result: (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(
                GREATEST(1, COALESCE(r.rental_days, r.return_date - r.rental_date))
                    * COALESCE(r.daily_rate, v.daily_rate, 0)
                + COALESCE(r.insurance_vehicle, 0)
                + COALESCE(r.insurance_third_party, 0)
                + COALESCE(r.tax_amount, 0)
            ), 0)
            FROM reservations r
            LEFT JOIN vehicles v ON v.id = r.vehicle_id
            WHERE r.rental_date >= $1 AND r.rental_date < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error aggregating revenue for {}: {}", year, e);
            AppError::Database(format!("Failed to aggregate yearly revenue: {}", e))
        })?;

        Ok(result.0)
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i32,
    reservation_number: i32,
    customer_id: i32,
    vehicle_id: i32,
    rental_date: NaiveDate,
    return_date: NaiveDate,
    rental_days: Option<i32>,
    daily_rate: Option<Decimal>,
    rate_type: Option<String>,
    insurance_vehicle: Option<Decimal>,
    insurance_third_party: Option<Decimal>,
    tax_amount: Option<Decimal>,
    damage_description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: row.id,
            reservation_number: row.reservation_number,
            customer_id: row.customer_id,
            vehicle_id: row.vehicle_id,
            rental_date: row.rental_date,
            return_date: row.return_date,
            rental_days: row.rental_days,
            daily_rate: row.daily_rate,
            rate_type: row.rate_type,
            insurance_vehicle: row.insurance_vehicle,
            insurance_third_party: row.insurance_third_party,
            tax_amount: row.tax_amount,
            damage_description: row.damage_description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Reservation row joined with the vehicle's daily rate
#[derive(Debug, sqlx::FromRow)]
struct ReservationWithRateRow {
    id: i32,
    reservation_number: i32,
    customer_id: i32,
    vehicle_id: i32,
    rental_date: NaiveDate,
    return_date: NaiveDate,
    rental_days: Option<i32>,
    daily_rate: Option<Decimal>,
    rate_type: Option<String>,
    insurance_vehicle: Option<Decimal>,
    insurance_third_party: Option<Decimal>,
    tax_amount: Option<Decimal>,
    damage_description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    vehicle_rate: Option<Decimal>,
}

impl From<ReservationWithRateRow> for ReservationWithRate {
    fn from(row: ReservationWithRateRow) -> Self {
        Self {
            reservation: Reservation {
                id: row.id,
                reservation_number: row.reservation_number,
                customer_id: row.customer_id,
                vehicle_id: row.vehicle_id,
                rental_date: row.rental_date,
                return_date: row.return_date,
                rental_days: row.rental_days,
                daily_rate: row.daily_rate,
                rate_type: row.rate_type,
                insurance_vehicle: row.insurance_vehicle,
                insurance_third_party: row.insurance_third_party,
                tax_amount: row.tax_amount,
                damage_description: row.damage_description,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            vehicle_rate: row.vehicle_rate,
        }
    }
}
