//! User repository implementation
//!
//! Provides PostgreSQL-backed storage for user authentication and authorization.

use flota_core::{
    models::{User, UserRole, UserStats},
    traits::{Repository, UserRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse user role from string
    fn parse_role(s: &str) -> UserRole {
        UserRole::from_str(s).unwrap_or(UserRole::CommonUser)
    }
}

#[async_trait]
impl Repository<User, i32> for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let result = sqlx::query(
            r#"
            SELECT
                id, name, email, password as password_hash,
                role, active, last_login,
                created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .map(|row: sqlx::postgres::PgRow| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: Self::parse_role(row.get("role")),
            active: row.get("active"),
            last_login: row.get("last_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding user {}: {}", id, e);
            AppError::Database(format!("Failed to find user: {}", e))
        })?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<User>> {
        debug!("Finding all users with limit {} offset {}", limit, offset);

        let rows = sqlx::query(
            r#"
            SELECT
                id, name, email, password as password_hash,
                role, active, last_login,
                created_at, updated_at
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .map(|row: sqlx::postgres::PgRow| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: Self::parse_role(row.get("role")),
            active: row.get("active"),
            last_login: row.get("last_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding users: {}", e);
            AppError::Database(format!("Failed to fetch users: {}", e))
        })?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting users: {}", e);
                AppError::Database(format!("Failed to count users: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &User) -> AppResult<User> {
        debug!("Creating user: {}", entity.email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (
                name, email, password, role, active
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, name, email, password as password_hash,
                role, active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(&entity.name)
        .bind(&entity.email)
        .bind(&entity.password_hash)
        .bind(entity.role.to_string())
        .bind(entity.active)
        .map(|row: sqlx::postgres::PgRow| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: Self::parse_role(row.get("role")),
            active: row.get("active"),
            last_login: row.get("last_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating user: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!("User {} already exists", entity.email))
            } else {
                AppError::Database(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(row)
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &User) -> AppResult<User> {
        debug!("Updating user: {}", entity.id);

        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password = $4,
                role = $5,
                active = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, email, password as password_hash,
                role, active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.email)
        .bind(&entity.password_hash)
        .bind(entity.role.to_string())
        .bind(entity.active)
        .map(|row: sqlx::postgres::PgRow| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: Self::parse_role(row.get("role")),
            active: row.get("active"),
            last_login: row.get("last_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating user {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update user: {}", e))
        })?;

        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting user {}: {}", id, e);
                AppError::Database(format!("Failed to delete user: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let result = sqlx::query(
            r#"
            SELECT
                id, name, email, password as password_hash,
                role, active, last_login,
                created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .map(|row: sqlx::postgres::PgRow| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: Self::parse_role(row.get("role")),
            active: row.get("active"),
            last_login: row.get("last_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding user by email: {}", e);
            AppError::Database(format!("Failed to find user: {}", e))
        })?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn update_last_login(&self, id: i32) -> AppResult<()> {
        debug!("Updating last login for user: {}", id);

        sqlx::query(
            r#"
            UPDATE users
            SET last_login = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating last login for user {}: {}", id, e);
            AppError::Database(format!("Failed to update last login: {}", e))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_stats(&self) -> AppResult<UserStats> {
        debug!("Aggregating user statistics");

        // Single pass over the table, counting each role bucket with FILTER.
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE active),
                COUNT(*) FILTER (WHERE role = 'ADMIN'),
                COUNT(*) FILTER (WHERE role = 'EMPLOYEE'),
                COUNT(*) FILTER (WHERE role = 'COMMON_USER')
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error aggregating user stats: {}", e);
            AppError::Database(format!("Failed to aggregate user stats: {}", e))
        })?;

        Ok(UserStats {
            total_users: row.0,
            active_users: row.1,
            admins: row.2,
            employees: row.3,
            common_users: row.4,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(PgUserRepository::parse_role("ADMIN"), UserRole::Admin);
        assert_eq!(PgUserRepository::parse_role("employee"), UserRole::Employee);
        assert_eq!(
            PgUserRepository::parse_role("common_user"),
            UserRole::CommonUser
        );
        assert_eq!(PgUserRepository::parse_role("invalid"), UserRole::CommonUser);
    }
}
