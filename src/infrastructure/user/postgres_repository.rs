//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::user::{
    ConnectionStatus, Email, PasswordHash, Role, User, UserId, UserRepository, Username,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str =
    "id, email, username, password_hash, role, connection_status, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table if it does not exist
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                connection_status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            SELECT_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, role,
                               connection_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email().as_str())
        .bind(user.username().as_str())
        .bind(user.password().as_str())
        .bind(user.role().as_str())
        .bind(user.connection_status().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("email") {
                    DomainError::conflict(format!(
                        "Email '{}' is already registered",
                        user.email().as_str()
                    ))
                } else {
                    DomainError::conflict(format!(
                        "User with ID '{}' already exists",
                        user.id().as_str()
                    ))
                }
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, role = $5,
                connection_status = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email().as_str())
        .bind(user.username().as_str())
        .bind(user.password().as_str())
        .bind(user.role().as_str())
        .bind(user.connection_status().as_str())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Email '{}' is already registered",
                    user.email().as_str()
                ))
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id().as_str()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                id.as_str()
            )));
        }

        Ok(())
    }
}

/// Reconstitute a user aggregate from a database row
///
/// A row that fails value-object validation indicates storage corruption
/// and surfaces as a storage error, not a validation error.
fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Missing id column: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::storage(format!("Missing email column: {}", e)))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| DomainError::storage(format!("Missing username column: {}", e)))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| DomainError::storage(format!("Missing password_hash column: {}", e)))?;
    let role: String = row
        .try_get("role")
        .map_err(|e| DomainError::storage(format!("Missing role column: {}", e)))?;
    let status: String = row
        .try_get("connection_status")
        .map_err(|e| DomainError::storage(format!("Missing connection_status column: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Missing created_at column: {}", e)))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Missing updated_at column: {}", e)))?;

    Ok(User::reconstitute(
        UserId::new(id).map_err(|e| DomainError::storage(format!("Corrupt user id: {}", e)))?,
        Email::new(email).map_err(|e| DomainError::storage(format!("Corrupt email: {}", e)))?,
        Username::new(username)
            .map_err(|e| DomainError::storage(format!("Corrupt username: {}", e)))?,
        PasswordHash::new(password_hash)
            .map_err(|e| DomainError::storage(format!("Corrupt password hash: {}", e)))?,
        Role::parse(&role).map_err(|e| DomainError::storage(format!("Corrupt role: {}", e)))?,
        created_at,
        updated_at,
        ConnectionStatus::parse(&status)
            .map_err(|e| DomainError::storage(format!("Corrupt connection status: {}", e)))?,
    ))
}
