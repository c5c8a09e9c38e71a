//! User repository.
//!
//! Shoppers are identified by email only; there is no credential storage
//! here. Checkout and sign-in both funnel through `get_or_create` so the
//! same address always lands on the same row.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use verlaine_core::{Email, UserId};

use super::RepositoryError;

/// A shopper row.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// Repository for user rows.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by email, creating the row if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, email: &Email) -> Result<UserRecord, RepositoryError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (email)
            VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, created_at
            ",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}
