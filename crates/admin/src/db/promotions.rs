//! Promotion CRUD for editors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use verlaine_core::PromotionId;

use super::{RepositoryError, map_insert_error};

/// A promotion row as editors see it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PromotionRow {
    pub id: PromotionId,
    pub code: String,
    pub description_fr: String,
    pub description_en: String,
    pub percent_off: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
}

/// Editor-supplied fields for creating or replacing a promotion.
#[derive(Debug, Deserialize)]
pub struct PromotionInput {
    pub code: String,
    #[serde(default)]
    pub description_fr: String,
    #[serde(default)]
    pub description_en: String,
    pub percent_off: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

const COLUMNS: &str =
    "id, code, description_fr, description_en, percent_off, starts_at, ends_at, active";

/// Repository for promotion writes.
pub struct PromotionAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(&self) -> Result<Vec<PromotionRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {COLUMNS} FROM promotions ORDER BY starts_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a promotion.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the code is taken (case-insensitively).
    pub async fn create(&self, input: &PromotionInput) -> Result<PromotionRow, RepositoryError> {
        sqlx::query_as::<_, PromotionRow>(&format!(
            "INSERT INTO promotions (code, description_fr, description_en, percent_off,
                                     starts_at, ends_at, active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        ))
        .bind(&input.code)
        .bind(&input.description_fr)
        .bind(&input.description_en)
        .bind(input.percent_off)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "promotion code"))
    }

    /// Replace a promotion's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist, `Conflict` if the new
    /// code is taken.
    pub async fn update(
        &self,
        id: PromotionId,
        input: &PromotionInput,
    ) -> Result<PromotionRow, RepositoryError> {
        sqlx::query_as::<_, PromotionRow>(&format!(
            "UPDATE promotions
             SET code = $2, description_fr = $3, description_en = $4, percent_off = $5,
                 starts_at = $6, ends_at = $7, active = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.code)
        .bind(&input.description_fr)
        .bind(&input.description_en)
        .bind(input.percent_off)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "promotion code"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a promotion.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn delete(&self, id: PromotionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
