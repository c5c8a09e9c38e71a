//! Drop CRUD for editors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use verlaine_core::{CollectionId, DropId};

use super::{RepositoryError, map_insert_error};

/// A drop row as editors see it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DropRow {
    pub id: DropId,
    pub collection_id: CollectionId,
    pub slug: String,
    pub title_fr: String,
    pub title_en: String,
    pub teaser_fr: String,
    pub teaser_en: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Editor-supplied fields for creating or replacing a drop.
#[derive(Debug, Deserialize)]
pub struct DropInput {
    pub collection_id: CollectionId,
    pub slug: String,
    pub title_fr: String,
    pub title_en: String,
    #[serde(default)]
    pub teaser_fr: String,
    #[serde(default)]
    pub teaser_en: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, collection_id, slug, title_fr, title_en, teaser_fr, teaser_en, \
                       starts_at, ends_at";

/// Repository for drop writes.
pub struct DropAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DropAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every drop, past and future.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(&self) -> Result<Vec<DropRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, DropRow>(&format!(
            "SELECT {COLUMNS} FROM drops ORDER BY starts_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a drop.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the slug is taken.
    pub async fn create(&self, input: &DropInput) -> Result<DropRow, RepositoryError> {
        sqlx::query_as::<_, DropRow>(&format!(
            "INSERT INTO drops (collection_id, slug, title_fr, title_en, teaser_fr,
                                teaser_en, starts_at, ends_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        ))
        .bind(input.collection_id)
        .bind(&input.slug)
        .bind(&input.title_fr)
        .bind(&input.title_en)
        .bind(&input.teaser_fr)
        .bind(&input.teaser_en)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "drop slug"))
    }

    /// Replace a drop's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist, `Conflict` if the new
    /// slug is taken.
    pub async fn update(&self, id: DropId, input: &DropInput) -> Result<DropRow, RepositoryError> {
        sqlx::query_as::<_, DropRow>(&format!(
            "UPDATE drops
             SET collection_id = $2, slug = $3, title_fr = $4, title_en = $5,
                 teaser_fr = $6, teaser_en = $7, starts_at = $8, ends_at = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(input.collection_id)
        .bind(&input.slug)
        .bind(&input.title_fr)
        .bind(&input.title_en)
        .bind(&input.teaser_fr)
        .bind(&input.teaser_en)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "drop slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a drop.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn delete(&self, id: DropId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM drops WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
