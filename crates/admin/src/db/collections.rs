//! Collection CRUD for editors.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use verlaine_core::CollectionId;

use super::{RepositoryError, map_insert_error};

/// A collection row as editors see it, including unpublished ones.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CollectionRow {
    pub id: CollectionId,
    pub slug: String,
    pub name_fr: String,
    pub name_en: String,
    pub description_fr: String,
    pub description_en: String,
    pub hero_image_url: Option<String>,
    pub position: i32,
    pub published: bool,
}

/// Editor-supplied fields for creating or replacing a collection.
#[derive(Debug, Deserialize)]
pub struct CollectionInput {
    pub slug: String,
    pub name_fr: String,
    pub name_en: String,
    #[serde(default)]
    pub description_fr: String,
    #[serde(default)]
    pub description_en: String,
    pub hero_image_url: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub published: bool,
}

const COLUMNS: &str = "id, slug, name_fr, name_en, description_fr, description_en, \
                       hero_image_url, position, published";

/// Repository for collection writes.
pub struct CollectionAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every collection, published or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(&self) -> Result<Vec<CollectionRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, CollectionRow>(&format!(
            "SELECT {COLUMNS} FROM collections ORDER BY position ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch one collection by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn get(&self, id: CollectionId) -> Result<CollectionRow, RepositoryError> {
        sqlx::query_as::<_, CollectionRow>(&format!(
            "SELECT {COLUMNS} FROM collections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Create a collection.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the slug is taken.
    pub async fn create(&self, input: &CollectionInput) -> Result<CollectionRow, RepositoryError> {
        sqlx::query_as::<_, CollectionRow>(&format!(
            "INSERT INTO collections (slug, name_fr, name_en, description_fr, description_en,
                                      hero_image_url, position, published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        ))
        .bind(&input.slug)
        .bind(&input.name_fr)
        .bind(&input.name_en)
        .bind(&input.description_fr)
        .bind(&input.description_en)
        .bind(&input.hero_image_url)
        .bind(input.position)
        .bind(input.published)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "collection slug"))
    }

    /// Replace a collection's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist, `Conflict` if the new
    /// slug is taken.
    pub async fn update(
        &self,
        id: CollectionId,
        input: &CollectionInput,
    ) -> Result<CollectionRow, RepositoryError> {
        sqlx::query_as::<_, CollectionRow>(&format!(
            "UPDATE collections
             SET slug = $2, name_fr = $3, name_en = $4, description_fr = $5,
                 description_en = $6, hero_image_url = $7, position = $8,
                 published = $9, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.name_fr)
        .bind(&input.name_en)
        .bind(&input.description_fr)
        .bind(&input.description_en)
        .bind(&input.hero_image_url)
        .bind(input.position)
        .bind(input.published)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "collection slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a collection. Products in it are detached, not deleted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn delete(&self, id: CollectionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
