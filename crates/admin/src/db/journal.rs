//! Journal post CRUD for editors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use verlaine_core::JournalPostId;

use super::{RepositoryError, map_insert_error};

/// A journal post row as editors see it, drafts included.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JournalRow {
    pub id: JournalPostId,
    pub slug: String,
    pub title_fr: String,
    pub title_en: String,
    pub excerpt_fr: String,
    pub excerpt_en: String,
    pub body_fr: String,
    pub body_en: String,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// Editor-supplied fields for creating or replacing a journal post.
#[derive(Debug, Deserialize)]
pub struct JournalInput {
    pub slug: String,
    pub title_fr: String,
    pub title_en: String,
    #[serde(default)]
    pub excerpt_fr: String,
    #[serde(default)]
    pub excerpt_en: String,
    #[serde(default)]
    pub body_fr: String,
    #[serde(default)]
    pub body_en: String,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, slug, title_fr, title_en, excerpt_fr, excerpt_en, body_fr, \
                       body_en, cover_image_url, published, published_at";

/// Repository for journal writes.
pub struct JournalAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> JournalAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every post, drafts included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(&self) -> Result<Vec<JournalRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {COLUMNS} FROM journal_posts ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch one post by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn get(&self, id: JournalPostId) -> Result<JournalRow, RepositoryError> {
        sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {COLUMNS} FROM journal_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Create a post. Publishing without an explicit `published_at` stamps
    /// it with the current time.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the slug is taken.
    pub async fn create(&self, input: &JournalInput) -> Result<JournalRow, RepositoryError> {
        let published_at = effective_published_at(input);

        sqlx::query_as::<_, JournalRow>(&format!(
            "INSERT INTO journal_posts (slug, title_fr, title_en, excerpt_fr, excerpt_en,
                                        body_fr, body_en, cover_image_url, published,
                                        published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        ))
        .bind(&input.slug)
        .bind(&input.title_fr)
        .bind(&input.title_en)
        .bind(&input.excerpt_fr)
        .bind(&input.excerpt_en)
        .bind(&input.body_fr)
        .bind(&input.body_en)
        .bind(&input.cover_image_url)
        .bind(input.published)
        .bind(published_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "journal slug"))
    }

    /// Replace a post's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist, `Conflict` if the new
    /// slug is taken.
    pub async fn update(
        &self,
        id: JournalPostId,
        input: &JournalInput,
    ) -> Result<JournalRow, RepositoryError> {
        let published_at = effective_published_at(input);

        sqlx::query_as::<_, JournalRow>(&format!(
            "UPDATE journal_posts
             SET slug = $2, title_fr = $3, title_en = $4, excerpt_fr = $5,
                 excerpt_en = $6, body_fr = $7, body_en = $8, cover_image_url = $9,
                 published = $10, published_at = $11, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.title_fr)
        .bind(&input.title_en)
        .bind(&input.excerpt_fr)
        .bind(&input.excerpt_en)
        .bind(&input.body_fr)
        .bind(&input.body_en)
        .bind(&input.cover_image_url)
        .bind(input.published)
        .bind(published_at)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "journal slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn delete(&self, id: JournalPostId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM journal_posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// A published post needs a publication timestamp for storefront ordering.
fn effective_published_at(input: &JournalInput) -> Option<DateTime<Utc>> {
    if input.published {
        Some(input.published_at.unwrap_or_else(Utc::now))
    } else {
        input.published_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(published: bool, published_at: Option<DateTime<Utc>>) -> JournalInput {
        JournalInput {
            slug: "atelier".into(),
            title_fr: "L'atelier".into(),
            title_en: "The atelier".into(),
            excerpt_fr: String::new(),
            excerpt_en: String::new(),
            body_fr: String::new(),
            body_en: String::new(),
            cover_image_url: None,
            published,
            published_at,
        }
    }

    #[test]
    fn publishing_stamps_missing_timestamp() {
        let stamped = effective_published_at(&input(true, None));
        assert!(stamped.is_some());
    }

    #[test]
    fn test_explicit_timestamp_is_kept() {
        let at = "2026-06-01T10:00:00Z".parse().expect("valid timestamp");
        assert_eq!(effective_published_at(&input(true, Some(at))), Some(at));
    }

    #[test]
    fn test_draft_keeps_none() {
        assert_eq!(effective_published_at(&input(false, None)), None);
    }
}
