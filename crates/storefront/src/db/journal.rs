//! Journal repository: editor-managed editorial posts.
//!
//! Post bodies are stored as markdown and rendered to HTML at read time
//! with the same comrak options as the static content pages.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use verlaine_core::{JournalPostId, Locale, LocalizedText};

use super::RepositoryError;

/// A journal post row.
#[derive(Debug, Clone, FromRow)]
pub struct JournalPostRecord {
    pub id: JournalPostId,
    pub slug: String,
    pub title_fr: String,
    pub title_en: String,
    pub excerpt_fr: String,
    pub excerpt_en: String,
    pub body_fr: String,
    pub body_en: String,
    pub cover_image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl JournalPostRecord {
    /// Title resolved for a locale.
    #[must_use]
    pub fn title(&self, locale: Locale) -> String {
        LocalizedText::new(self.title_fr.clone(), self.title_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Excerpt resolved for a locale.
    #[must_use]
    pub fn excerpt(&self, locale: Locale) -> String {
        LocalizedText::new(self.excerpt_fr.clone(), self.excerpt_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Markdown body resolved for a locale, borrowed to avoid cloning
    /// multi-kilobyte bodies just to pick a language.
    #[must_use]
    pub fn body_markdown(&self, locale: Locale) -> &str {
        let (wanted, fallback) = match locale {
            Locale::Fr => (&self.body_fr, &self.body_en),
            Locale::En => (&self.body_en, &self.body_fr),
        };
        if wanted.is_empty() { fallback } else { wanted }
    }
}

/// Repository for journal reads.
pub struct JournalRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> JournalRepository<'a> {
    /// Create a new journal repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<JournalPostRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, JournalPostRecord>(
            r"
            SELECT id, slug, title_fr, title_en, excerpt_fr, excerpt_en,
                   body_fr, body_en, cover_image_url, published_at
            FROM journal_posts
            WHERE published AND published_at <= NOW()
            ORDER BY published_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// A single published post by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such post exists.
    pub async fn get_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<JournalPostRecord, RepositoryError> {
        sqlx::query_as::<_, JournalPostRecord>(
            r"
            SELECT id, slug, title_fr, title_en, excerpt_fr, excerpt_en,
                   body_fr, body_en, cover_image_url, published_at
            FROM journal_posts
            WHERE slug = $1 AND published AND published_at <= NOW()
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
